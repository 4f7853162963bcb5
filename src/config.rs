use std::env;

use anyhow::{Context, Result};

const SERVER_VAR: &str = "STATS_DB_SERVER";
const DATABASE_VAR: &str = "STATS_DB_NAME";
const USERNAME_VAR: &str = "STATS_DB_USER";
const PASSWORD_VAR: &str = "STATS_DB_PASSWORD";
const PORT_VAR: &str = "STATS_DB_PORT";

const DEFAULT_PORT: u16 = 5432;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConfig {
    pub server: String,
    pub port: u16,
    pub database: String,
    pub username: String,
    pub password: String,
}

impl DbConfig {
    // Credentials come from the environment (or .env files loaded at startup),
    // never from source.
    pub fn from_env() -> Result<Self> {
        let server = required_var(SERVER_VAR)?;
        let database = required_var(DATABASE_VAR)?;
        let username = required_var(USERNAME_VAR)?;
        let password = required_var(PASSWORD_VAR)?;
        let port = env::var(PORT_VAR)
            .ok()
            .and_then(|val| val.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);

        Ok(Self {
            server,
            port,
            database,
            username,
            password,
        })
    }

    // None when no credentials are configured at all; the app then falls back
    // to the offline sample dataset. A half-configured environment is an error.
    pub fn from_env_opt() -> Result<Option<Self>> {
        let any_set = [SERVER_VAR, DATABASE_VAR, USERNAME_VAR, PASSWORD_VAR]
            .iter()
            .any(|name| env::var(name).is_ok_and(|val| !val.trim().is_empty()));
        if !any_set {
            return Ok(None);
        }
        Self::from_env().map(Some)
    }
}

fn required_var(name: &str) -> Result<String> {
    let val = env::var(name).with_context(|| format!("{name} is not set"))?;
    let val = val.trim().to_string();
    if val.is_empty() {
        return Err(anyhow::anyhow!("{name} is empty"));
    }
    Ok(val)
}

pub fn load_env_files() {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
}
