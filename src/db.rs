use std::time::Duration;

use anyhow::{Context, Result};
use postgres::{Client, NoTls};

use crate::config::DbConfig;

const CONNECT_TIMEOUT_SECS: u64 = 10;

// One fresh connection per query call; no pooling, no reuse across calls.
pub fn connect(cfg: &DbConfig) -> Result<Client> {
    postgres::Config::new()
        .host(&cfg.server)
        .port(cfg.port)
        .dbname(&cfg.database)
        .user(&cfg.username)
        .password(&cfg.password)
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .connect(NoTls)
        .with_context(|| format!("connect to {}:{}/{}", cfg.server, cfg.port, cfg.database))
}
