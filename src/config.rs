use std::{env, net::SocketAddr};

use anyhow::{Context, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl Environment {
    fn from_env() -> Self {
        match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("test") => Environment::Test,
            _ => Environment::Development,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Test => "test",
            Environment::Production => "production",
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: Environment,
    pub database_url: String,
    pub max_connections: u32,
    pub address: SocketAddr,
    pub log_filter: String,
}

impl AppConfig {
    /// Loads `.env.{APP_ENV}` and then `.env`; variables already set in the
    /// process environment are never overwritten.
    pub fn from_env() -> Result<Self> {
        let environment = Environment::from_env();
        dotenvy::from_filename(format!(".env.{}", environment.name())).ok();
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
        let max_connections = match env::var("DATABASE_MAX_CONNECTIONS") {
            Ok(v) => v
                .parse()
                .context("DATABASE_MAX_CONNECTIONS must be a positive integer")?,
            Err(_) => 5,
        };

        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());
        let port = match env::var("PORT") {
            Ok(v) => v.parse::<u16>().context("PORT must be a valid port number")?,
            Err(_) => 9090,
        };
        let address = format!("{host}:{port}")
            .parse()
            .with_context(|| format!("invalid listen address {host}:{port}"))?;

        let log_filter = env::var("LOG_FILTER").unwrap_or_else(|_| match environment {
            Environment::Development => "nc_news=debug,tower_http=debug".to_owned(),
            Environment::Test | Environment::Production => "info".to_owned(),
        });

        Ok(Self {
            environment,
            database_url,
            max_connections,
            address,
            log_filter,
        })
    }
}
