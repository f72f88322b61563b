use std::fmt::Display;
use std::str::FromStr;

use crate::error::Error;

pub static DATABASE_URL: &str = "DATABASE_URL";
pub static JWT_SECRET: &str = "JWT_SECRET";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub bind_addr: String,
    pub port: u16,
    pub max_connections: u32,
    pub token_ttl_days: i64,
    pub run_migrations: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, Error> {
        Ok(Self {
            database_url: dotenv::var(DATABASE_URL)?,
            jwt_secret: dotenv::var(JWT_SECRET)?,
            bind_addr: dotenv::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0".into()),
            port: try_load("PORT", 8000)?,
            max_connections: try_load("DB_MAX_CONNECTIONS", 5)?,
            token_ttl_days: try_load("TOKEN_TTL_DAYS", 30)?,
            run_migrations: try_load("RUN_MIGRATIONS", true)?,
        })
    }
}

fn try_load<T>(key: &str, default: T) -> Result<T, Error>
where
    T: FromStr + Display,
    T::Err: Display,
{
    match dotenv::var(key) {
        Ok(v) => v.parse().map_err(|e| Error::Validation(format!("invalid {}: {}", key, e))),
        Err(_) => {
            log::info!("{} not set, using default: {}", key, default);
            Ok(default)
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_try_load_default() {
        let port: u16 = try_load("SKCONNECT_TEST_UNSET_PORT", 8000).unwrap();
        assert_eq!(port, 8000);
    }

    #[test]
    fn test_try_load_invalid() {
        std::env::set_var("SKCONNECT_TEST_BAD_PORT", "eighty");
        let res: Result<u16, Error> = try_load("SKCONNECT_TEST_BAD_PORT", 8000);
        assert!(matches!(res, Err(Error::Validation(_))));
    }
}
