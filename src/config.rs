use std::env;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub log_dir: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "memory://".to_string()),
            log_dir: env::var("LOG_DIR").unwrap_or_else(|_| "./logs".to_string()),
        }
    }
}
