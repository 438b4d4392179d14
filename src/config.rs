use std::env;
use dotenvy::dotenv;

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub server_addr: String,

    // Rate limiting
    pub rate_calculate_per_min: u32,

    pub api_prefix: String,

    /// Written to `corrected_by` on punches the engine relabels.
    pub correction_actor: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        Self {
            server_addr: env::var("SERVER_ADDR").expect("SERVER_ADDR must be set"),
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),

            rate_calculate_per_min: env_or("RATE_CALCULATE_PER_MIN", 600),

            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api".to_string()),
            correction_actor: env::var("CORRECTION_ACTOR").unwrap_or_else(|_| "system".to_string()),
        }
    }
}
