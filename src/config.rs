use std::env;
use dotenvy::dotenv;
#[derive(Clone)]
pub struct Config {
    pub server_addr: String,
    /// MySQL connection string; the in-memory store is used when unset
    pub database_url: Option<String>,
    pub jwt_secret: String,
    pub access_token_ttl: usize,

    // Rate limiting
    pub rate_limit_enabled: bool,
    pub rate_login_per_min: u32,
    pub rate_public_per_min: u32,

    pub api_prefix: String,
    pub cache_ttl_secs: u64,
    pub log_dir: String,

    // Seed values for the settings record until one is saved
    pub default_approver_email: String,
    pub default_admin_password: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        Self {
            server_addr: env::var("SERVER_ADDR").expect("SERVER_ADDR must be set"),
            database_url: env::var("DATABASE_URL").ok().filter(|url| !url.is_empty()),
            jwt_secret: env::var("JWT_SECRET").expect("JWT_SECRET must be set"),
            access_token_ttl: env::var("ACCESS_TOKEN_TTL")
                .unwrap_or_else(|_| "3600".to_string()) // default 1 hour
                .parse()
                .expect("ACCESS_TOKEN_TTL must be a number of seconds"),

            rate_limit_enabled: env::var("RATE_LIMIT_ENABLED")
                .map(|v| v != "false" && v != "0")
                .unwrap_or(true),
            rate_login_per_min: env::var("RATE_LOGIN_PER_MIN")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .expect("RATE_LOGIN_PER_MIN must be a number"),
            rate_public_per_min: env::var("RATE_PUBLIC_PER_MIN")
                .unwrap_or_else(|_| "600".to_string())
                .parse()
                .expect("RATE_PUBLIC_PER_MIN must be a number"),

            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api/v1".to_string()),
            cache_ttl_secs: env::var("CACHE_TTL_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .expect("CACHE_TTL_SECS must be a number"),
            log_dir: env::var("LOG_DIR").unwrap_or_else(|_| "logs".to_string()),

            default_approver_email: env::var("DEFAULT_APPROVER_EMAIL")
                .unwrap_or_else(|_| "approver@cuti.local".to_string()),
            default_admin_password: env::var("DEFAULT_ADMIN_PASSWORD")
                .unwrap_or_else(|_| "TVTOTO098".to_string()),
        }
    }
}
