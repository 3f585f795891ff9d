use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// PostgreSQL connection URL. Without it the server keeps its data in memory.
    #[serde(default)]
    pub database_url: Option<String>,

    /// Size of the PostgreSQL connection pool
    #[serde(default = "default_db_max_connections")]
    pub db_max_connections: u32,

    /// HMAC secret used to sign session tokens
    pub session_secret: String,

    /// Session lifetime in hours
    #[serde(default = "default_session_ttl_hours")]
    pub session_ttl_hours: i64,

    /// Name of the session cookie
    #[serde(default = "default_session_cookie_name")]
    pub session_cookie_name: String,

    /// Marks the session cookie `Secure` (HTTPS only)
    #[serde(default)]
    pub cookie_secure: bool,

    /// Frontend origin allowed to make credentialed requests
    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,

    #[serde(default = "default_min_password_length")]
    pub min_password_length: usize,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_db_max_connections() -> u32 {
    5
}

fn default_session_ttl_hours() -> i64 {
    24 * 7
}

fn default_session_cookie_name() -> String {
    "flixmatch_session".to_string()
}

fn default_cors_origin() -> String {
    "http://localhost:5173".to_string()
}

fn default_min_password_length() -> usize {
    8
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let config = envy::from_env::<Config>()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.session_secret.trim().is_empty() {
            anyhow::bail!("SESSION_SECRET must not be empty");
        }
        if self.session_ttl_hours <= 0 {
            anyhow::bail!("SESSION_TTL_HOURS must be positive");
        }
        Ok(())
    }

    /// Configuration with defaults and the given signing secret, no database
    pub fn with_secret(session_secret: impl Into<String>) -> Self {
        Self {
            database_url: None,
            db_max_connections: default_db_max_connections(),
            session_secret: session_secret.into(),
            session_ttl_hours: default_session_ttl_hours(),
            session_cookie_name: default_session_cookie_name(),
            cookie_secure: false,
            cors_origin: default_cors_origin(),
            min_password_length: default_min_password_length(),
            host: default_host(),
            port: default_port(),
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
