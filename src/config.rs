use clap::{Args, Parser, ValueEnum};

#[derive(Clone, Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Config {
    /// Database connection URL
    #[arg(long, env = "CONFAB_DATABASE_URL")]
    pub database_url: String,

    #[command(flatten)]
    pub server: ServerConfig,

    #[command(flatten)]
    pub auth: AuthConfig,

    #[command(flatten)]
    pub conversations: ConversationConfig,

    #[command(flatten)]
    pub telemetry: TelemetryConfig,
}

#[derive(Clone, Debug, Args)]
pub struct ServerConfig {
    /// Host to listen on
    #[arg(long, env = "CONFAB_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "CONFAB_PORT", default_value_t = 3000)]
    pub port: u16,

    /// Port for the management server (health probes)
    #[arg(long, env = "CONFAB_MGMT_PORT", default_value_t = 3001)]
    pub mgmt_port: u16,

    /// Per-request deadline in seconds
    #[arg(long, env = "CONFAB_REQUEST_TIMEOUT_SECS", default_value_t = 30)]
    pub request_timeout_secs: u64,
}

#[derive(Clone, Debug, Args)]
pub struct AuthConfig {
    /// Secret shared with the identity provider for verifying access tokens
    #[arg(long, env = "CONFAB_JWT_SECRET")]
    pub jwt_secret: String,
}

#[derive(Clone, Debug, Args)]
pub struct ConversationConfig {
    /// Maximum number of participants in a group at creation
    #[arg(long, env = "CONFAB_MAX_GROUP_SIZE", default_value_t = 50)]
    pub max_group_size: usize,

    /// Default page size for conversation and message listings
    #[arg(long, env = "CONFAB_PAGE_LIMIT", default_value_t = 50)]
    pub page_limit: i64,

    /// Upper bound a caller-supplied page size is clamped to
    #[arg(long, env = "CONFAB_MAX_PAGE_LIMIT", default_value_t = 200)]
    pub max_page_limit: i64,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Clone, Debug, Args)]
pub struct TelemetryConfig {
    /// Log output format
    #[arg(long, env = "CONFAB_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

impl Config {
    #[must_use]
    pub fn load() -> Self {
        Self::parse()
    }
}
