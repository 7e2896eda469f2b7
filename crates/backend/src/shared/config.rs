use serde::Deserialize;
use std::net::SocketAddr;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub tokens: TokensConfig,
    #[serde(default)]
    pub seed: SeedConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    /// Random per-process secret when absent (tokens do not survive a restart)
    pub jwt_secret: Option<String>,
    #[serde(default = "default_access_token_hours")]
    pub access_token_hours: i64,
    #[serde(default = "default_refresh_token_days")]
    pub refresh_token_days: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: None,
            access_token_hours: default_access_token_hours(),
            refresh_token_days: default_refresh_token_days(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TokenIssuerKind {
    /// Fixed placeholder token, same value for every payment
    Placeholder,
    /// sha256-derived token per payment
    Digest,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TokensConfig {
    #[serde(default = "default_issuer")]
    pub issuer: TokenIssuerKind,
    #[serde(default = "default_placeholder")]
    pub placeholder: String,
    /// Required by the digest issuer
    pub secret: Option<String>,
}

impl Default for TokensConfig {
    fn default() -> Self {
        Self {
            issuer: default_issuer(),
            placeholder: default_placeholder(),
            secret: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SeedConfig {
    /// Load demo agents, customers, inventory, leads, tokens and accounts on startup
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

fn default_access_token_hours() -> i64 {
    24
}

fn default_refresh_token_days() -> i64 {
    90
}

fn default_issuer() -> TokenIssuerKind {
    TokenIssuerKind::Placeholder
}

fn default_placeholder() -> String {
    "ABC123XYZ".to_string()
}

fn default_true() -> bool {
    true
}

impl Config {
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        let addr = format!("{}:{}", self.server.host, self.server.port);
        addr.parse()
            .map_err(|e| anyhow::anyhow!("Invalid server address '{}': {}", addr, e))
    }
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[server]
host = "0.0.0.0"
port = 3000

[auth]
access_token_hours = 24
refresh_token_days = 90

[tokens]
issuer = "placeholder"
placeholder = "ABC123XYZ"

[seed]
enabled = true
"#;

/// Load configuration from config.toml file
///
/// Search order:
/// 1. Next to the executable (for production)
/// 2. Falls back to embedded default config
pub fn load_config() -> anyhow::Result<Config> {
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let config_path = exe_dir.join("config.toml");

            if config_path.exists() {
                tracing::info!("Loading config from: {}", config_path.display());
                let contents = std::fs::read_to_string(&config_path)?;
                return parse_config(&contents);
            } else {
                tracing::warn!("config.toml not found at: {}", config_path.display());
            }
        }
    }

    tracing::info!("Using default embedded configuration");
    parse_config(DEFAULT_CONFIG)
}

pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let config: Config = toml::from_str(contents)?;
    if config.auth.access_token_hours <= 0 || config.auth.refresh_token_days <= 0 {
        return Err(anyhow::anyhow!("Token lifetimes must be positive"));
    }
    if config.tokens.issuer == TokenIssuerKind::Digest && config.tokens.secret.is_none() {
        return Err(anyhow::anyhow!(
            "[tokens] secret is required when issuer = \"digest\""
        ));
    }
    Ok(config)
}

#[cfg(test)]
pub fn test_config() -> Config {
    let mut config = parse_config(DEFAULT_CONFIG).unwrap();
    config.auth.jwt_secret = Some("test-secret".into());
    config
}
