use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Pexels API key, sent verbatim in the Authorization header
    #[serde(default)]
    pub pexels_api_key: String,

    /// Pexels API base URL
    #[serde(default = "default_pexels_api_url")]
    pub pexels_api_url: String,

    /// Skyscanner partners API key
    #[serde(default, alias = "api_key")]
    pub skyscanner_api_key: String,

    /// Skyscanner partners API base URL
    #[serde(default = "default_skyscanner_api_url")]
    pub skyscanner_api_url: String,

    /// Destination catalog served by the recommendation endpoint
    #[serde(default = "default_destinations_path")]
    pub destinations_path: String,

    /// SQLite database holding group trips
    #[serde(default = "default_database_url")]
    pub database_url: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_pexels_api_url() -> String {
    "https://api.pexels.com/v1".to_string()
}

fn default_skyscanner_api_url() -> String {
    "https://partners.api.skyscanner.net".to_string()
}

fn default_destinations_path() -> String {
    "destinations.json".to_string()
}

fn default_database_url() -> String {
    "sqlite://tripmatch.db?mode=rwc".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(std::env::vars())
    }

    /// Build configuration from an explicit set of variables
    pub fn from_vars<I>(vars: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter::<_, Config>(vars).map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Socket address string the server binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
