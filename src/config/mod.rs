use serde::Deserialize;
use config::{Config, ConfigError, Environment, File};

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub api: ApiConfig,
    #[serde(default)]
    pub polling: PollingConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    /// Base URL every resource path is appended to, e.g. `https://host/api`.
    pub base_url: String,
    pub user_agent: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PollingConfig {
    pub interval_ms: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    /// Where guarded pages send unauthenticated users.
    pub login_path: String,
    /// Bearer token seeded into the token store for admin writes.
    pub token: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub filter: String,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self { interval_ms: 5000 }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            login_path: "/admin/login".to_string(),
            token: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "deptportal=info".to_string(),
        }
    }
}

impl PollingConfig {
    pub fn interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.interval_ms.max(1))
    }
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        // A missing .env is the normal case outside local development
        dotenvy::dotenv().ok();

        let config = Config::builder()
            // Start with default values
            .set_default("api.base_url", "http://localhost:5000/api")?
            .set_default("api.user_agent", concat!("deptportal/", env!("CARGO_PKG_VERSION")))?
            .set_default("polling.interval_ms", 5000)?
            .set_default("auth.login_path", "/admin/login")?
            .set_default("logging.filter", "deptportal=info")?

            // Add config file if it exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))

            // Add environment variables (with DEPTPORTAL__ prefix, double underscore separates levels)
            .add_source(Environment::with_prefix("DEPTPORTAL").separator("__"))

            .build()?;

        config.try_deserialize()
    }

    /// Settings pointing at an explicit API base, everything else defaulted.
    pub fn for_base_url(base_url: impl Into<String>) -> Self {
        Self {
            api: ApiConfig {
                base_url: base_url.into(),
                ..Settings::default().api
            },
            ..Settings::default()
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                base_url: "http://localhost:5000/api".to_string(),
                user_agent: concat!("deptportal/", env!("CARGO_PKG_VERSION")).to_string(),
            },
            polling: PollingConfig::default(),
            auth: AuthConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}
