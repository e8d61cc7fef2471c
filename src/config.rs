use std::net::{IpAddr, Ipv4Addr, SocketAddr};

/// Application-level constants
pub const APP_NAME: &str = "Medtutor";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
/// Sampling temperature used for every tutor operation.
pub const DEFAULT_TEMPERATURE: f32 = 0.5;
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:3000";

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "medtutor=info,medtutor_lib=info,tower_http=info"
}

/// Errors raised while reading configuration from the environment.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {value:?} ({reason})")]
    InvalidValue {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Process-wide configuration, read once at startup and passed down
/// explicitly. Never mutated after construction.
#[derive(Clone)]
pub struct TutorConfig {
    /// `None` is allowed: a missing key surfaces as an upstream 401.
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub timeout_secs: Option<u64>,
    pub bind_addr: IpAddr,
    pub port: u16,
    pub allowed_origin: String,
    /// Optional topic length cap in characters. Unset means no cap.
    pub max_topic_chars: Option<usize>,
}

impl std::fmt::Debug for TutorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TutorConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("timeout_secs", &self.timeout_secs)
            .field("bind_addr", &self.bind_addr)
            .field("port", &self.port)
            .field("allowed_origin", &self.allowed_origin)
            .field("max_topic_chars", &self.max_topic_chars)
            .finish()
    }
}

impl Default for TutorConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            timeout_secs: None,
            bind_addr: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: DEFAULT_PORT,
            allowed_origin: DEFAULT_ALLOWED_ORIGIN.to_string(),
            max_topic_chars: None,
        }
    }
}

impl TutorConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();

        let temperature = match get("OPENAI_TEMPERATURE") {
            Some(raw) => {
                let value: f32 = parse_var("OPENAI_TEMPERATURE", &raw)?;
                if !(0.0..=2.0).contains(&value) {
                    return Err(ConfigError::InvalidValue {
                        var: "OPENAI_TEMPERATURE",
                        value: raw,
                        reason: "must be between 0.0 and 2.0".into(),
                    });
                }
                value
            }
            None => defaults.temperature,
        };

        let timeout_secs = get("OPENAI_TIMEOUT_SECS")
            .map(|raw| parse_var::<u64>("OPENAI_TIMEOUT_SECS", &raw))
            .transpose()?;

        let bind_addr = get("MEDTUTOR_BIND_ADDR")
            .map(|raw| parse_var::<IpAddr>("MEDTUTOR_BIND_ADDR", &raw))
            .transpose()?
            .unwrap_or(defaults.bind_addr);

        let port = get("MEDTUTOR_PORT")
            .map(|raw| parse_var::<u16>("MEDTUTOR_PORT", &raw))
            .transpose()?
            .unwrap_or(defaults.port);

        let max_topic_chars = match get("MEDTUTOR_MAX_TOPIC_CHARS") {
            Some(raw) => {
                let value: usize = parse_var("MEDTUTOR_MAX_TOPIC_CHARS", &raw)?;
                if value == 0 {
                    return Err(ConfigError::InvalidValue {
                        var: "MEDTUTOR_MAX_TOPIC_CHARS",
                        value: raw,
                        reason: "must be greater than zero".into(),
                    });
                }
                Some(value)
            }
            None => defaults.max_topic_chars,
        };

        let allowed_origin = match get("MEDTUTOR_ALLOWED_ORIGIN") {
            Some(origin) => {
                if !(origin.starts_with("http://") || origin.starts_with("https://")) {
                    return Err(ConfigError::InvalidValue {
                        var: "MEDTUTOR_ALLOWED_ORIGIN",
                        value: origin,
                        reason: "expected an http(s) origin".into(),
                    });
                }
                origin.trim_end_matches('/').to_string()
            }
            None => defaults.allowed_origin,
        };

        Ok(Self {
            api_key: get("OPENAI_API_KEY"),
            base_url: get("OPENAI_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.base_url),
            model: get("OPENAI_MODEL").unwrap_or(defaults.model),
            temperature,
            timeout_secs,
            bind_addr,
            port,
            allowed_origin,
            max_topic_chars,
        })
    }

    /// Socket address the HTTP server binds to.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }
}

fn parse_var<T>(var: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse::<T>().map_err(|e| ConfigError::InvalidValue {
        var,
        value: raw.to_string(),
        reason: e.to_string(),
    })
}
