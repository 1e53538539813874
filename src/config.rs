use std::env;

/// Browser profiles the proxy rotates through on upstream requests.
const DEFAULT_USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.5 Safari/605.1.15",
];

/// Application configuration loaded from environment variables
#[derive(Clone, Debug)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Verbose tracing when true
    pub debug: bool,
    /// Cache-Control max-age in seconds stamped on rewritten manifests
    pub cache_ttl: u64,
    /// Rewrite depth ceiling; at or beyond it manifests pass through untouched
    pub max_recursion: usize,
    /// User-Agent pool for upstream requests (never empty)
    pub user_agents: Vec<String>,
    /// Upstream request timeout in seconds
    pub fetch_timeout_secs: u64,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Never fails: unset or malformed values fall back to their defaults
    /// with a warning, so a bad environment cannot keep the proxy down.
    pub fn from_env() -> Self {
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env_parsed("PORT", 8080);
        let debug = debug_requested();

        let cache_ttl = env_parsed("CACHE_TTL", 86400);
        let max_recursion = env_parsed("MAX_RECURSION", 5);
        let fetch_timeout_secs = env_parsed("FETCH_TIMEOUT_SECS", 30);

        // USER_AGENTS is a JSON string array, e.g. '["UA one", "UA two"]';
        // blank entries are dropped so the pool only holds usable values.
        let user_agents = match env::var("USER_AGENTS") {
            Ok(raw) => match serde_json::from_str::<Vec<String>>(&raw) {
                Ok(list) => {
                    let list: Vec<String> = list
                        .into_iter()
                        .filter(|ua| !ua.trim().is_empty())
                        .collect();
                    if list.is_empty() {
                        tracing::warn!("USER_AGENTS has no usable entries, using the built-in pool");
                        default_user_agents()
                    } else {
                        list
                    }
                }
                Err(e) => {
                    tracing::warn!("Ignoring USER_AGENTS: not a JSON string array ({})", e);
                    default_user_agents()
                }
            },
            Err(_) => default_user_agents(),
        };

        Config {
            host,
            port,
            debug,
            cache_ttl,
            max_recursion,
            user_agents,
            fetch_timeout_secs,
        }
    }

    /// Socket address string the server binds to.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Whether DEBUG asks for verbose tracing. Split out of [`Config::from_env`]
/// so the log filter can be chosen before any config warnings are emitted.
pub fn debug_requested() -> bool {
    matches!(
        env::var("DEBUG").unwrap_or_default().to_lowercase().as_str(),
        "true" | "1"
    )
}

fn default_user_agents() -> Vec<String> {
    DEFAULT_USER_AGENTS.iter().map(|s| s.to_string()).collect()
}

/// Read an env var and parse it, warning and falling back on bad input.
fn env_parsed<T>(name: &str, default: T) -> T
where
    T: std::str::FromStr + std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => match raw.parse() {
            Ok(value) => value,
            Err(_) => {
                tracing::warn!("Ignoring {}={:?}: not a valid value, using {}", name, raw, default);
                default
            }
        },
        Err(_) => default,
    }
}
