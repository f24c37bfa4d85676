use retail_core::{Result, RetailError};
use retail_session::{DEFAULT_MAX_HISTORY, DEFAULT_TTL_HOURS};
use std::net::SocketAddr;

/// Settings consumed by the session store and chatbot at construction
/// time.
#[derive(Debug, Clone)]
pub struct ChatbotConfig {
    pub ttl_hours: i64,
    pub max_history: usize,
}

impl Default for ChatbotConfig {
    fn default() -> Self {
        Self { ttl_hours: DEFAULT_TTL_HOURS, max_history: DEFAULT_MAX_HISTORY }
    }
}

impl ChatbotConfig {
    /// Read `SESSION_TTL_HOURS` and `MAX_CONVERSATION_HISTORY` from the
    /// environment, keeping defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        Self {
            ttl_hours: env_parse("SESSION_TTL_HOURS", DEFAULT_TTL_HOURS),
            max_history: env_parse("MAX_CONVERSATION_HISTORY", DEFAULT_MAX_HISTORY),
        }
    }

    pub fn with_ttl_hours(mut self, ttl_hours: i64) -> Self {
        self.ttl_hours = ttl_hours;
        self
    }

    pub fn with_max_history(mut self, max_history: usize) -> Self {
        self.max_history = max_history;
        self
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Allowed origins for CORS; empty means allow all (development).
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "0.0.0.0".to_string(), port: 8000, allowed_origins: Vec::new() }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: std::env::var("API_HOST").unwrap_or(defaults.host),
            port: env_parse("API_PORT", defaults.port),
            allowed_origins: std::env::var("CORS_ORIGINS")
                .map(|raw| raw.split(',').map(|o| o.trim().to_string()).collect())
                .unwrap_or_default(),
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_allowed_origins(mut self, origins: Vec<String>) -> Self {
        self.allowed_origins = origins;
        self
    }

    pub fn addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|_| RetailError::Config(format!("invalid bind address {}:{}", self.host, self.port)))
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key).ok().and_then(|raw| raw.parse().ok()).unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let chatbot = ChatbotConfig::default();
        assert_eq!(chatbot.ttl_hours, 24);
        assert_eq!(chatbot.max_history, 50);

        let server = ServerConfig::default();
        assert_eq!(server.port, 8000);
        assert!(server.allowed_origins.is_empty());
    }

    #[test]
    fn test_builders() {
        let chatbot = ChatbotConfig::default().with_ttl_hours(1).with_max_history(5);
        assert_eq!(chatbot.ttl_hours, 1);
        assert_eq!(chatbot.max_history, 5);

        let server = ServerConfig::default()
            .with_port(9000)
            .with_allowed_origins(vec!["http://localhost:3000".to_string()]);
        assert_eq!(server.port, 9000);
        assert_eq!(server.allowed_origins.len(), 1);
    }

    #[test]
    fn test_addr() {
        let server = ServerConfig::default().with_port(8080);
        assert_eq!(server.addr().unwrap().port(), 8080);

        let bad = ServerConfig { host: "not an address".to_string(), ..ServerConfig::default() };
        assert!(bad.addr().is_err());
    }
}
