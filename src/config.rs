use std::env;

use thiserror::Error;
use url::Url;

pub const API_KEY_VAR: &str = "NASA_API_KEY";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_RELAY_URL: &str = "http://localhost:3000";
pub const DEFAULT_APOD_API_URL: &str = "https://api.nasa.gov/planetary/apod";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("PORT must be a number between 1 and 65535, got {0:?}")]
    InvalidPort(String),
    #[error("{name} is not a valid url: {value:?}")]
    InvalidUrl { name: &'static str, value: String },
}

fn env_var(name: &str) -> Option<String> {
    env::var(name).ok()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    /// Name of the variable the relay reads the secret from on every request
    pub key_var: String,
}

impl ServerConfig {
    /// Loads `.env` once, then reads the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(env_var)
    }

    pub fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Result<Self, ConfigError> {
        let port = match lookup("PORT") {
            None => DEFAULT_PORT,
            Some(raw) => match raw.trim().parse::<u16>() {
                Ok(port) if port > 0 => port,
                _ => return Err(ConfigError::InvalidPort(raw)),
            },
        };
        Ok(Self {
            port,
            key_var: API_KEY_VAR.to_owned(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub relay_url: Url,
    pub apod_api_url: Url,
    pub user_agent: String,
}

fn parse_url(name: &'static str, value: String) -> Result<Url, ConfigError> {
    Url::parse(value.trim()).map_err(|_| ConfigError::InvalidUrl { name, value })
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(env_var)
    }

    pub fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Result<Self, ConfigError> {
        let relay_url = lookup("RELAY_URL").unwrap_or_else(|| DEFAULT_RELAY_URL.to_owned());
        let apod_api_url =
            lookup("APOD_API_URL").unwrap_or_else(|| DEFAULT_APOD_API_URL.to_owned());
        let user_agent = lookup("USER_AGENT")
            .filter(|agent| !agent.trim().is_empty())
            .unwrap_or_else(|| format!("apod/{}", env!("CARGO_PKG_VERSION")));
        Ok(Self {
            relay_url: parse_url("RELAY_URL", relay_url)?,
            apod_api_url: parse_url("APOD_API_URL", apod_api_url)?,
            user_agent,
        })
    }

    pub fn with_relay_url(mut self, relay_url: &str) -> Result<Self, ConfigError> {
        self.relay_url = parse_url("--relay-url", relay_url.to_owned())?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn server_defaults_to_port_3000() {
        let config = ServerConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.key_var, "NASA_API_KEY");
    }

    #[test]
    fn server_reads_port() {
        let config = ServerConfig::from_lookup(lookup_from(&[("PORT", "8080")])).unwrap();
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn server_rejects_garbage_port() {
        let err = ServerConfig::from_lookup(lookup_from(&[("PORT", "http")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPort(raw) if raw == "http"));
        assert!(ServerConfig::from_lookup(lookup_from(&[("PORT", "0")])).is_err());
    }

    #[test]
    fn client_defaults() {
        let config = ClientConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.relay_url.as_str(), "http://localhost:3000/");
        assert_eq!(
            config.apod_api_url.as_str(),
            "https://api.nasa.gov/planetary/apod"
        );
        assert!(config.user_agent.starts_with("apod/"));
    }

    #[test]
    fn client_overrides() {
        let config = ClientConfig::from_lookup(lookup_from(&[
            ("RELAY_URL", "http://relay.internal:9000"),
            ("USER_AGENT", "stargazer"),
        ]))
        .unwrap()
        .with_relay_url("http://127.0.0.1:4000")
        .unwrap();
        assert_eq!(config.relay_url.as_str(), "http://127.0.0.1:4000/");
        assert_eq!(config.user_agent, "stargazer");
    }

    #[test]
    fn client_rejects_bad_urls() {
        let err = ClientConfig::from_lookup(lookup_from(&[("APOD_API_URL", "not a url")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl { name: "APOD_API_URL", .. }));
    }

    #[test]
    fn client_reads_process_environment() {
        env::set_var("APOD_API_URL", "http://apod.internal/planetary/apod");
        let config = ClientConfig::from_env().unwrap();
        env::remove_var("APOD_API_URL");
        assert_eq!(
            config.apod_api_url.as_str(),
            "http://apod.internal/planetary/apod"
        );
    }
}
