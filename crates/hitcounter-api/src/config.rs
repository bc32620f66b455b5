use std::net::{AddrParseError, SocketAddr};

use thiserror::Error;

/// Index scanned for history unless `HITS_INDEX_NAME` says otherwise.
pub const DEFAULT_INDEX_NAME: &str = "millisec_epoch_time_stamp";

/// Local bind address unless `LISTEN_ADDR` says otherwise.
pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:3000";

/// Deployment environment. Only `dev` logs full requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Dev,
    Prod,
}

impl Environment {
    pub fn is_dev(self) -> bool {
        self == Environment::Dev
    }
}

/// Where the service receives requests from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Runtime {
    /// Invoked by the Lambda runtime API.
    Lambda,
    /// Plain HTTP server, for running outside AWS.
    Local { listen_addr: SocketAddr },
}

/// Service configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// DynamoDB table; `None` selects the in-memory store.
    pub table_name: Option<String>,
    /// Index used for history scans; `None` scans the base table.
    pub index_name: Option<String>,
    pub environment: Environment,
    pub runtime: Runtime,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("HITS_TABLE_NAME must be set when running on Lambda")]
    MissingTable,

    #[error("invalid LISTEN_ADDR {value:?}: {source}")]
    InvalidListenAddr {
        value: String,
        source: AddrParseError,
    },
}

impl Config {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through `lookup`, which maps a variable name to
    /// its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let table_name = lookup("HITS_TABLE_NAME").filter(|v| !v.is_empty());

        let index_name = match lookup("HITS_INDEX_NAME") {
            Some(v) if v.is_empty() => None,
            Some(v) => Some(v),
            None => Some(DEFAULT_INDEX_NAME.to_string()),
        };

        let environment = match lookup("HITCOUNTER_ENV").as_deref() {
            Some("dev") => Environment::Dev,
            _ => Environment::Prod,
        };

        let runtime = if lookup("AWS_LAMBDA_RUNTIME_API").is_some() {
            if table_name.is_none() {
                return Err(ConfigError::MissingTable);
            }
            Runtime::Lambda
        } else {
            let value = lookup("LISTEN_ADDR").unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string());
            let listen_addr = value
                .parse()
                .map_err(|source| ConfigError::InvalidListenAddr { value, source })?;
            Runtime::Local { listen_addr }
        };

        Ok(Self {
            table_name,
            index_name,
            environment,
            runtime,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_to_local_prod_in_memory() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.table_name, None);
        assert_eq!(config.index_name.as_deref(), Some(DEFAULT_INDEX_NAME));
        assert_eq!(config.environment, Environment::Prod);
        assert_eq!(
            config.runtime,
            Runtime::Local {
                listen_addr: DEFAULT_LISTEN_ADDR.parse().unwrap()
            }
        );
    }

    #[test]
    fn lambda_with_table() {
        let config = config_from(&[
            ("AWS_LAMBDA_RUNTIME_API", "127.0.0.1:9001"),
            ("HITS_TABLE_NAME", "Hits"),
            ("HITCOUNTER_ENV", "dev"),
        ])
        .unwrap();
        assert_eq!(config.runtime, Runtime::Lambda);
        assert_eq!(config.table_name.as_deref(), Some("Hits"));
        assert!(config.environment.is_dev());
    }

    #[test]
    fn lambda_requires_table() {
        let err = config_from(&[("AWS_LAMBDA_RUNTIME_API", "127.0.0.1:9001")]).unwrap_err();
        assert!(matches!(err, ConfigError::MissingTable));
    }

    #[test]
    fn empty_index_scans_base_table() {
        let config = config_from(&[("HITS_INDEX_NAME", "")]).unwrap();
        assert_eq!(config.index_name, None);
    }

    #[test]
    fn other_environments_are_prod() {
        let config = config_from(&[("HITCOUNTER_ENV", "staging")]).unwrap();
        assert!(!config.environment.is_dev());
    }

    #[test]
    fn rejects_bad_listen_addr() {
        let err = config_from(&[("LISTEN_ADDR", "nowhere")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidListenAddr { .. }));
    }
}
