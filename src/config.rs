// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names and default values used
//! throughout the application. Configuration is loaded from the environment
//! (and an optional `.env` file) once at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `JWT_SECRET` | HMAC secret used to sign and verify tokens | Required |
//! | `DATA_DIR` | Directory holding the database file | `./data` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8200` |
//! | `TLS_CERT_PATH` | PEM certificate chain, enables HTTPS with `TLS_KEY_PATH` | Optional |
//! | `TLS_KEY_PATH` | PEM private key | Optional |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

/// Environment variable name for the token signing secret.
///
/// Never logged. An empty value is rejected at startup.
pub const JWT_SECRET_ENV: &str = "JWT_SECRET";

/// Environment variable name for the data directory path.
pub const DATA_DIR_ENV: &str = "DATA_DIR";
pub const DEFAULT_DATA_DIR: &str = "./data";

/// File name of the database inside the data directory.
pub const DATABASE_FILE: &str = "social.redb";

pub const HOST_ENV: &str = "HOST";
pub const DEFAULT_HOST: &str = "0.0.0.0";

pub const PORT_ENV: &str = "PORT";
pub const DEFAULT_PORT: u16 = 8200;

pub const TLS_CERT_PATH_ENV: &str = "TLS_CERT_PATH";
pub const TLS_KEY_PATH_ENV: &str = "TLS_KEY_PATH";

/// Environment variable selecting the log output format.
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

/// Errors raised while reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },

    #[error("TLS_CERT_PATH and TLS_KEY_PATH must be set together")]
    IncompleteTls,
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

impl LogFormat {
    /// Read `LOG_FORMAT`; anything other than `json` means pretty.
    pub fn from_env() -> Self {
        match std::env::var(LOG_FORMAT_ENV) {
            Ok(value) if value.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Pretty,
        }
    }
}

/// Certificate and key used to serve HTTPS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsPaths {
    pub cert: PathBuf,
    pub key: PathBuf,
}

/// Server settings resolved at startup.
#[derive(Clone)]
pub struct ServerConfig {
    pub jwt_secret: String,
    pub data_dir: PathBuf,
    pub bind_addr: SocketAddr,
    pub tls: Option<TlsPaths>,
}

impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("jwt_secret", &"<redacted>")
            .field("data_dir", &self.data_dir)
            .field("bind_addr", &self.bind_addr)
            .field("tls", &self.tls)
            .finish()
    }
}

impl ServerConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let jwt_secret = var(JWT_SECRET_ENV).ok_or(ConfigError::Missing(JWT_SECRET_ENV))?;

        let data_dir = PathBuf::from(var(DATA_DIR_ENV).unwrap_or_else(|| DEFAULT_DATA_DIR.to_string()));

        let host = var(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string());
        let ip: IpAddr = host.parse().map_err(|_| ConfigError::Invalid {
            name: HOST_ENV,
            value: host.clone(),
        })?;

        let port = match var(PORT_ENV) {
            Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
                name: PORT_ENV,
                value,
            })?,
            None => DEFAULT_PORT,
        };

        let tls = match (var(TLS_CERT_PATH_ENV), var(TLS_KEY_PATH_ENV)) {
            (Some(cert), Some(key)) => Some(TlsPaths {
                cert: cert.into(),
                key: key.into(),
            }),
            (None, None) => None,
            _ => return Err(ConfigError::IncompleteTls),
        };

        Ok(Self {
            jwt_secret,
            data_dir,
            bind_addr: SocketAddr::new(ip, port),
            tls,
        })
    }

    /// Full path of the database file.
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(DATABASE_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_apply_when_only_secret_is_set() {
        let config = load(&[(JWT_SECRET_ENV, "s3cret")]).unwrap();

        assert_eq!(config.jwt_secret, "s3cret");
        assert_eq!(config.data_dir, PathBuf::from("./data"));
        assert_eq!(config.bind_addr, "0.0.0.0:8200".parse().unwrap());
        assert_eq!(config.database_path(), PathBuf::from("./data/social.redb"));
        assert!(config.tls.is_none());
    }

    #[test]
    fn secret_is_required() {
        assert!(matches!(load(&[]), Err(ConfigError::Missing(JWT_SECRET_ENV))));
        assert!(matches!(
            load(&[(JWT_SECRET_ENV, "  ")]),
            Err(ConfigError::Missing(JWT_SECRET_ENV))
        ));
    }

    #[test]
    fn overrides_are_read() {
        let config = load(&[
            (JWT_SECRET_ENV, "s"),
            (DATA_DIR_ENV, "/var/lib/social"),
            (HOST_ENV, "127.0.0.1"),
            (PORT_ENV, "9000"),
            (TLS_CERT_PATH_ENV, "/certs/cert.pem"),
            (TLS_KEY_PATH_ENV, "/certs/key.pem"),
        ])
        .unwrap();

        assert_eq!(config.bind_addr, "127.0.0.1:9000".parse().unwrap());
        assert_eq!(config.database_path(), PathBuf::from("/var/lib/social/social.redb"));
        assert_eq!(
            config.tls,
            Some(TlsPaths {
                cert: "/certs/cert.pem".into(),
                key: "/certs/key.pem".into(),
            })
        );
    }

    #[test]
    fn invalid_port_is_rejected() {
        let result = load(&[(JWT_SECRET_ENV, "s"), (PORT_ENV, "eighty")]);
        assert!(matches!(result, Err(ConfigError::Invalid { name: PORT_ENV, .. })));
    }

    #[test]
    fn tls_needs_both_paths() {
        let result = load(&[(JWT_SECRET_ENV, "s"), (TLS_CERT_PATH_ENV, "/c.pem")]);
        assert!(matches!(result, Err(ConfigError::IncompleteTls)));
    }

    #[test]
    fn debug_output_redacts_secret() {
        let config = load(&[(JWT_SECRET_ENV, "do-not-print")]).unwrap();
        assert!(!format!("{config:?}").contains("do-not-print"));
    }
}
