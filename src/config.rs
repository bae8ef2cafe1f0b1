// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names, default values and the
//! [`AppConfig`] loaded from them at startup. A `.env` file in the working
//! directory is read first if present.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `DATA_DIR` | Directory holding the database file | `./data` |
//! | `JWT_SECRET` | HS256 token signing secret | `secretKey` |
//! | `JWT_EXPIRES_IN` | Token lifetime (`30s`, `15m`, `12h`, `7d` or seconds) | `7d` |
//! | `MAX_DEVICES_PER_USER` | Concurrently active devices per user | `5` |
//! | `BCRYPT_COST` | Password hashing cost | `12` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::path::PathBuf;

use chrono::{Duration, Utc};

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";

/// Environment variable name for the data directory path.
///
/// The database file `documents.redb` is created inside it.
pub const DATA_DIR_ENV: &str = "DATA_DIR";
pub const JWT_SECRET_ENV: &str = "JWT_SECRET";
pub const JWT_EXPIRES_IN_ENV: &str = "JWT_EXPIRES_IN";
pub const MAX_DEVICES_ENV: &str = "MAX_DEVICES_PER_USER";
pub const BCRYPT_COST_ENV: &str = "BCRYPT_COST";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_DATA_DIR: &str = "./data";
pub const DATABASE_FILE: &str = "documents.redb";

/// Fallback signing secret. Only suitable for local development.
pub const DEFAULT_JWT_SECRET: &str = "secretKey";
pub const DEFAULT_JWT_EXPIRES_IN: &str = "7d";
pub const DEFAULT_MAX_DEVICES_PER_USER: usize = 5;
pub const DEFAULT_BCRYPT_COST: u32 = 12;
/// bcrypt accepts costs 4 through 31.
const BCRYPT_COST_RANGE: std::ops::RangeInclusive<u32> = 4..=31;
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {name}: {value:?} ({reason})")]
    InvalidValue {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl LogFormat {
    /// Read `LOG_FORMAT`; anything other than `json` means pretty.
    pub fn from_env() -> Self {
        match std::env::var(LOG_FORMAT_ENV) {
            Ok(value) if value.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

/// Settings consumed by the auth service and token layer.
#[derive(Debug, Clone)]
pub struct AuthSettings {
    pub jwt_secret: String,
    pub token_expiry: Duration,
    pub max_devices_per_user: usize,
    pub bcrypt_cost: u32,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            jwt_secret: DEFAULT_JWT_SECRET.to_string(),
            token_expiry: Duration::days(7),
            max_devices_per_user: DEFAULT_MAX_DEVICES_PER_USER,
            bcrypt_cost: DEFAULT_BCRYPT_COST,
        }
    }
}

/// Full application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub data_dir: PathBuf,
    pub auth: AuthSettings,
}

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = lookup(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = parse_or(&lookup, PORT_ENV, DEFAULT_PORT)?;
        let data_dir = PathBuf::from(
            lookup(DATA_DIR_ENV).unwrap_or_else(|| DEFAULT_DATA_DIR.to_string()),
        );

        let jwt_secret = match lookup(JWT_SECRET_ENV) {
            Some(secret) if !secret.is_empty() => secret,
            _ => {
                tracing::warn!("{JWT_SECRET_ENV} not set, falling back to the development secret");
                DEFAULT_JWT_SECRET.to_string()
            }
        };

        let expires_in =
            lookup(JWT_EXPIRES_IN_ENV).unwrap_or_else(|| DEFAULT_JWT_EXPIRES_IN.to_string());
        let token_expiry =
            parse_duration(&expires_in).ok_or_else(|| ConfigError::InvalidValue {
                name: JWT_EXPIRES_IN_ENV,
                value: expires_in.clone(),
                reason: "expected a positive duration such as 7d, 12h, 30m or 3600".to_string(),
            })?;
        if Utc::now().checked_add_signed(token_expiry).is_none() {
            return Err(ConfigError::InvalidValue {
                name: JWT_EXPIRES_IN_ENV,
                value: expires_in,
                reason: "token expiry would overflow the timestamp range".to_string(),
            });
        }

        let max_devices_per_user =
            parse_or(&lookup, MAX_DEVICES_ENV, DEFAULT_MAX_DEVICES_PER_USER)?;
        if max_devices_per_user == 0 {
            return Err(ConfigError::InvalidValue {
                name: MAX_DEVICES_ENV,
                value: "0".to_string(),
                reason: "must allow at least one device".to_string(),
            });
        }

        let bcrypt_cost = parse_or(&lookup, BCRYPT_COST_ENV, DEFAULT_BCRYPT_COST)?;
        if !BCRYPT_COST_RANGE.contains(&bcrypt_cost) {
            return Err(ConfigError::InvalidValue {
                name: BCRYPT_COST_ENV,
                value: bcrypt_cost.to_string(),
                reason: format!(
                    "must be between {} and {}",
                    BCRYPT_COST_RANGE.start(),
                    BCRYPT_COST_RANGE.end()
                ),
            });
        }

        Ok(Self {
            host,
            port,
            data_dir,
            auth: AuthSettings {
                jwt_secret,
                token_expiry,
                max_devices_per_user,
                bcrypt_cost,
            },
        })
    }

    /// Path of the database file.
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(DATABASE_FILE)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidValue {
                name,
                value,
                reason: e.to_string(),
            }),
    }
}

/// Parse a duration like `7d`, `12h`, `30m`, `45s` or a bare number of
/// seconds. Zero and negative values are rejected.
pub fn parse_duration(input: &str) -> Option<Duration> {
    let input = input.trim();
    let (digits, unit) = match input.find(|c: char| !c.is_ascii_digit()) {
        Some(index) => input.split_at(index),
        None => (input, "s"),
    };

    let amount: i64 = digits.parse().ok()?;
    if amount <= 0 {
        return None;
    }

    match unit.trim() {
        "s" => Duration::try_seconds(amount),
        "m" => Duration::try_minutes(amount),
        "h" => Duration::try_hours(amount),
        "d" => Duration::try_days(amount),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = AppConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.host, DEFAULT_HOST);
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.auth.jwt_secret, DEFAULT_JWT_SECRET);
        assert_eq!(config.auth.token_expiry, Duration::days(7));
        assert_eq!(config.auth.max_devices_per_user, 5);
        assert_eq!(config.auth.bcrypt_cost, 12);
        assert_eq!(
            config.database_path(),
            PathBuf::from("./data").join(DATABASE_FILE)
        );
    }

    #[test]
    fn explicit_values_override_defaults() {
        let config = AppConfig::from_lookup(lookup_from(&[
            (PORT_ENV, "3000"),
            (DATA_DIR_ENV, "/var/lib/assets"),
            (JWT_SECRET_ENV, "s3cret"),
            (JWT_EXPIRES_IN_ENV, "12h"),
            (MAX_DEVICES_ENV, "2"),
            (BCRYPT_COST_ENV, "4"),
        ]))
        .unwrap();

        assert_eq!(config.bind_address(), "0.0.0.0:3000");
        assert_eq!(config.auth.jwt_secret, "s3cret");
        assert_eq!(config.auth.token_expiry, Duration::hours(12));
        assert_eq!(config.auth.max_devices_per_user, 2);
        assert_eq!(config.auth.bcrypt_cost, 4);
        assert_eq!(config.data_dir, PathBuf::from("/var/lib/assets"));
    }

    #[test]
    fn invalid_port_is_rejected() {
        let err = AppConfig::from_lookup(lookup_from(&[(PORT_ENV, "eighty")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { name: PORT_ENV, .. }));
    }

    #[test]
    fn invalid_expiry_and_cost_are_rejected() {
        assert!(AppConfig::from_lookup(lookup_from(&[(JWT_EXPIRES_IN_ENV, "7 weeks")])).is_err());
        assert!(AppConfig::from_lookup(lookup_from(&[(BCRYPT_COST_ENV, "2")])).is_err());
        assert!(AppConfig::from_lookup(lookup_from(&[(MAX_DEVICES_ENV, "0")])).is_err());
    }

    #[test]
    fn overflowing_expiry_is_rejected() {
        let err =
            AppConfig::from_lookup(lookup_from(&[(JWT_EXPIRES_IN_ENV, "100000000d")])).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue { name: JWT_EXPIRES_IN_ENV, .. }
        ));
    }

    #[test]
    fn parse_duration_units() {
        assert_eq!(parse_duration("7d"), Some(Duration::days(7)));
        assert_eq!(parse_duration("12h"), Some(Duration::hours(12)));
        assert_eq!(parse_duration("30m"), Some(Duration::minutes(30)));
        assert_eq!(parse_duration("45s"), Some(Duration::seconds(45)));
        assert_eq!(parse_duration("3600"), Some(Duration::seconds(3600)));
        assert_eq!(parse_duration("0d"), None);
        assert_eq!(parse_duration("d"), None);
        assert_eq!(parse_duration("5y"), None);
    }
}
