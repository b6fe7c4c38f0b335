// Copyright 2026 the Settee Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Connection options.
//!
//! Options are plain string key/value pairs, set on the session and overridden per read or
//! write. [`ConnectorOptions::resolve`] validates a merged set into typed values.

use std::collections::BTreeMap;

use settee_store::{Credentials, Endpoint, Protocol, Selector};

/// Account host. Required.
pub const HOST: &str = "cloudant.host";
/// `https` (default) or `http`.
pub const PROTOCOL: &str = "cloudant.protocol";
/// Account user name.
pub const USERNAME: &str = "cloudant.username";
/// Account password.
pub const PASSWORD: &str = "cloudant.password";
/// Load mode: `_all_docs` (default) or `_changes`.
pub const ENDPOINT: &str = "cloudant.endpoint";
/// Whether change-feed pages are dropped as soon as they are folded. Defaults to `true`.
pub const UNPERSIST: &str = "streaming.unpersist";
/// Whether a write may create its destination database. Defaults to `false`.
pub const CREATE_DB_ON_SAVE: &str = "createDBOnSave";
/// Write batch size and change-feed page size. Defaults to [`DEFAULT_BULK_SIZE`].
pub const BULK_SIZE: &str = "bulkSize";
/// Documents sampled for schema inference; `-1` (default) samples all of them.
pub const SCHEMA_SAMPLE_SIZE: &str = "schemaSampleSize";
/// JSON selector applied to the change feed.
pub const SELECTOR: &str = "selector";

/// Default for [`BULK_SIZE`].
pub const DEFAULT_BULK_SIZE: usize = 200;

const UNPERSIST_ALIAS: &str = "spark.streaming.unpersist";

/// Errors in the option set.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A required option is not set.
    #[error("missing required option `{0}`")]
    MissingOption(&'static str),
    /// An option is set to a value it cannot take.
    #[error("invalid value `{value}` for option `{key}`: {reason}")]
    InvalidOption {
        /// Option key.
        key: &'static str,
        /// Value as given.
        value: String,
        /// What was expected.
        reason: String,
    },
    /// Only one of user name and password is set.
    #[error("`{USERNAME}` and `{PASSWORD}` must be set together")]
    IncompleteCredentials,
    /// The session was built without a connector.
    #[error("no connector configured")]
    MissingConnector,
}

/// A string option map.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Options {
    entries: BTreeMap<String, String>,
}

impl Options {
    /// Creates an empty option map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `key` to `value`, replacing any earlier value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let key = if key == UNPERSIST_ALIAS {
            UNPERSIST.to_owned()
        } else {
            key
        };
        self.entries.insert(key, value.into());
    }

    /// Builder form of [`Options::set`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    /// Returns the value of `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Returns these options with every entry of `overrides` applied on top.
    pub fn overlay(&self, overrides: &Self) -> Self {
        let mut out = self.clone();
        for (k, v) in &overrides.entries {
            out.entries.insert(k.clone(), v.clone());
        }
        out
    }

    /// Iterates entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// How a load reads the collection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LoadMode {
    /// Read every current document at once.
    #[default]
    Snapshot,
    /// Replay the change feed from inception, page by page.
    ChangeFeed,
}

/// A validated option set.
#[derive(Clone, Debug, PartialEq)]
pub struct ConnectorOptions {
    /// Where and as whom to connect.
    pub endpoint: Endpoint,
    /// Load mode.
    pub mode: LoadMode,
    /// Drop change-feed pages once folded.
    pub unpersist: bool,
    /// Create missing write destinations.
    pub create_db_on_save: bool,
    /// Write batch size and change-feed page size.
    pub bulk_size: usize,
    /// Documents sampled for inference; `None` samples all.
    pub schema_sample_size: Option<usize>,
    /// Change-feed filter.
    pub selector: Option<Selector>,
}

impl ConnectorOptions {
    /// Validates `options`.
    pub fn resolve(options: &Options) -> Result<Self, ConfigError> {
        let host = options
            .get(HOST)
            .map(str::trim)
            .filter(|h| !h.is_empty())
            .ok_or(ConfigError::MissingOption(HOST))?;

        let protocol = match options.get(PROTOCOL).map(str::trim) {
            None => Protocol::default(),
            Some(p) if p.eq_ignore_ascii_case("https") => Protocol::Https,
            Some(p) if p.eq_ignore_ascii_case("http") => Protocol::Http,
            Some(p) => return Err(invalid(PROTOCOL, p, "expected `https` or `http`")),
        };

        let credentials = match (options.get(USERNAME), options.get(PASSWORD)) {
            (Some(user), Some(password)) => Some(Credentials::new(user, password)),
            (None, None) => None,
            _ => return Err(ConfigError::IncompleteCredentials),
        };

        let mode = match options.get(ENDPOINT).map(str::trim) {
            None | Some("_all_docs" | "default") => LoadMode::Snapshot,
            Some("_changes" | "change-feed") => LoadMode::ChangeFeed,
            Some(e) => {
                return Err(invalid(
                    ENDPOINT,
                    e,
                    "expected `_all_docs` or `_changes`",
                ));
            }
        };

        let bulk_size = match options.get(BULK_SIZE) {
            None => DEFAULT_BULK_SIZE,
            Some(v) => match v.trim().parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => return Err(invalid(BULK_SIZE, v, "expected a positive integer")),
            },
        };

        let schema_sample_size = match options.get(SCHEMA_SAMPLE_SIZE) {
            None => None,
            Some(v) => match v.trim().parse::<i64>() {
                Ok(-1) => None,
                Ok(n) if n > 0 => Some(usize::try_from(n).unwrap_or(usize::MAX)),
                _ => {
                    return Err(invalid(
                        SCHEMA_SAMPLE_SIZE,
                        v,
                        "expected -1 or a positive integer",
                    ));
                }
            },
        };

        let selector = options
            .get(SELECTOR)
            .map(|s| Selector::parse_str(s).map_err(|e| invalid(SELECTOR, s, &e.to_string())))
            .transpose()?;

        let mut endpoint = Endpoint::new(host).with_protocol(protocol);
        if let Some(credentials) = credentials {
            endpoint = endpoint.with_credentials(credentials);
        }

        Ok(Self {
            endpoint,
            mode,
            unpersist: flag(options, UNPERSIST, true)?,
            create_db_on_save: flag(options, CREATE_DB_ON_SAVE, false)?,
            bulk_size,
            schema_sample_size,
            selector,
        })
    }
}

fn flag(options: &Options, key: &'static str, default: bool) -> Result<bool, ConfigError> {
    match options.get(key).map(str::trim) {
        None => Ok(default),
        Some(v) if v.eq_ignore_ascii_case("true") => Ok(true),
        Some(v) if v.eq_ignore_ascii_case("false") => Ok(false),
        Some(v) => Err(invalid(key, v, "expected `true` or `false`")),
    }
}

fn invalid(key: &'static str, value: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidOption {
        key,
        value: value.to_owned(),
        reason: reason.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn host() -> Options {
        Options::new().with(HOST, "examples.cloudant.com")
    }

    #[test]
    fn defaults() {
        let o = ConnectorOptions::resolve(&host()).unwrap();
        assert_eq!(o.endpoint, Endpoint::new("examples.cloudant.com"));
        assert_eq!(o.mode, LoadMode::Snapshot);
        assert!(o.unpersist);
        assert!(!o.create_db_on_save);
        assert_eq!(o.bulk_size, DEFAULT_BULK_SIZE);
        assert_eq!(o.schema_sample_size, None);
        assert!(o.selector.is_none());
    }

    #[test]
    fn change_feed_options() {
        let options = host()
            .with(ENDPOINT, "_changes")
            .with("spark.streaming.unpersist", "false")
            .with(BULK_SIZE, "50")
            .with(SCHEMA_SAMPLE_SIZE, "10")
            .with(SELECTOR, r#"{"rep": "Ben"}"#);
        let o = ConnectorOptions::resolve(&options).unwrap();
        assert_eq!(o.mode, LoadMode::ChangeFeed);
        assert!(!o.unpersist);
        assert_eq!(o.bulk_size, 50);
        assert_eq!(o.schema_sample_size, Some(10));
        assert!(o.selector.is_some());
    }

    #[test]
    fn overlay_replaces_session_values() {
        let session = host().with(CREATE_DB_ON_SAVE, "false");
        let write = Options::new()
            .with(HOST, "user.cloudant.com")
            .with(USERNAME, "user")
            .with(PASSWORD, "pw")
            .with(CREATE_DB_ON_SAVE, "TRUE");
        let o = ConnectorOptions::resolve(&session.overlay(&write)).unwrap();
        assert_eq!(o.endpoint.host, "user.cloudant.com");
        assert_eq!(o.endpoint.credentials, Some(Credentials::new("user", "pw")));
        assert!(o.create_db_on_save);
    }

    #[test]
    fn invalid_options_are_rejected() {
        assert_eq!(
            ConnectorOptions::resolve(&Options::new()),
            Err(ConfigError::MissingOption(HOST))
        );
        for (key, value) in [
            (PROTOCOL, "ftp"),
            (ENDPOINT, "_find"),
            (UNPERSIST, "yes"),
            (BULK_SIZE, "0"),
            (SCHEMA_SAMPLE_SIZE, "0"),
            (SCHEMA_SAMPLE_SIZE, "-2"),
            (SELECTOR, "[1]"),
        ] {
            let err = ConnectorOptions::resolve(&host().with(key, value)).unwrap_err();
            assert!(
                matches!(&err, ConfigError::InvalidOption { key: k, .. } if *k == key),
                "{key}={value}: {err}"
            );
        }
        assert_eq!(
            ConnectorOptions::resolve(&host().with(USERNAME, "u")),
            Err(ConfigError::IncompleteCredentials)
        );
    }
}
