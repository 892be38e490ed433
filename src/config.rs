//! Configuration types for media-gallery

use serde::{Deserialize, Serialize};
use std::{net::SocketAddr, path::PathBuf, time::Duration};
use utoipa::ToSchema;

use crate::error::{Error, Result};

/// Archive export configuration
///
/// Groups settings for the streaming ZIP export pipeline.
/// Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ExportConfig {
    /// Deflate compression level, 0 (store) to 9 (best) (default: 6)
    ///
    /// A mid-level setting balancing CPU cost against output size. This is
    /// a tunable, not a correctness property.
    #[serde(default = "default_compression_level")]
    pub compression_level: u32,

    /// Prefix for the generated archive filename (default: "media")
    ///
    /// The download is served as `<prefix>-<timestamp>.zip`.
    #[serde(default = "default_archive_prefix")]
    pub archive_prefix: String,

    /// Size in bytes of the in-memory pipe between the export task and the
    /// HTTP response body (default: 65536)
    ///
    /// This bounds how far the archive encoder can run ahead of a slow
    /// client; once the pipe is full, writes (and therefore remote reads)
    /// pause until the client catches up.
    #[serde(default = "default_stream_buffer_bytes")]
    pub stream_buffer_bytes: usize,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            compression_level: default_compression_level(),
            archive_prefix: default_archive_prefix(),
            stream_buffer_bytes: default_stream_buffer_bytes(),
        }
    }
}

/// Remote object store access configuration
///
/// Groups settings for fetching stored objects over HTTP(S).
/// Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct RemoteConfig {
    /// Per-fetch timeout covering the whole request, connect through body
    /// completion (default: 120 seconds)
    ///
    /// Bounds the worst-case latency one stalled remote response can add to
    /// an export run. Exactly one attempt is made per object; there is no
    /// retry.
    #[serde(default = "default_fetch_timeout", with = "duration_serde")]
    pub fetch_timeout: Duration,

    /// Connection establishment timeout (default: 10 seconds)
    #[serde(default = "default_connect_timeout", with = "duration_serde")]
    pub connect_timeout: Duration,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            fetch_timeout: default_fetch_timeout(),
            connect_timeout: default_connect_timeout(),
        }
    }
}

/// REST API configuration
///
/// Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiConfig {
    /// Address to bind to (default: 127.0.0.1:8700)
    #[serde(default = "default_bind_address")]
    pub bind_address: SocketAddr,

    /// Admin password for session login
    ///
    /// When `None`, login is disabled and admin routes reject every request.
    #[serde(default)]
    pub admin_password: Option<String>,

    /// Enable CORS for browser access (default: true)
    #[serde(default = "default_true")]
    pub cors_enabled: bool,

    /// Allowed CORS origins (default: ["*"])
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,

    /// Enable Swagger UI at /swagger-ui (default: true)
    #[serde(default = "default_true")]
    pub swagger_ui: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            admin_password: None,
            cors_enabled: true,
            cors_origins: default_cors_origins(),
            swagger_ui: true,
        }
    }
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct PersistenceConfig {
    /// Path to the SQLite database file (default: "./media-gallery.db")
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
        }
    }
}

/// Main configuration for the media gallery
///
/// Fields are organized into logical sub-configs:
/// - [`export`](ExportConfig) — archive encoding and streaming
/// - [`remote`](RemoteConfig) — remote object store access
/// - [`api`](ApiConfig) — REST API server
/// - [`persistence`](PersistenceConfig) — database location
///
/// Sub-config fields are flattened for serialization, so the JSON/TOML
/// format stays flat (no nesting), except `persistence` which keeps its own
/// section.
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct Config {
    /// Archive export settings
    #[serde(flatten)]
    pub export: ExportConfig,

    /// Remote object store settings
    #[serde(flatten)]
    pub remote: RemoteConfig,

    /// REST API settings
    #[serde(flatten)]
    pub api: ApiConfig,

    /// Data storage settings
    #[serde(default)]
    pub persistence: PersistenceConfig,
}

impl Config {
    /// Validate configuration values
    ///
    /// Returns a [`Error::Config`] naming the offending key on failure.
    pub fn validate(&self) -> Result<()> {
        if self.export.compression_level > 9 {
            return Err(Error::Config {
                message: format!(
                    "compression level must be 0-9, got {}",
                    self.export.compression_level
                ),
                key: Some("compression_level".to_string()),
            });
        }

        if self.export.stream_buffer_bytes == 0 {
            return Err(Error::Config {
                message: "stream buffer size must be non-zero".to_string(),
                key: Some("stream_buffer_bytes".to_string()),
            });
        }

        if self.export.archive_prefix.is_empty() {
            return Err(Error::Config {
                message: "archive filename prefix must not be empty".to_string(),
                key: Some("archive_prefix".to_string()),
            });
        }

        if self.remote.fetch_timeout.is_zero() {
            return Err(Error::Config {
                message: "fetch timeout must be non-zero".to_string(),
                key: Some("fetch_timeout".to_string()),
            });
        }

        Ok(())
    }
}

fn default_compression_level() -> u32 {
    6
}

fn default_archive_prefix() -> String {
    "media".to_string()
}

fn default_stream_buffer_bytes() -> usize {
    64 * 1024
}

fn default_fetch_timeout() -> Duration {
    Duration::from_secs(120)
}

fn default_connect_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_bind_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 8700))
}

fn default_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
}

fn default_true() -> bool {
    true
}

fn default_database_path() -> PathBuf {
    PathBuf::from("./media-gallery.db")
}

// Duration serialization helper (stores durations as whole seconds)
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        config.validate().unwrap();

        assert_eq!(config.export.compression_level, 6);
        assert_eq!(config.export.archive_prefix, "media");
        assert_eq!(config.remote.fetch_timeout, Duration::from_secs(120));
        assert!(config.api.admin_password.is_none());
    }

    #[test]
    fn rejects_out_of_range_compression_level() {
        let config = Config {
            export: ExportConfig {
                compression_level: 10,
                ..Default::default()
            },
            ..Default::default()
        };

        let err = config.validate().unwrap_err();
        match err {
            Error::Config { key, .. } => assert_eq!(key.as_deref(), Some("compression_level")),
            other => panic!("expected Config error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_zero_stream_buffer() {
        let config = Config {
            export: ExportConfig {
                stream_buffer_bytes: 0,
                ..Default::default()
            },
            ..Default::default()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_empty_archive_prefix() {
        let config = Config {
            export: ExportConfig {
                archive_prefix: String::new(),
                ..Default::default()
            },
            ..Default::default()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn duration_serde_round_trips_as_seconds() {
        let config = Config::default();
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["fetch_timeout"], 120);
        assert_eq!(json["connect_timeout"], 10);

        let parsed: Config = serde_json::from_value(json).unwrap();
        assert_eq!(parsed.remote.fetch_timeout, Duration::from_secs(120));
    }

    #[test]
    fn deserializes_from_empty_object() {
        // Every field has a serde default, so {} is a full config
        let config: Config = serde_json::from_str("{}").unwrap();
        config.validate().unwrap();
        assert_eq!(config.persistence.database_path, default_database_path());
    }
}
