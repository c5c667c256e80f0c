//! Store handle configuration.
//!
//! A [`StoreConfig`] names the database and collection a handle targets and the
//! per-operation timeout. It can be built in code or deserialized as part of an
//! application's own configuration, with the timeout given in whole seconds.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Per-operation timeout used when none is given.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Target location and deadline settings for a store handle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Name of the database holding the collection.
    pub database: String,
    /// Name of the document collection.
    pub collection: String,
    /// Deadline applied to each data operation. Connecting allows twice this
    /// for establishment and again for the liveness check.
    #[serde(with = "seconds", default = "default_timeout")]
    pub timeout: Duration,
}

impl StoreConfig {
    pub fn new(database: impl Into<String>, collection: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            collection: collection.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn builder(database: impl Into<String>, collection: impl Into<String>) -> StoreConfigBuilder {
        StoreConfigBuilder::new(database, collection)
    }

    /// Deadline for establishing a connection and, separately, for pinging it.
    pub fn connect_timeout(&self) -> Duration {
        self.timeout.saturating_mul(2)
    }
}

fn default_timeout() -> Duration {
    DEFAULT_TIMEOUT
}

/// Builder for [`StoreConfig`].
#[derive(Debug, Clone)]
pub struct StoreConfigBuilder {
    config: StoreConfig,
}

impl StoreConfigBuilder {
    pub fn new(database: impl Into<String>, collection: impl Into<String>) -> Self {
        Self {
            config: StoreConfig::new(database, collection),
        }
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    pub fn timeout_secs(self, secs: u64) -> Self {
        self.timeout(Duration::from_secs(secs))
    }

    pub fn build(self) -> StoreConfig {
        self.config
    }
}

mod seconds {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(timeout: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(timeout.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}
