//! Client configuration loaded via OrthoConfig.
//!
//! Values come from CLI flags, `MENU_ADMIN_*` environment variables and an
//! optional configuration file, in that order of precedence.

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

use crate::domain::{MissingTargetPolicy, SyncPolicy, WriteOrdering};

/// Backend address used when none is configured.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:3000/menu";

/// Settings for the menu synchronizer and its HTTP backend.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "MENU_ADMIN")]
pub struct ClientSettings {
    /// URL of the menu document.
    pub endpoint: Option<String>,
    /// Per-request timeout in seconds; unbounded when absent.
    pub request_timeout_secs: Option<u64>,
    /// Run one read-modify-write cycle at a time.
    #[ortho_config(default = false)]
    pub serialize_writes: bool,
    /// Fail updates and deletes whose target id is absent.
    #[ortho_config(default = false)]
    pub reject_missing_targets: bool,
}

impl ClientSettings {
    /// Return the configured endpoint, falling back to the default.
    ///
    /// # Errors
    ///
    /// Returns the parse error when the configured value is not a URL.
    pub fn endpoint(&self) -> Result<Url, url::ParseError> {
        Url::parse(self.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT))
    }

    /// Return the request timeout, if any.
    #[must_use]
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// Build the synchronizer policy from the boolean switches.
    #[must_use]
    pub const fn policy(&self) -> SyncPolicy {
        SyncPolicy {
            write_ordering: if self.serialize_writes {
                WriteOrdering::Serialized
            } else {
                WriteOrdering::Concurrent
            },
            missing_target: if self.reject_missing_targets {
                MissingTargetPolicy::Reject
            } else {
                MissingTargetPolicy::Ignore
            },
        }
    }
}
