//! Client configuration.

use serde::Deserialize;

/// Connection settings for the job manager REST API.
#[derive(Debug, Clone, Deserialize)]
pub struct ClusterConfig {
    /// Base URL of the job manager (e.g. `http://jobmanager:8081`).
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// HTTP basic auth username, when the cluster sits behind an
    /// authenticating proxy.
    #[serde(default)]
    pub basic_auth_username: Option<String>,

    /// HTTP basic auth password.
    #[serde(default)]
    pub basic_auth_password: Option<String>,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:8081".to_owned()
}

const fn default_timeout_secs() -> u64 {
    10
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            basic_auth_username: None,
            basic_auth_password: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ClusterConfig {
    /// Basic auth credentials, when a username is configured.
    ///
    /// A username with no password sends an empty password, matching what
    /// most proxies in front of a job manager expect.
    #[must_use]
    pub fn basic_auth(&self) -> Option<(String, String)> {
        self.basic_auth_username.as_ref().map(|user| {
            (
                user.clone(),
                self.basic_auth_password.clone().unwrap_or_default(),
            )
        })
    }
}
