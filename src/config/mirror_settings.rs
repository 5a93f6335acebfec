use std::{collections::BTreeMap, path::PathBuf};

use serde::Deserialize;

use crate::{consts::DEFAULT_CONFIG_PATH, Endpoint, Error, HostCapability, RenderOptions, ServerOverrides};

/// Settings for generating mirror configuration, loaded from a toml file,
///
/// ```toml
/// config_path = "/etc/containerd/certs.d"
/// registries = ["https://docker.io", "https://ghcr.io"]
/// mirrors = ["http://127.0.0.1:30020"]
/// capabilities = "pull, resolve"
///
/// [server_overrides]
/// "docker.io" = "https://registry-1.docker.io"
/// ```
///
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct MirrorSettings {
    /// Directory containerd reads registry hosts configuration from
    pub config_path: Option<PathBuf>,
    /// Registries to mirror
    pub registries: Vec<String>,
    /// Mirrors in priority order, the first one is the primary mirror
    pub mirrors: Vec<String>,
    /// Capabilities granted to mirrors, ex. `pull, resolve`
    pub capabilities: Option<String>,
    /// Registry hosts that are served from a different server, added on top of the defaults
    pub server_overrides: BTreeMap<String, String>,
}

impl MirrorSettings {
    /// Parses settings from toml content,
    ///
    pub fn try_load_content(content: impl AsRef<str>) -> Result<Self, Error> {
        Ok(toml::from_str(content.as_ref())?)
    }

    /// Merges settings on top of this one, set values in other win,
    ///
    pub fn merge(mut self, other: MirrorSettings) -> Self {
        if other.config_path.is_some() {
            self.config_path = other.config_path;
        }

        if !other.registries.is_empty() {
            self.registries = other.registries;
        }

        if !other.mirrors.is_empty() {
            self.mirrors = other.mirrors;
        }

        if other.capabilities.is_some() {
            self.capabilities = other.capabilities;
        }

        self.server_overrides.extend(other.server_overrides);
        self
    }

    /// Returns the config path, defaulting to containerd's standard location
    pub fn config_path(&self) -> PathBuf {
        self.config_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
    }

    /// Parses the registry urls, they are validated when used
    pub fn registry_endpoints(&self) -> Result<Vec<Endpoint>, Error> {
        Endpoint::parse_all(&self.registries)
    }

    /// Parses the mirror urls
    pub fn mirror_endpoints(&self) -> Result<Vec<Endpoint>, Error> {
        Endpoint::parse_all(&self.mirrors)
    }

    /// Returns render options w/ capabilities and server overrides applied,
    ///
    pub fn render_options(&self) -> Result<RenderOptions, Error> {
        let capabilities = match self.capabilities.as_ref() {
            Some(capabilities) => HostCapability::parse_list(capabilities)?,
            None => HostCapability::defaults(),
        };

        let server_overrides = self
            .server_overrides
            .iter()
            .fold(ServerOverrides::default(), |overrides, (host, server)| {
                overrides.with_override(host, server)
            });

        Ok(RenderOptions {
            server_overrides,
            capabilities,
        })
    }
}
