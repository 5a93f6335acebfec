use std::{fmt::Display, path::Path};

use toml_edit::{table, value, Document};
use tracing::{event, Level};

use crate::Error;

/// Containerd 1.x cri plugin id
const CRI_PLUGIN: &str = "io.containerd.grpc.v1.cri";

/// Containerd 2.x cri images plugin id
const CRI_IMAGES_PLUGIN: &str = "io.containerd.cri.v1.images";

/// Pointer struct for handling /etc/containerd/config.toml
///
pub struct ContainerdConfig {
    /// Internal toml document for editing config,
    ///
    document: toml_edit::Document,
}

impl ContainerdConfig {
    /// Returns an empty default containerd config,
    ///
    pub fn new() -> Self {
        Self {
            document: Document::new(),
        }
    }

    /// Tries to load content as a toml document, if successful overrides the current document,
    ///
    pub fn try_load_content(mut self, content: impl AsRef<str>) -> Result<Self, Error> {
        let document = content.as_ref().parse::<Document>()?;

        self.document = document;
        Ok(self)
    }

    /// Returns the registry config path containerd reads hosts.toml files from, if set,
    ///
    /// Checks the containerd 2.x images plugin first, then the 1.x cri plugin.
    ///
    pub fn hosts_config_path(&self) -> Option<&str> {
        [CRI_IMAGES_PLUGIN, CRI_PLUGIN].iter().find_map(|plugin| {
            self.document
                .get("plugins")
                .and_then(|p| p.get(*plugin))
                .and_then(|p| p.get("registry"))
                .and_then(|r| r.get("config_path"))
                .and_then(|c| c.as_str())
                .filter(|c| !c.is_empty())
        })
    }

    /// Verifies that containerd will read mirror configuration written under config_path,
    ///
    /// The config path may list several directories separated by `:`, one of them must be config_path.
    ///
    pub fn verify_hosts_config(&self, config_path: impl AsRef<Path>) -> Result<(), Error> {
        let expected = config_path.as_ref();

        match self.hosts_config_path() {
            Some(current) if current.split(':').any(|p| Path::new(p) == expected) => {
                event!(Level::DEBUG, "Containerd config path {current} includes {:?}", expected);
                Ok(())
            }
            Some(current) => Err(Error::invalid_runtime_config(format!(
                "containerd config path is {current} but needs to contain path {} for mirror configuration to take effect",
                expected.display()
            ))),
            None => Err(Error::invalid_runtime_config(
                "containerd registry config path needs to be set for mirror configuration to take effect",
            )),
        }
    }

    /// Enables the hosts config feature,
    ///
    /// Writes to the plugin containerd reads registry settings from, see [`ContainerdConfig::registry_plugin`].
    ///
    pub fn enable_hosts_config(mut self, config_path: impl AsRef<Path>) -> Self {
        let plugin = self.registry_plugin();
        self.ensure_common_tables(plugin);
        self.document["plugins"][plugin]["registry"]["config_path"] =
            value(config_path.as_ref().display().to_string());
        self
    }

    /// Returns the plugin that owns registry settings,
    ///
    /// Version 3 configs, or configs that already have the images plugin table, use the 2.x images plugin.
    ///
    fn registry_plugin(&self) -> &'static str {
        let version = self
            .document
            .get("version")
            .and_then(|v| v.as_integer())
            .unwrap_or_default();

        let has_images_plugin = self
            .document
            .get("plugins")
            .and_then(|p| p.get(CRI_IMAGES_PLUGIN))
            .is_some();

        if version >= 3 || has_images_plugin {
            CRI_IMAGES_PLUGIN
        } else {
            CRI_PLUGIN
        }
    }

    /// Ensures common tables are initialized,
    ///
    fn ensure_common_tables(&mut self, plugin: &str) {
        self.document["plugins"].enable_default_table();
        self.document["plugins"][plugin].enable_default_table();
        self.document["plugins"][plugin]["registry"].enable_default_table();
    }
}

impl Default for ContainerdConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for ContainerdConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.document)
    }
}

trait EnableDefault {
    fn enable_default_table(&mut self);
}

impl EnableDefault for toml_edit::Item {
    fn enable_default_table(&mut self) {
        if self.as_table().is_none() {
            *self = table();
            if let Some(t) = self.as_table_mut() {
                t.set_implicit(true);
            }
        }
    }
}
