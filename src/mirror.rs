use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use tracing::{debug, event, info, Level};

use crate::{
    consts::{DEFAULT_CONFIG_PATH, HOSTS_FILE_NAME},
    fs::Filesystem,
    Endpoint, Error, RegistryUrl,
};

mod host_capabilities;
pub use host_capabilities::HostCapability;

mod mirror_endpoint;
pub use mirror_endpoint::MirrorEndpoint;

mod mirror_host;
pub use mirror_host::hosts_file_content;
pub use mirror_host::MirrorHost;
pub use mirror_host::RenderOptions;
pub use mirror_host::ServerOverrides;

/// Designed to be used w/ containerd's registry config described here:
/// https://github.com/containerd/containerd/blob/main/docs/hosts.md
///
/// Owns the `{config_path}/{registry_host}/hosts.toml` tree. Each registry gets its own directory, adding
/// overwrites an existing hosts.toml and removing deletes the whole registry directory.
///
/// To setup the runtime, containerd's config.toml must point at the same config path,
///
/// ```toml
/// [plugins."io.containerd.grpc.v1.cri".registry]
/// config_path = "/etc/containerd/certs.d"
/// ```
///
/// Batches are not transactional, when a registry fails the registries before it keep their configuration.
///
pub struct MirrorConfiguration<F>
where
    F: Filesystem,
{
    fs: F,
    config_path: PathBuf,
    options: RenderOptions,
}

impl<F> MirrorConfiguration<F>
where
    F: Filesystem,
{
    /// Returns a mirror configuration rooted at config_path,
    ///
    pub fn new(fs: F, config_path: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            config_path: config_path.into(),
            options: RenderOptions::default(),
        }
    }

    /// Returns a mirror configuration rooted at the default containerd config path,
    ///
    pub fn with_default_path(fs: F) -> Self {
        Self::new(fs, DEFAULT_CONFIG_PATH)
    }

    /// Replaces the options used when rendering hosts.toml,
    ///
    pub fn with_options(mut self, options: RenderOptions) -> Self {
        self.options = options;
        self
    }

    /// Returns the root of the configuration tree
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Returns the directory that holds a registry's configuration
    pub fn registry_dir(&self, registry: &RegistryUrl) -> PathBuf {
        self.config_path.join(registry.host())
    }

    /// Writes a hosts.toml for every registry, routing each of them through the same mirrors,
    ///
    /// Stops at the first registry that fails validation or cannot be written.
    ///
    pub fn add(&self, registries: &[Endpoint], mirrors: &[Endpoint]) -> Result<(), Error> {
        let mirrors = MirrorEndpoint::sequence(mirrors);

        for registry in registries {
            let registry = RegistryUrl::try_from(registry)?;
            let dir = self.registry_dir(&registry);

            self.fs
                .create_dir_all(&dir)
                .map_err(|err| Error::filesystem(&dir, err))?;

            let content = MirrorHost::get_hosts_config(&registry, &mirrors, &self.options).to_string();
            let hosts_file = dir.join(HOSTS_FILE_NAME);
            self.fs
                .write(&hosts_file, content.as_bytes())
                .map_err(|err| Error::filesystem(&hosts_file, err))?;

            event!(
                Level::DEBUG,
                "Wrote mirror configuration for {registry} to {:?}",
                hosts_file
            );
        }

        info!(
            "Added mirror configuration for {} registries under {:?}",
            registries.len(),
            self.config_path
        );
        Ok(())
    }

    /// Removes the configuration directory of every registry,
    ///
    /// A directory that does not exist is skipped, any other filesystem error stops the batch.
    ///
    pub fn remove(&self, registries: &[Endpoint]) -> Result<(), Error> {
        for registry in registries {
            let registry = RegistryUrl::try_from(registry)?;
            let dir = self.registry_dir(&registry);

            match self.fs.remove_dir_all(&dir) {
                Ok(_) => {
                    event!(Level::DEBUG, "Removed mirror configuration {:?}", dir);
                }
                Err(err) if err.kind() == ErrorKind::NotFound => {
                    debug!("Mirror configuration {:?} did not exist, skipping", dir);
                }
                Err(err) => return Err(Error::filesystem(&dir, err)),
            }
        }

        info!(
            "Removed mirror configuration for {} registries under {:?}",
            registries.len(),
            self.config_path
        );
        Ok(())
    }
}

/// Writes mirror configuration for registries under config_path,
///
pub fn add_mirror_configuration<F>(
    fs: F,
    config_path: impl Into<PathBuf>,
    registries: &[Endpoint],
    mirrors: &[Endpoint],
) -> Result<(), Error>
where
    F: Filesystem,
{
    MirrorConfiguration::new(fs, config_path).add(registries, mirrors)
}

/// Removes mirror configuration for registries under config_path,
///
pub fn remove_mirror_configuration<F>(
    fs: F,
    config_path: impl Into<PathBuf>,
    registries: &[Endpoint],
) -> Result<(), Error>
where
    F: Filesystem,
{
    MirrorConfiguration::new(fs, config_path).remove(registries)
}
