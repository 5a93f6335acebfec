use clap::Subcommand;
use spegel_mirror::{
    create_filters,
    fs::{MemFs, OsFs},
    ContainerdConfig, Error, MirrorConfiguration, MirrorSettings, RegistryUrl,
};
use std::path::{Path, PathBuf};
use tracing::info;

use super::SettingsArgs;

/// Enumeration of subcommands
///
#[derive(Subcommand, Clone)]
pub enum Commands {
    /// Writes a hosts.toml for every registry that routes pulls through the mirrors,
    ///
    Configure(SettingsArgs),
    /// Removes the hosts configuration of every registry,
    ///
    Remove(SettingsArgs),
    /// Prints the image list filter and the image event filter for the registries,
    ///
    Filters(SettingsArgs),
    /// Prints the hosts.toml files configure would write, w/o touching the filesystem,
    ///
    Render(SettingsArgs),
    /// Checks that containerd reads hosts configuration from the config path,
    ///
    Verify {
        /// Path to containerd's config.toml
        #[clap(long, default_value = "/etc/containerd/config.toml")]
        containerd_config: PathBuf,
        #[clap(flatten)]
        settings: SettingsArgs,
    },
    /// Prints containerd's config.toml w/ the registry config path set to the config path,
    ///
    EnableHostsConfig {
        /// Path to containerd's config.toml
        #[clap(long, default_value = "/etc/containerd/config.toml")]
        containerd_config: PathBuf,
        #[clap(flatten)]
        settings: SettingsArgs,
    },
}

impl Commands {
    /// Handles the command w/ settings loaded from a file, flags take precedence,
    ///
    pub fn handle(self, file_settings: MirrorSettings) -> Result<(), Error> {
        match self {
            Commands::Configure(args) => {
                let settings = file_settings.merge(args.into());
                MirrorConfiguration::new(OsFs, settings.config_path())
                    .with_options(settings.render_options()?)
                    .add(&settings.registry_endpoints()?, &settings.mirror_endpoints()?)
            }
            Commands::Remove(args) => {
                let settings = file_settings.merge(args.into());
                MirrorConfiguration::new(OsFs, settings.config_path())
                    .remove(&settings.registry_endpoints()?)
            }
            Commands::Filters(args) => {
                let settings = file_settings.merge(args.into());
                let registries = settings
                    .registry_endpoints()?
                    .into_iter()
                    .map(RegistryUrl::try_from)
                    .collect::<Result<Vec<_>, _>>()?;

                let (list_filter, event_filter) = create_filters(&registries);
                println!("{list_filter}");
                println!("{event_filter}");
                Ok(())
            }
            Commands::Render(args) => {
                let settings = file_settings.merge(args.into());
                let fs = MemFs::default();
                MirrorConfiguration::new(&fs, settings.config_path())
                    .with_options(settings.render_options()?)
                    .add(&settings.registry_endpoints()?, &settings.mirror_endpoints()?)?;

                for path in fs.files().map_err(|err| Error::filesystem(settings.config_path(), err))? {
                    let content = fs.read(&path).map_err(|err| Error::filesystem(&path, err))?;
                    println!("# {}", path.display());
                    println!("{}", String::from_utf8_lossy(&content));
                    println!();
                }
                Ok(())
            }
            Commands::Verify {
                containerd_config,
                settings,
            } => {
                let settings = file_settings.merge(settings.into());
                load_containerd_config(&containerd_config)?
                    .verify_hosts_config(settings.config_path())?;

                info!(
                    "Containerd config {:?} reads hosts configuration from {:?}",
                    containerd_config,
                    settings.config_path()
                );
                Ok(())
            }
            Commands::EnableHostsConfig {
                containerd_config,
                settings,
            } => {
                let settings = file_settings.merge(settings.into());
                let config = load_containerd_config(&containerd_config)?
                    .enable_hosts_config(settings.config_path());

                print!("{config}");
                Ok(())
            }
        }
    }
}

/// Reads and parses containerd's config.toml,
///
fn load_containerd_config(path: &Path) -> Result<ContainerdConfig, Error> {
    let content = std::fs::read_to_string(path).map_err(|err| Error::filesystem(path, err))?;
    ContainerdConfig::new().try_load_content(content)
}
