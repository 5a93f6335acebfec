use clap::{Args, Parser};
use spegel_mirror::{Error, MirrorSettings};
use std::path::PathBuf;
use tracing::debug;

use super::Commands;

/// Spegel mirror CLI
///
#[derive(Parser)]
#[clap(name = "spegel-mirror")]
#[clap(arg_required_else_help = true)]
#[clap(about = "Configures containerd to pull images for selected registries through local mirrors")]
pub struct SpegelMirror {
    /// Path to a toml settings file,
    ///
    /// Flags passed on the command line take precedence over values in this file.
    ///
    #[clap(long, short)]
    pub config: Option<PathBuf>,
    /// Enable debug mode
    #[clap(long, short, action)]
    pub debug: bool,
    #[clap(subcommand)]
    pub command: Commands,
}

impl SpegelMirror {
    /// Handle cli state,
    ///
    pub fn handle(self) -> Result<(), Error> {
        let settings = self.file_settings()?;
        self.command.handle(settings)
    }

    /// Loads settings from the config file, if one was passed,
    ///
    fn file_settings(&self) -> Result<MirrorSettings, Error> {
        match self.config.as_ref() {
            Some(path) => {
                debug!("Loading settings from {:?}", path);
                let content =
                    std::fs::read_to_string(path).map_err(|err| Error::filesystem(path, err))?;
                MirrorSettings::try_load_content(content)
            }
            None => Ok(MirrorSettings::default()),
        }
    }
}

/// Mirror settings that can be passed as flags,
///
#[derive(Args, Clone, Default)]
pub struct SettingsArgs {
    /// Directory containerd reads registry hosts configuration from,
    ///
    /// Defaults to /etc/containerd/certs.d
    ///
    #[clap(long)]
    pub config_path: Option<PathBuf>,
    /// Registries to mirror, ex. https://docker.io,https://ghcr.io
    #[clap(long, value_delimiter = ',')]
    pub registries: Vec<String>,
    /// Mirrors in priority order, the first one is the primary mirror
    #[clap(long, value_delimiter = ',')]
    pub mirrors: Vec<String>,
    /// Capabilities granted to the mirrors, ex. "pull, resolve"
    #[clap(long)]
    pub capabilities: Option<String>,
}

impl From<SettingsArgs> for MirrorSettings {
    fn from(value: SettingsArgs) -> Self {
        MirrorSettings {
            config_path: value.config_path,
            registries: value.registries,
            mirrors: value.mirrors,
            capabilities: value.capabilities,
            ..Default::default()
        }
    }
}
