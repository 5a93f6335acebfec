//! Generates containerd registry mirror configuration for a node-local mirror,
//!
//! For every mirrored registry a `hosts.toml` is written under containerd's registry config path that routes
//! pulls through the mirrors, and filters are built to scope containerd image queries to the mirrored registries.
//!

pub mod consts;

pub mod fs;

mod error;
pub use error::Error;
pub use error::ErrorCategory;

mod endpoint;
pub use endpoint::Endpoint;

mod registry_url;
pub use registry_url::validate_registry_url;
pub use registry_url::RegistryUrl;

mod config;
pub use config::ContainerdConfig;
pub use config::HostsConfig;
pub use config::MirrorSettings;
pub use config::RegistryHost;

mod filters;
pub use filters::create_filters;

mod mirror;
pub use mirror::add_mirror_configuration;
pub use mirror::hosts_file_content;
pub use mirror::remove_mirror_configuration;
pub use mirror::HostCapability;
pub use mirror::MirrorConfiguration;
pub use mirror::MirrorEndpoint;
pub use mirror::MirrorHost;
pub use mirror::RenderOptions;
pub use mirror::ServerOverrides;
