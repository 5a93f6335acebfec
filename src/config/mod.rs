mod hosts_config;
pub use hosts_config::HostsConfig;
pub use hosts_config::RegistryHost;

mod containerd_config;
pub use containerd_config::ContainerdConfig;

mod mirror_settings;
pub use mirror_settings::MirrorSettings;
