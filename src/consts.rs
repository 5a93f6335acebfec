/// Header carrying the registry url the request was originally meant for,
///
pub const REGISTRY_HEADER: &str = "X-Spegel-Registry";

/// Header marking a request as routed through a mirror,
///
pub const MIRROR_HEADER: &str = "X-Spegel-Mirror";

/// Header marking a request as routed through a secondary mirror,
///
pub const EXTERNAL_HEADER: &str = "X-Spegel-External";

/// Name of the file containerd reads from each registry host directory,
///
pub const HOSTS_FILE_NAME: &str = "hosts.toml";

/// Default containerd registry config path,
///
pub const DEFAULT_CONFIG_PATH: &str = "/etc/containerd/certs.d";

/// Host name users refer to Docker Hub by
pub const DOCKER_HUB_HOST: &str = "docker.io";

/// Server that actually serves Docker Hub content
pub const DOCKER_HUB_SERVER: &str = "https://registry-1.docker.io";

/// Event topics that signal a new or changed image
pub const IMAGE_EVENT_TOPICS: &str = "/images/create|/images/update";
