use std::collections::BTreeMap;

use crate::{
    consts::{DOCKER_HUB_HOST, DOCKER_HUB_SERVER, EXTERNAL_HEADER, MIRROR_HEADER, REGISTRY_HEADER},
    HostCapability, HostsConfig, MirrorEndpoint, RegistryHost, RegistryUrl,
};

/// Table of registry hosts whose content is served from a different server,
///
/// The default table maps `docker.io` to `https://registry-1.docker.io`.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerOverrides {
    servers: BTreeMap<String, String>,
}

impl ServerOverrides {
    /// Returns a table w/o any overrides
    pub fn empty() -> Self {
        Self {
            servers: BTreeMap::new(),
        }
    }

    /// Adds or replaces the server used for a registry host,
    ///
    pub fn with_override(mut self, host: impl Into<String>, server: impl Into<String>) -> Self {
        self.servers.insert(host.into(), server.into());
        self
    }

    /// Returns the server containerd should fall back to for a registry,
    ///
    pub fn server_for(&self, registry: &RegistryUrl) -> String {
        self.servers
            .get(registry.host())
            .cloned()
            .unwrap_or_else(|| registry.to_string())
    }
}

impl Default for ServerOverrides {
    fn default() -> Self {
        Self::empty().with_override(DOCKER_HUB_HOST, DOCKER_HUB_SERVER)
    }
}

/// Settings that shape the rendered hosts.toml,
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Server overrides applied to the `server` field
    pub server_overrides: ServerOverrides,
    /// Capabilities granted to every mirror
    pub capabilities: Vec<HostCapability>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            server_overrides: ServerOverrides::default(),
            capabilities: HostCapability::defaults(),
        }
    }
}

/// Pointer struct for creating the hosts config that routes a registry through its mirrors,
///
pub struct MirrorHost;

impl MirrorHost {
    /// Returns a hosts config for a registry and its mirrors,
    ///
    /// Every mirror is tagged w/ the original registry url, external mirrors are tagged as such.
    ///
    pub fn get_hosts_config(
        registry: &RegistryUrl,
        mirrors: &[MirrorEndpoint],
        options: &RenderOptions,
    ) -> HostsConfig {
        let server = options.server_overrides.server_for(registry);
        let registry = registry.to_string();

        mirrors
            .iter()
            .fold(HostsConfig::new(Some(server)), |config, mirror| {
                let mut host = options
                    .capabilities
                    .iter()
                    .fold(RegistryHost::new(mirror.to_string()), |host, capability| {
                        host.enable_capability(*capability)
                    })
                    .add_header(REGISTRY_HEADER, registry.as_str())
                    .add_header(MIRROR_HEADER, "true");

                if mirror.is_external() {
                    host = host.add_header(EXTERNAL_HEADER, "true");
                }

                config.add_host(host)
            })
    }
}

/// Returns the hosts.toml content for a registry using the default render options,
///
pub fn hosts_file_content(registry: &RegistryUrl, mirrors: &[MirrorEndpoint]) -> String {
    MirrorHost::get_hosts_config(registry, mirrors, &RenderOptions::default()).to_string()
}

#[cfg(test)]
mod tests {
    use super::{hosts_file_content, MirrorHost, RenderOptions, ServerOverrides};
    use crate::{Endpoint, HostCapability, MirrorEndpoint, RegistryUrl};

    fn mirrors(urls: &[&str]) -> Vec<MirrorEndpoint> {
        MirrorEndpoint::sequence(Endpoint::parse_all(urls).expect("should parse"))
    }

    #[test]
    fn test_host_file_content() {
        let registry = "https://example.com".parse::<RegistryUrl>().expect("should be valid");
        let content = hosts_file_content(&registry, &mirrors(&["http://127.0.0.1:5000"]));

        let expected = r#"server = "https://example.com"

[host."http://127.0.0.1:5000"]
  capabilities = ["pull", "resolve"]
[host."http://127.0.0.1:5000".header]
  X-Spegel-Registry = ["https://example.com"]
  X-Spegel-Mirror = ["true"]"#;
        assert_eq!(expected, content);
    }

    #[test]
    fn test_host_file_content_multiple_mirrors() {
        let registry = "https://example.com".parse::<RegistryUrl>().expect("should be valid");
        let content = hosts_file_content(
            &registry,
            &mirrors(&["http://127.0.0.1:5000", "http://127.0.0.1:5001"]),
        );

        let expected = r#"server = "https://example.com"

[host."http://127.0.0.1:5000"]
  capabilities = ["pull", "resolve"]
[host."http://127.0.0.1:5000".header]
  X-Spegel-Registry = ["https://example.com"]
  X-Spegel-Mirror = ["true"]

[host."http://127.0.0.1:5001"]
  capabilities = ["pull", "resolve"]
[host."http://127.0.0.1:5001".header]
  X-Spegel-Registry = ["https://example.com"]
  X-Spegel-Mirror = ["true"]
  X-Spegel-External = ["true"]"#;
        assert_eq!(expected, content);
    }

    #[test]
    fn test_host_file_content_docker_override() {
        let registry = "https://docker.io".parse::<RegistryUrl>().expect("should be valid");
        let content = hosts_file_content(&registry, &mirrors(&["http://127.0.0.1:5000"]));

        let expected = r#"server = "https://registry-1.docker.io"

[host."http://127.0.0.1:5000"]
  capabilities = ["pull", "resolve"]
[host."http://127.0.0.1:5000".header]
  X-Spegel-Registry = ["https://docker.io"]
  X-Spegel-Mirror = ["true"]"#;
        assert_eq!(expected, content);
    }

    #[test]
    fn test_host_file_content_without_mirrors() {
        let registry = "https://ghcr.io".parse::<RegistryUrl>().expect("should be valid");
        assert_eq!(
            r#"server = "https://ghcr.io""#,
            hosts_file_content(&registry, &[])
        );
    }

    #[test]
    fn test_custom_render_options() {
        let registry = "https://quay.io".parse::<RegistryUrl>().expect("should be valid");
        let options = RenderOptions {
            server_overrides: ServerOverrides::empty()
                .with_override("quay.io", "https://cdn.quay.io"),
            capabilities: vec![HostCapability::Pull],
        };

        let config =
            MirrorHost::get_hosts_config(&registry, &mirrors(&["http://127.0.0.1:5000"]), &options);
        assert_eq!(Some("https://cdn.quay.io"), config.server());
        assert!(config.to_string().contains(r#"capabilities = ["pull"]"#));

        let docker = "https://docker.io".parse::<RegistryUrl>().expect("should be valid");
        assert_eq!("https://docker.io", options.server_overrides.server_for(&docker));
    }

    #[test]
    fn test_host_file_content_is_valid_toml() {
        let registry = "http://foo.bar:5000".parse::<RegistryUrl>().expect("should be valid");
        let content = hosts_file_content(
            &registry,
            &mirrors(&["http://127.0.0.1:5000", "http://127.0.0.1:5001"]),
        );

        let value = toml::from_str::<toml::Value>(&content).expect("should be valid toml");
        assert_eq!(
            Some("http://foo.bar:5000"),
            value.get("server").and_then(|v| v.as_str())
        );

        let external = value
            .get("host")
            .and_then(|h| h.get("http://127.0.0.1:5001"))
            .and_then(|h| h.get("header"))
            .and_then(|h| h.get("X-Spegel-External"))
            .and_then(|v| v.as_array())
            .expect("should have external header");
        assert_eq!(Some("true"), external[0].as_str());

        let primary = value
            .get("host")
            .and_then(|h| h.get("http://127.0.0.1:5000"))
            .and_then(|h| h.get("header"))
            .expect("should have headers");
        assert!(primary.get("X-Spegel-External").is_none());
    }
}
