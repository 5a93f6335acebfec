use std::fmt::Display;

use crate::HostCapability;

/// Struct for creating a hosts.toml file for containerd hosts configuration,
///
/// Formatting produces the exact layout containerd's hosts parser reads, ex.
///
/// ```toml
/// server = "https://example.com"
///
/// [host."http://127.0.0.1:5000"]
///   capabilities = ["pull", "resolve"]
/// [host."http://127.0.0.1:5000".header]
///   X-Spegel-Registry = ["https://example.com"]
///   X-Spegel-Mirror = ["true"]
/// ```
///
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostsConfig {
    /// If set, this will be the upstream server fallback if all hosts cannot be used
    server: Option<String>,
    /// List of hosts in priority order that will be used to serve registry requests
    hosts: Vec<RegistryHost>,
}

impl HostsConfig {
    /// Returns a new hosts config w/ an optional upstream server,
    ///
    pub fn new(server: Option<impl Into<String>>) -> Self {
        Self {
            server: server.map(|s| s.into()),
            hosts: vec![],
        }
    }

    /// Adds a host, hosts are tried in the order they are added,
    ///
    pub fn add_host(mut self, host: RegistryHost) -> Self {
        self.hosts.push(host);
        self
    }

    /// Returns the upstream server
    pub fn server(&self) -> Option<&str> {
        self.server.as_deref()
    }
}

impl Display for HostsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut sections = vec![];

        if let Some(server) = self.server.as_ref() {
            sections.push(format!(r#"server = "{server}""#));
        }

        for host in self.hosts.iter() {
            sections.push(host.to_string());
        }

        write!(f, "{}", sections.join("\n\n"))
    }
}

/// Host entry of a hosts.toml file,
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryHost {
    /// Host URI that will be the base for registry requests,
    host: String,
    /// Supported registry features this host can serve, ex. resolve, pull, push
    capabilities: Vec<HostCapability>,
    /// Headers to pass w/ registry requests to this host, in insertion order
    headers: Vec<(String, Vec<String>)>,
}

impl RegistryHost {
    /// Returns a new host w/o any capabilities,
    ///
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            capabilities: vec![],
            headers: vec![],
        }
    }

    /// Enables fetching content from this host
    pub fn enable_pull(self) -> Self {
        self.enable_capability(HostCapability::Pull)
    }

    /// Enables uploading content to this host
    pub fn enable_push(self) -> Self {
        self.enable_capability(HostCapability::Push)
    }

    /// Enables resolving tags to digests through this host,
    ///
    /// Only enable for trusted hosts, a resolved digest decides what content is pulled.
    ///
    pub fn enable_resolve(self) -> Self {
        self.enable_capability(HostCapability::Resolve)
    }

    /// Enables a capability, enabling the same capability twice has no effect,
    ///
    pub fn enable_capability(mut self, capability: HostCapability) -> Self {
        if !self.capabilities.contains(&capability) {
            self.capabilities.push(capability);
        }
        self
    }

    /// Adds a header value, values for an existing key are appended to that key,
    ///
    pub fn add_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        let value = value.into();

        match self.headers.iter_mut().find(|(k, _)| *k == key) {
            Some((_, values)) => values.push(value),
            None => self.headers.push((key, vec![value])),
        }

        self
    }

    /// Returns the values set for a header
    pub fn header(&self, key: impl AsRef<str>) -> Option<&[String]> {
        self.headers
            .iter()
            .find(|(k, _)| k == key.as_ref())
            .map(|(_, values)| values.as_slice())
    }
}

impl Display for RegistryHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, r#"[host."{}"]"#, self.host)?;
        write!(
            f,
            "\n  capabilities = [{}]",
            quoted_list(self.capabilities.iter().map(|c| c.as_str()))
        )?;

        if !self.headers.is_empty() {
            write!(f, "\n[host.\"{}\".header]", self.host)?;
            for (key, values) in self.headers.iter() {
                write!(f, "\n  {key} = [{}]", quoted_list(values.iter()))?;
            }
        }

        Ok(())
    }
}

fn quoted_list<I, S>(values: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    values
        .into_iter()
        .map(|v| format!(r#""{}""#, v.as_ref()))
        .collect::<Vec<_>>()
        .join(", ")
}
