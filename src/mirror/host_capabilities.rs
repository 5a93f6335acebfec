use std::fmt::Display;

use logos::Logos;

use crate::Error;

/// Host capabilities for configuring hosts.toml
///
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostCapability {
    /// Resolve means the host can resolve a tag to a digest
    ///
    #[token("resolve")]
    Resolve,
    /// Push means that the host can push content to the registry
    ///
    #[token("push")]
    Push,
    /// Pull means that the host can pull content from a registry
    ///
    #[token("pull")]
    Pull,
    /// Unknown token
    ///
    #[error]
    #[regex(r"[ ,\t\n\f]+", logos::skip)]
    Error,
}

impl HostCapability {
    /// Capabilities granted to a mirror unless configured otherwise,
    ///
    pub fn defaults() -> Vec<HostCapability> {
        vec![HostCapability::Pull, HostCapability::Resolve]
    }

    /// Parses a comma or whitespace separated list of capabilities, ex. `pull, resolve`
    ///
    /// Duplicates are dropped, order of first appearance is kept.
    ///
    pub fn parse_list(input: impl AsRef<str>) -> Result<Vec<HostCapability>, Error> {
        let mut lexer = HostCapability::lexer(input.as_ref());
        let mut capabilities = vec![];

        while let Some(token) = lexer.next() {
            match token {
                HostCapability::Error => return Err(Error::invalid_capability(lexer.slice())),
                capability if !capabilities.contains(&capability) => capabilities.push(capability),
                _ => {}
            }
        }

        if capabilities.is_empty() {
            return Err(Error::invalid_capability(input.as_ref()));
        }

        Ok(capabilities)
    }

    /// Returns the name containerd uses for this capability
    pub fn as_str(&self) -> &'static str {
        match self {
            HostCapability::Resolve => "resolve",
            HostCapability::Push => "push",
            HostCapability::Pull => "pull",
            HostCapability::Error => "unknown",
        }
    }
}

impl Display for HostCapability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
