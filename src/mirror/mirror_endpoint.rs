use std::fmt::Display;

use crate::Endpoint;

/// Mirror that should receive redirected pulls for a registry,
///
/// The first mirror in a list is the primary mirror, every mirror after it is external.
/// The flag is computed once by [`MirrorEndpoint::sequence`] so nothing downstream depends on list position.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorEndpoint {
    endpoint: Endpoint,
    external: bool,
}

impl MirrorEndpoint {
    /// Returns a primary mirror
    pub fn primary(endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            external: false,
        }
    }

    /// Returns an external mirror
    pub fn external(endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            external: true,
        }
    }

    /// Tags an ordered list of mirrors, the first is primary and the rest are external,
    ///
    /// Duplicates are kept as separate entries.
    ///
    pub fn sequence<I>(mirrors: I) -> Vec<MirrorEndpoint>
    where
        I: IntoIterator,
        I::Item: AsRef<Endpoint>,
    {
        mirrors
            .into_iter()
            .enumerate()
            .map(|(index, mirror)| {
                let endpoint = mirror.as_ref().clone();
                if index == 0 {
                    Self::primary(endpoint)
                } else {
                    Self::external(endpoint)
                }
            })
            .collect()
    }

    /// Returns true if this mirror is not the primary mirror
    pub fn is_external(&self) -> bool {
        self.external
    }

    /// Returns the mirror endpoint
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }
}

impl Display for MirrorEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.endpoint)
    }
}

#[test]
fn test_mirror_sequence() {
    let endpoints = Endpoint::parse_all([
        "http://127.0.0.1:5000",
        "http://127.0.0.1:5001",
        "http://127.0.0.1:5001",
    ])
    .expect("should parse");

    let mirrors = MirrorEndpoint::sequence(&endpoints);
    assert_eq!(3, mirrors.len());
    assert!(!mirrors[0].is_external());
    assert!(mirrors[1].is_external());
    assert!(mirrors[2].is_external());
    assert_eq!(mirrors[1].endpoint(), mirrors[2].endpoint());

    assert!(MirrorEndpoint::sequence(Vec::<Endpoint>::new()).is_empty());
}
