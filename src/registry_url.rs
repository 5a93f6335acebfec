use std::{
    fmt::Display,
    path::{Component, Path},
    str::FromStr,
};

use crate::{Endpoint, Error};

/// Upstream registry url that is safe to use as a hosts.toml selector and directory name,
///
/// Can only be constructed through validation, see [`validate_registry_url`].
///
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RegistryUrl(Endpoint);

impl RegistryUrl {
    /// Returns the registry host, including the port if one was given,
    ///
    pub fn host(&self) -> &str {
        self.0.host()
    }

    /// Returns the underlying endpoint
    pub fn endpoint(&self) -> &Endpoint {
        &self.0
    }
}

/// Checks that a candidate registry url is usable as a registry selector,
///
/// Rules are checked in order and only the first one violated is reported,
/// 1. scheme must be http or https
/// 2. path must be empty, a single `/` is allowed
/// 3. query must be empty
/// 4. user info must be empty
///
/// The host is then joined onto the config path, so a fragment is rejected and the host must be exactly
/// one normal path component, ex. `..` is rejected.
///
pub fn validate_registry_url(candidate: &Endpoint) -> Result<(), Error> {
    if !matches!(candidate.scheme(), Some("http") | Some("https")) {
        return Err(Error::invalid_scheme(candidate.as_str()));
    }

    if !matches!(candidate.path(), "" | "/") {
        return Err(Error::invalid_path(candidate.as_str()));
    }

    if candidate.query().map_or(false, |q| !q.is_empty()) {
        return Err(Error::invalid_query(candidate.as_str()));
    }

    if candidate.user_info().is_some() {
        return Err(Error::invalid_user_info(candidate.as_str()));
    }

    if candidate.fragment().map_or(false, |f| !f.is_empty()) {
        return Err(Error::invalid_fragment(candidate.as_str()));
    }

    let mut components = Path::new(candidate.host()).components();
    if !matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    ) {
        return Err(Error::invalid_host(candidate.as_str()));
    }

    Ok(())
}

impl TryFrom<Endpoint> for RegistryUrl {
    type Error = Error;

    fn try_from(value: Endpoint) -> Result<Self, Self::Error> {
        validate_registry_url(&value)?;
        Ok(Self(value))
    }
}

impl TryFrom<&Endpoint> for RegistryUrl {
    type Error = Error;

    fn try_from(value: &Endpoint) -> Result<Self, Self::Error> {
        validate_registry_url(value)?;
        Ok(Self(value.clone()))
    }
}

impl FromStr for RegistryUrl {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(Endpoint::parse(s)?)
    }
}

impl AsRef<Endpoint> for RegistryUrl {
    fn as_ref(&self) -> &Endpoint {
        &self.0
    }
}

impl Display for RegistryUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::RegistryUrl;
    use crate::ErrorCategory;

    #[test]
    fn test_valid_registry_urls() {
        for url in [
            "https://docker.io",
            "http://foo.bar:5000",
            "https://docker.io/",
            "https://127.0.0.1:5000",
        ] {
            let registry = url.parse::<RegistryUrl>().expect("should be valid");
            assert_eq!(url, registry.to_string());
        }
    }

    #[test]
    fn test_invalid_registry_urls() {
        let err = "ftp://docker.io".parse::<RegistryUrl>().unwrap_err();
        assert!(matches!(err.category(), ErrorCategory::InvalidScheme(_)));
        assert_eq!(
            "invalid registry url scheme must be http or https: ftp://docker.io",
            err.to_string()
        );

        let err = "https://docker.io/foo/bar".parse::<RegistryUrl>().unwrap_err();
        assert!(matches!(err.category(), ErrorCategory::InvalidPath(_)));
        assert_eq!(
            "invalid registry url path has to be empty: https://docker.io/foo/bar",
            err.to_string()
        );

        let err = "https://docker.io?foo=bar".parse::<RegistryUrl>().unwrap_err();
        assert!(matches!(err.category(), ErrorCategory::InvalidQuery(_)));
        assert_eq!(
            "invalid registry url query has to be empty: https://docker.io?foo=bar",
            err.to_string()
        );

        let err = "https://foo@docker.io".parse::<RegistryUrl>().unwrap_err();
        assert!(matches!(err.category(), ErrorCategory::InvalidUserInfo(_)));
        assert_eq!(
            "invalid registry url user has to be empty: https://foo@docker.io",
            err.to_string()
        );
    }

    #[test]
    fn test_first_violated_rule_is_reported() {
        let err = "ftp://foo@docker.io/foo?bar=baz"
            .parse::<RegistryUrl>()
            .unwrap_err();
        assert!(matches!(err.category(), ErrorCategory::InvalidScheme(_)));

        let err = "https://foo@docker.io/foo?bar=baz"
            .parse::<RegistryUrl>()
            .unwrap_err();
        assert!(matches!(err.category(), ErrorCategory::InvalidPath(_)));

        let err = "https://foo@docker.io?bar=baz"
            .parse::<RegistryUrl>()
            .unwrap_err();
        assert!(matches!(err.category(), ErrorCategory::InvalidQuery(_)));
    }

    #[test]
    fn test_invalid_fragment() {
        let err = "https://docker.io#frag".parse::<RegistryUrl>().unwrap_err();
        assert!(matches!(err.category(), ErrorCategory::InvalidFragment(_)));
        assert_eq!(
            "invalid registry url fragment has to be empty: https://docker.io#frag",
            err.to_string()
        );
    }

    #[test]
    fn test_host_must_be_a_directory_name() {
        for url in ["https://..", "https://."] {
            let err = url.parse::<RegistryUrl>().unwrap_err();
            assert!(err.is_invalid_registry());
            assert!(matches!(err.category(), ErrorCategory::InvalidHost(_)));
        }

        let err = "https://../".parse::<RegistryUrl>().unwrap_err();
        assert_eq!(
            "invalid registry url host has to be a single directory name: https://../",
            err.to_string()
        );

        // Port keeps the host a single component
        assert!("http://..:5000".parse::<RegistryUrl>().is_ok());
    }

    #[test]
    fn test_missing_scheme() {
        let err = "docker.io".parse::<RegistryUrl>().unwrap_err();
        assert!(matches!(err.category(), ErrorCategory::InvalidScheme(_)));
    }
}
