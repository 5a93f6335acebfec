use std::{fmt::Display, str::FromStr};

use hyper::Uri;

use crate::Error;

/// Parsed url that remembers the exact text it was parsed from,
///
/// `hyper::Uri` normalizes an empty path to `/` when formatting, the hosts.toml output and
/// error messages need the url exactly as the caller wrote it, so the original text is kept
/// alongside the parsed form.
///
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Endpoint {
    /// Text the uri was parsed from
    raw: String,
    /// Parsed uri
    uri: Uri,
}

impl Endpoint {
    /// Parses an endpoint from text,
    ///
    pub fn parse(input: impl AsRef<str>) -> Result<Self, Error> {
        let raw = input.as_ref();
        let uri = Uri::from_str(raw).map_err(|err| Error::invalid_uri(raw, err))?;

        Ok(Self {
            raw: raw.to_string(),
            uri,
        })
    }

    /// Parses a list of endpoints, failing on the first entry that is not a uri,
    ///
    pub fn parse_all<I, S>(inputs: I) -> Result<Vec<Self>, Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        inputs.into_iter().map(Self::parse).collect()
    }

    /// Returns the scheme, if any,
    ///
    pub fn scheme(&self) -> Option<&str> {
        self.uri.scheme_str()
    }

    /// Returns the host including the port, without any user info,
    ///
    pub fn host(&self) -> &str {
        self.uri
            .authority()
            .map(|a| a.as_str())
            .map(|a| a.rsplit_once('@').map_or(a, |(_, host)| host))
            .unwrap_or_default()
    }

    /// Returns the user info portion of the authority, if present,
    ///
    pub fn user_info(&self) -> Option<&str> {
        self.uri
            .authority()
            .and_then(|a| a.as_str().rsplit_once('@'))
            .map(|(user, _)| user)
    }

    /// Returns the path, `/` when the url has none
    pub fn path(&self) -> &str {
        self.uri.path()
    }

    /// Returns the query string, if present
    pub fn query(&self) -> Option<&str> {
        self.uri.query()
    }

    /// Returns the fragment, if present,
    ///
    /// `hyper::Uri` drops the fragment while parsing so it is read from the original text.
    ///
    pub fn fragment(&self) -> Option<&str> {
        self.raw.split_once('#').map(|(_, fragment)| fragment)
    }

    /// Returns the parsed uri
    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// Returns the text this endpoint was parsed from
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl FromStr for Endpoint {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<Endpoint> for Endpoint {
    fn as_ref(&self) -> &Endpoint {
        self
    }
}

impl Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::Endpoint;
    use crate::ErrorCategory;

    #[test]
    fn test_endpoint_parts() {
        let endpoint = Endpoint::parse("https://foo@docker.io:5000?foo=bar").expect("should parse");

        assert_eq!(Some("https"), endpoint.scheme());
        assert_eq!("docker.io:5000", endpoint.host());
        assert_eq!(Some("foo"), endpoint.user_info());
        assert_eq!(Some("foo=bar"), endpoint.query());
        assert_eq!("/", endpoint.path());
    }

    #[test]
    fn test_endpoint_display_is_unchanged() {
        let endpoint = Endpoint::parse("http://127.0.0.1:5000").expect("should parse");
        assert_eq!("http://127.0.0.1:5000", endpoint.to_string());
        assert_eq!("127.0.0.1:5000", endpoint.host());
        assert_eq!(None, endpoint.user_info());
        assert_eq!(None, endpoint.fragment());
    }

    #[test]
    fn test_endpoint_fragment() {
        let endpoint = Endpoint::parse("https://docker.io#frag").expect("should parse");
        assert_eq!(Some("frag"), endpoint.fragment());
        assert_eq!("docker.io", endpoint.host());
    }

    #[test]
    fn test_endpoint_invalid_uri() {
        let err = Endpoint::parse("https://docker io").expect_err("should not parse");
        assert!(matches!(err.category(), ErrorCategory::InvalidUri { .. }));
    }

    #[test]
    fn test_parse_all() {
        let endpoints =
            Endpoint::parse_all(["https://docker.io", "https://gcr.io"]).expect("should parse");
        assert_eq!(
            vec!["docker.io", "gcr.io"],
            endpoints.iter().map(|e| e.host()).collect::<Vec<_>>()
        );
    }
}
