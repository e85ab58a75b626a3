//! Request specification type

use serde::{Deserialize, Serialize};
use url::Url;

use super::{FormData, Header, Headers, HttpMethod};
use crate::error::{DomainError, DomainResult};

/// Complete specification for one harness request.
///
/// The path is relative to the configured base URL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestSpec {
    /// HTTP method
    pub method: HttpMethod,
    /// Path relative to the base URL; a leading `/` is optional.
    pub path: String,
    /// HTTP headers
    #[serde(default)]
    pub headers: Headers,
    /// Multipart body, sent only for methods that carry a body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form: Option<FormData>,
}

impl RequestSpec {
    /// Creates a GET request for the path.
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            path: path.into(),
            headers: Headers::new(),
            form: None,
        }
    }

    /// Creates a multipart POST request for the path.
    #[must_use]
    pub fn post(path: impl Into<String>, form: FormData) -> Self {
        Self {
            method: HttpMethod::Post,
            path: path.into(),
            headers: Headers::new(),
            form: Some(form),
        }
    }

    /// Adds a header (builder pattern).
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.add(Header::new(name, value));
        self
    }

    /// Replaces the headers (builder pattern).
    #[must_use]
    pub fn with_headers(mut self, headers: Headers) -> Self {
        self.headers = headers;
        self
    }

    /// Path with exactly one leading `/`, as used in fixture keys and logs.
    #[must_use]
    pub fn normalized_path(&self) -> String {
        format!("/{}", self.path.trim_start_matches('/'))
    }

    /// Resolves the request path against the base URL.
    ///
    /// The base is treated as a directory, so `http://host/app` + `submit`
    /// becomes `http://host/app/submit`.
    ///
    /// The resolved URL always shares the base's origin; absolute URLs are
    /// rejected so headers meant for the service never reach another host.
    ///
    /// # Errors
    ///
    /// Returns an error if the base is not an http(s) URL, the path is an
    /// absolute URL, or the path cannot be joined onto the base.
    pub fn resolve_url(&self, base: &Url) -> DomainResult<Url> {
        if !matches!(base.scheme(), "http" | "https") {
            return Err(DomainError::InvalidUrl(base.to_string()));
        }
        if Url::parse(&self.path).is_ok() {
            return Err(DomainError::InvalidPath(format!(
                "{}: expected a path relative to the base URL",
                self.path
            )));
        }
        let mut base = base.clone();
        if !base.path().ends_with('/') {
            let dir = format!("{}/", base.path());
            base.set_path(&dir);
        }
        let url = base
            .join(self.path.trim_start_matches('/'))
            .map_err(|e| DomainError::InvalidPath(format!("{}: {e}", self.path)))?;
        if url.origin() != base.origin() {
            return Err(DomainError::InvalidPath(format!(
                "{}: resolves outside {base}",
                self.path
            )));
        }
        Ok(url)
    }

    /// Validates headers and, for methods with a body, the presence of a form.
    ///
    /// # Errors
    ///
    /// Returns the first invalid header, or an error if a form is attached to GET.
    pub fn validate(&self) -> DomainResult<()> {
        for header in self.headers.iter() {
            header.validate()?;
        }
        if self.form.is_some() && !self.method.has_body() {
            return Err(DomainError::InvalidFormField(format!(
                "{} requests cannot carry a form",
                self.method
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn base(url: &str) -> Url {
        Url::parse(url).unwrap()
    }

    #[test]
    fn test_resolve_relative_path() {
        let req = RequestSpec::get("submit");
        let url = req.resolve_url(&base("http://localhost:7777")).unwrap();
        assert_eq!(url.as_str(), "http://localhost:7777/submit");
    }

    #[test]
    fn test_resolve_keeps_base_prefix() {
        let req = RequestSpec::get("/manage");
        let url = req.resolve_url(&base("http://localhost:7777/app")).unwrap();
        assert_eq!(url.as_str(), "http://localhost:7777/app/manage");
    }

    #[test]
    fn test_resolve_root() {
        let req = RequestSpec::get("/");
        let url = req.resolve_url(&base("http://localhost:7777/")).unwrap();
        assert_eq!(url.as_str(), "http://localhost:7777/");
    }

    #[test]
    fn test_resolve_rejects_non_http_base() {
        let req = RequestSpec::get("submit");
        assert!(req.resolve_url(&base("file:///tmp")).is_err());
    }

    #[test]
    fn test_resolve_rejects_absolute_url() {
        let base = base("http://localhost:7777/");
        for path in [
            "http://other.test/steal",
            "https://other.test/",
            "mailto:someone@other.test",
        ] {
            let err = RequestSpec::get(path).resolve_url(&base).unwrap_err();
            assert!(matches!(err, DomainError::InvalidPath(_)), "{path}: {err}");
        }
    }

    #[test]
    fn test_resolve_stays_on_base_host() {
        let base = base("http://localhost:7777/app/");
        for path in ["//other.test/steal", "../../../x", "/manage?x=1"] {
            let url = RequestSpec::get(path).resolve_url(&base).unwrap();
            assert_eq!(url.host_str(), Some("localhost"));
            assert_eq!(url.port(), Some(7777));
        }
    }

    #[test]
    fn test_normalized_path() {
        assert_eq!(RequestSpec::get("submit").normalized_path(), "/submit");
        assert_eq!(RequestSpec::get("//manage").normalized_path(), "/manage");
        assert_eq!(RequestSpec::get("").normalized_path(), "/");
    }

    #[test]
    fn test_get_with_form_is_invalid() {
        let mut req = RequestSpec::get("submit");
        req.form = Some(FormData::new().text("id", "x"));
        assert!(req.validate().is_err());

        let post = RequestSpec::post("submit", FormData::new()).with_header("Accept", "text/plain");
        assert!(post.validate().is_ok());
    }
}
