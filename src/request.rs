//! Incoming HTTP request type.

use std::collections::HashMap;

use serde::de::DeserializeOwned;

use crate::method::Method;

/// An incoming HTTP request with its body fully buffered.
///
/// The server builds one from each hyper request. Tests build them directly:
///
/// ```rust
/// use userdeck::{Method, Request};
///
/// let req = Request::new(Method::Post, "/api/v1/users?dry=1")
///     .with_header("content-type", "application/json")
///     .with_body(br#"{"name":"Ada"}"#.to_vec());
/// assert_eq!(req.path(), "/api/v1/users");
/// assert_eq!(req.query(), Some("dry=1"));
/// ```
#[derive(Debug, Clone)]
pub struct Request {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) query: Option<String>,
    pub(crate) headers: Vec<(String, String)>,
    pub(crate) body: Vec<u8>,
    pub(crate) params: HashMap<String, String>,
}

impl Request {
    /// Starts a request for `target`, a path with an optional `?query`.
    pub fn new(method: Method, target: &str) -> Self {
        let (path, query) = match target.split_once('?') {
            Some((path, query)) => (path.to_owned(), Some(query.to_owned())),
            None => (target.to_owned(), None),
        };
        Self {
            method,
            path,
            query,
            headers: Vec::new(),
            body: Vec::new(),
            params: HashMap::new(),
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_owned(), value.to_owned()));
        self
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    pub fn method(&self) -> Method { self.method }
    pub fn path(&self) -> &str { &self.path }
    pub fn query(&self) -> Option<&str> { self.query.as_deref() }
    pub fn headers(&self) -> &[(String, String)] { &self.headers }
    pub fn body(&self) -> &[u8] { &self.body }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Returns a named path parameter.
    ///
    /// For a route `/users/{id}`, `req.param("id")` on `/users/42` returns `Some("42")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Decodes the query string into `T`. A missing query decodes as empty.
    pub fn query_as<T: DeserializeOwned>(&self) -> Result<T, serde_urlencoded::de::Error> {
        serde_urlencoded::from_str(self.query().unwrap_or(""))
    }

    pub(crate) fn set_params(&mut self, params: HashMap<String, String>) {
        self.params = params;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize, Debug, PartialEq)]
    struct Q {
        action: Option<String>,
        id: Option<String>,
    }

    #[test]
    fn splits_path_and_query() {
        let req = Request::new(Method::Get, "/api/v1/user-action?action=get&id=3");
        assert_eq!(req.path(), "/api/v1/user-action");
        let q: Q = req.query_as().unwrap();
        assert_eq!(q, Q { action: Some("get".into()), id: Some("3".into()) });
    }

    #[test]
    fn missing_query_decodes_as_empty() {
        let req = Request::new(Method::Get, "/api/v1/user-action");
        let q: Q = req.query_as().unwrap();
        assert_eq!(q, Q { action: None, id: None });
    }

    #[test]
    fn header_lookup_ignores_case() {
        let req = Request::new(Method::Get, "/").with_header("Accept", "application/xml");
        assert_eq!(req.header("accept"), Some("application/xml"));
        assert_eq!(req.header("content-type"), None);
    }
}
