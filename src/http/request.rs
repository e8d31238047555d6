/// HTTP request methods.
///
/// Every standard method is recognized by the parser so that the server can
/// tell "unsupported" from "garbage", but only GET is served.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    /// GET - Retrieve a resource
    GET,
    /// POST - Create or submit data
    POST,
    /// PUT - Replace a resource
    PUT,
    /// DELETE - Delete a resource
    DELETE,
    /// HEAD - Like GET but without the response body
    HEAD,
    /// OPTIONS - Describe communication options
    OPTIONS,
    /// PATCH - Partial modification of a resource
    PATCH,
}

/// A parsed request line.
///
/// Requests in this protocol are a single line, `GET /<path> HTTP/1.1`, with
/// no headers and no body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// The HTTP method
    pub method: Method,
    /// The request target as sent, always starting with `/`
    pub target: String,
    /// HTTP version, always "HTTP/1.1" once parsed
    pub version: String,
}

impl Method {
    /// Parses an HTTP method from a string.
    ///
    /// # Example
    ///
    /// ```
    /// # use minihttp::http::request::Method;
    /// assert_eq!(Method::from_str("GET"), Some(Method::GET));
    /// assert_eq!(Method::from_str("get"), None);
    /// ```
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "GET" => Some(Method::GET),
            "POST" => Some(Method::POST),
            "PUT" => Some(Method::PUT),
            "DELETE" => Some(Method::DELETE),
            "HEAD" => Some(Method::HEAD),
            "OPTIONS" => Some(Method::OPTIONS),
            "PATCH" => Some(Method::PATCH),
            _ => None,
        }
    }
}

impl Request {
    /// Path relative to the web root. `/` is an alias of `index.html`.
    pub fn served_path(&self) -> &str {
        match self.target.as_str() {
            "/" => "index.html",
            target => target.trim_start_matches('/'),
        }
    }

    /// Whether this request has the one shape the server answers:
    /// `GET /<path> HTTP/1.1` with a non-empty path, or `GET / HTTP/1.1`.
    pub fn is_servable(&self) -> bool {
        self.method == Method::GET && !self.served_path().is_empty()
    }
}

/// Serializes the request line the client sends.
pub fn request_line(path: &str) -> String {
    format!("GET /{} {}", path.trim_start_matches('/'), crate::http::HTTP_VERSION)
}
