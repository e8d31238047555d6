use minihttp::http::request::{Method, Request, request_line};

fn request(method: Method, target: &str) -> Request {
    Request {
        method,
        target: target.to_string(),
        version: "HTTP/1.1".to_string(),
    }
}

#[test]
fn test_root_is_index_alias() {
    assert_eq!(request(Method::GET, "/").served_path(), "index.html");
}

#[test]
fn test_served_path_strips_leading_slash() {
    assert_eq!(request(Method::GET, "/img/logo.png").served_path(), "img/logo.png");
}

#[test]
fn test_only_get_is_servable() {
    assert!(request(Method::GET, "/a.html").is_servable());
    assert!(!request(Method::POST, "/a.html").is_servable());
    assert!(!request(Method::HEAD, "/").is_servable());
}

#[test]
fn test_method_from_str() {
    assert_eq!(Method::from_str("GET"), Some(Method::GET));
    assert_eq!(Method::from_str("PATCH"), Some(Method::PATCH));
    assert_eq!(Method::from_str("get"), None);
    assert_eq!(Method::from_str("BREW"), None);
}

#[test]
fn test_request_line_is_single_line_without_crlf() {
    assert_eq!(request_line("index.html"), "GET /index.html HTTP/1.1");
    assert_eq!(request_line("/img/a.png"), "GET /img/a.png HTTP/1.1");
    assert_eq!(request_line(""), "GET / HTTP/1.1");
}
