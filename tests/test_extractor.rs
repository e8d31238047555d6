use minihttp::client::extractor::{ResourceReference, Scope, extract_references, src_attributes};

#[test]
fn test_relative_and_foreign_are_split() {
    let html = r#"<html><img src="img.png"> text <script src="http://otherhost/a.js"></script></html>"#;

    let refs = extract_references(html, "myhost");

    assert_eq!(refs.same_host, vec![ResourceReference {
        url: "img.png".to_string(),
        scope: Scope::SameHost,
    }]);
    assert_eq!(refs.other_host, vec![ResourceReference {
        url: "http://otherhost/a.js".to_string(),
        scope: Scope::OtherHost,
    }]);
}

#[test]
fn test_absolute_url_on_own_host_is_same_host() {
    let refs = extract_references(r#"<img src="http://myhost:8080/logo.png">"#, "myhost");

    assert_eq!(refs.same_host.len(), 1);
    assert!(refs.other_host.is_empty());
}

#[test]
fn test_protocol_relative_is_other_host() {
    let refs = extract_references(r#"<img src="//cdn.example.com/logo.png">"#, "myhost");

    assert_eq!(refs.other_host[0].url, "//cdn.example.com/logo.png");
}

#[test]
fn test_document_order_is_preserved() {
    let html = r#"
        <script src="c.js"></script>
        <img src="https://x.example/1.png">
        <img src="a.png">
        <img src="https://y.example/2.png">
        <img src="b.png">
    "#;

    let refs = extract_references(html, "myhost");

    let same: Vec<_> = refs.same_host.iter().map(|r| r.url.as_str()).collect();
    let other: Vec<_> = refs.other_host.iter().map(|r| r.url.as_str()).collect();
    assert_eq!(same, ["c.js", "a.png", "b.png"]);
    assert_eq!(other, ["https://x.example/1.png", "https://y.example/2.png"]);
}

#[test]
fn test_value_stops_at_next_quote() {
    let html = r#"<img src="a.png" alt="x"><img src="b.png">"#;

    assert_eq!(src_attributes(html), ["a.png", "b.png"]);
}

#[test]
fn test_duplicates_reported_once() {
    let html = r#"<img src="a.png"><img src="a.png">"#;

    assert_eq!(src_attributes(html), ["a.png"]);
}

#[test]
fn test_unterminated_attribute_is_ignored() {
    assert!(src_attributes(r#"<img src="broken"#).is_empty());
}

#[test]
fn test_no_references() {
    assert!(extract_references("<p>plain</p>", "myhost").is_empty());
}
