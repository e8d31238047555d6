//! Tests for the GET client and redirect following

mod common;

use std::time::Duration;

use common::{loopback_settings, spawn_server, write_file};
use minihttp::client::engine::MAX_REDIRECTS;
use minihttp::client::{Endpoint, ParsedResponse, WebClient, describe_page};
use minihttp::error::ClientError;
use minihttp::http::response::StatusCode;
use tokio::io::AsyncReadExt;
use tokio::net::TcpListener;

#[tokio::test]
async fn test_redirect_is_followed() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "new.html", b"moved here");
    let mut settings = loopback_settings(dir.path());
    settings.redirected.insert("old.html".into(), "new.html".into());
    let running = spawn_server(settings).await;
    let client = WebClient::new(Endpoint::new("127.0.0.1", running.addr.port()));

    let response = client.fetch("old.html").await.unwrap();

    assert_eq!(response.status_code(), Some(200));
    assert_eq!(response.body(), Some(&b"moved here"[..]));
    running.handle.stop();
}

#[tokio::test]
async fn test_redirect_cycle_is_abandoned() {
    let dir = tempfile::tempdir().unwrap();
    let mut settings = loopback_settings(dir.path());
    settings.redirected.insert("a.html".into(), "b.html".into());
    settings.redirected.insert("b.html".into(), "a.html".into());
    let running = spawn_server(settings).await;
    let client = WebClient::new(Endpoint::new("127.0.0.1", running.addr.port()));

    let result = client.fetch("a.html").await;

    assert!(matches!(result, Err(ClientError::RedirectLoop { hops: 2, .. })));
    assert!(client.request_get("a.html").await.is_none());
    running.handle.stop();
}

#[tokio::test]
async fn test_redirect_chain_is_capped() {
    let dir = tempfile::tempdir().unwrap();
    let mut settings = loopback_settings(dir.path());
    for i in 0..MAX_REDIRECTS + 5 {
        settings
            .redirected
            .insert(format!("hop{i}.html"), format!("hop{}.html", i + 1));
    }
    let running = spawn_server(settings).await;
    let client = WebClient::new(Endpoint::new("127.0.0.1", running.addr.port()));

    let result = client.fetch("hop0.html").await;

    assert!(matches!(
        result,
        Err(ClientError::RedirectLoop { hops, .. }) if hops == MAX_REDIRECTS + 1
    ));
    running.handle.stop();
}

#[tokio::test]
async fn test_connection_refused_returns_none() {
    // Bind then drop to get a port nobody listens on.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let client = WebClient::new(Endpoint::new("127.0.0.1", port));

    assert!(matches!(
        client.fetch("index.html").await,
        Err(ClientError::Connect { .. })
    ));
    assert!(client.request_get("index.html").await.is_none());
}

#[tokio::test]
async fn test_silent_server_times_out() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let silent = tokio::spawn(async move {
        let (_socket, _) = listener.accept().await.unwrap();
        tokio::time::sleep(Duration::from_secs(10)).await;
    });

    let client = WebClient::new(
        Endpoint::new("127.0.0.1", port).with_timeout(Duration::from_millis(200)),
    );

    assert!(matches!(
        client.fetch("index.html").await,
        Err(ClientError::Timeout { .. })
    ));
    silent.abort();
}

#[tokio::test]
async fn test_describe_page_classifies_resources() {
    let dir = tempfile::tempdir().unwrap();
    write_file(
        dir.path(),
        "index.html",
        br#"<img src="logo.png"><script src="http://cdn.example.org/app.js"></script>"#,
    );
    let running = spawn_server(loopback_settings(dir.path())).await;
    let client = WebClient::new(Endpoint::new("127.0.0.1", running.addr.port()));

    let page = describe_page(&client, "index.html").await.unwrap();

    assert_eq!(page.status_line, "HTTP/1.1 200 OK");
    assert_eq!(page.references.same_host[0].url, "logo.png");
    assert_eq!(page.references.other_host[0].url, "http://cdn.example.org/app.js");
    running.handle.stop();
}

#[tokio::test]
async fn test_leading_backslash_shares_the_visited_key() {
    let dir = tempfile::tempdir().unwrap();
    let mut settings = loopback_settings(dir.path());
    settings.redirected.insert("a.html".into(), "b.html".into());
    settings.redirected.insert("b.html".into(), "a.html".into());
    let running = spawn_server(settings).await;
    let client = WebClient::new(Endpoint::new("127.0.0.1", running.addr.port()));

    let result = client.fetch("\\a.html").await;

    assert!(matches!(result, Err(ClientError::RedirectLoop { hops: 2, .. })));
    running.handle.stop();
}

#[tokio::test]
async fn test_peer_closing_without_reply_is_a_failure() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let acceptor = tokio::spawn(async move {
        for _ in 0..2 {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            stream.read_to_end(&mut request).await.unwrap();
            drop(stream);
        }
    });
    let client = WebClient::new(Endpoint::new("127.0.0.1", port).with_timeout(Duration::from_secs(5)));

    let result = client.fetch("index.html").await;
    assert!(matches!(result, Err(ClientError::EmptyResponse { .. })));
    assert!(client.request_get("index.html").await.is_none());

    acceptor.await.unwrap();
}

#[test]
fn test_parsed_response_status() {
    let ok = ParsedResponse::new(bytes::Bytes::from_static(b"HTTP/1.1 200 OK\r\n\r\n"));
    let teapot = ParsedResponse::new(bytes::Bytes::from_static(b"HTTP/1.1 418 I'm a teapot\r\n\r\n"));

    assert_eq!(ok.status(), Some(StatusCode::Ok));
    assert_eq!(teapot.status_code(), Some(418));
    assert_eq!(teapot.status(), None);
}

#[test]
fn test_parsed_response_accessors() {
    let response = ParsedResponse::new(bytes::Bytes::from_static(
        b"HTTP/1.1 301 Moved Permanently\r\nLocation: /b.html\r\nContent-Length: 0\r\n\r\n",
    ));

    assert!(response.is_redirect());
    assert_eq!(response.header("location"), Some("/b.html"));
    assert_eq!(response.body(), Some(&b""[..]));
}
