//! HttpManifestSource against a loopback HTTP responder.

use std::time::Duration;

use manifest::HttpManifestSource;
use pipeline::{ManifestError, ManifestSource};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Serves exactly one canned response and returns the URL to fetch.
async fn serve_once(status_line: &'static str, body: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();

        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }

        let response = format!(
            "HTTP/1.1 {status_line}\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.unwrap();
    });

    format!("http://{addr}/repos.txt")
}

/// Loopback requests must not be routed through an ambient proxy.
fn source(url: &str) -> HttpManifestSource {
    let client = reqwest::Client::builder()
        .no_proxy()
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap();
    HttpManifestSource::with_client(client, url)
}

#[tokio::test]
async fn fetches_and_splits_manifest_lines() {
    let url = serve_once(
        "200 OK",
        "https://github.com/org/a.git abc123\r\n\nhttps://github.com/org/b.git def456",
    )
    .await;

    let lines = source(&url).fetch_lines().await.unwrap();
    assert_eq!(
        lines,
        vec![
            "https://github.com/org/a.git abc123",
            "",
            "https://github.com/org/b.git def456",
        ]
    );
}

#[tokio::test]
async fn non_success_status_is_an_error() {
    let url = serve_once("404 Not Found", "missing").await;

    let err = source(&url).fetch_lines().await.unwrap_err();
    assert!(matches!(err, ManifestError::UnexpectedStatus(404)), "{err}");
    assert_eq!(err.to_string(), "unexpected status code 404");
}

#[tokio::test]
async fn unreachable_host_is_a_transport_error() {
    // Bind then drop to obtain a port nothing is listening on.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = source(&format!("http://{addr}/repos.txt"))
        .fetch_lines()
        .await
        .unwrap_err();
    assert!(matches!(err, ManifestError::Transport(_)), "{err}");
    assert!(err.to_string().starts_with("HTTP GET error"));
}

#[tokio::test]
async fn location_is_the_url() {
    let src = HttpManifestSource::new("https://example.com/repos.txt", Duration::from_secs(5)).unwrap();
    assert_eq!(src.location(), "https://example.com/repos.txt");
}
