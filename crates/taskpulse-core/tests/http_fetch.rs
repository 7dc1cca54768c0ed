use std::net::SocketAddr;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use taskpulse_core::{FetchError, HttpFetcher, SourceFetcher};

async fn read_request(stream: &mut TcpStream) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = stream.read(&mut chunk).await.expect("read request");
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
}

fn http_fetcher(addr: SocketAddr, timeout: Duration) -> HttpFetcher {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .no_proxy()
        .build()
        .expect("client");
    HttpFetcher::with_client(format!("http://{addr}/export.csv"), client)
}

/// Answers a single request with the given status line and body.
async fn serve_once(status_line: &'static str, body: &'static str) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.expect("accept");
        read_request(&mut stream).await;
        let response = format!(
            "HTTP/1.1 {status_line}\r\nContent-Type: text/csv\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        stream
            .write_all(response.as_bytes())
            .await
            .expect("write response");
        stream.shutdown().await.ok();
    });
    addr
}

#[tokio::test]
async fn fetches_body_on_success() {
    let addr = serve_once("200 OK", "Task,Status\nA,Done\n").await;
    let fetcher = http_fetcher(addr, Duration::from_secs(5));

    let body = fetcher.fetch().await.expect("fetch");
    assert_eq!(body, b"Task,Status\nA,Done\n");
}

#[tokio::test]
async fn non_success_status_is_a_fetch_error() {
    let addr = serve_once("500 Internal Server Error", "oops").await;
    let fetcher = http_fetcher(addr, Duration::from_secs(5));

    let err = fetcher.fetch().await.expect_err("should fail");
    assert!(matches!(err, FetchError::Status { status: 500, .. }), "{err}");
}

#[tokio::test]
async fn unreachable_source_is_a_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);

    let fetcher = http_fetcher(addr, Duration::from_secs(5));
    let err = fetcher.fetch().await.expect_err("should fail");
    assert!(matches!(err, FetchError::Transport { .. }), "{err}");
}

#[tokio::test]
async fn stalled_source_times_out() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.expect("accept");
        read_request(&mut stream).await;
        tokio::time::sleep(Duration::from_secs(5)).await;
    });

    let fetcher = http_fetcher(addr, Duration::from_millis(200));
    let err = fetcher.fetch().await.expect_err("should time out");
    assert!(matches!(err, FetchError::Timeout { .. }), "{err}");
}
