//! One-shot loopback HTTP server answering with a canned response.

use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

/// The request line, headers and body received by a [`CannedServer`].
#[derive(Debug, Clone, Default)]
pub struct CapturedRequest {
    pub request_line: String,
    pub headers: Vec<String>,
    pub body: String,
}

impl CapturedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        let prefix = format!("{}:", name.to_ascii_lowercase());
        self.headers
            .iter()
            .find(|line| line.to_ascii_lowercase().starts_with(&prefix))
            .map(|line| line[prefix.len()..].trim())
    }
}

pub struct CannedServer {
    pub base_url: String,
    captured: oneshot::Receiver<CapturedRequest>,
}

impl CannedServer {
    /// Bind to an ephemeral port and answer the first request with `status`
    /// and a JSON `body`.
    pub async fn start(status: u16, body: &str) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind loopback");
        let address = listener.local_addr().expect("local address");
        let (sender, captured) = oneshot::channel();
        let response = format!(
            "HTTP/1.1 {status} Canned\r\n\
             content-type: application/json\r\n\
             content-length: {}\r\n\
             connection: close\r\n\r\n{body}",
            body.len()
        );

        tokio::spawn(async move {
            let (stream, _) = listener.accept().await.expect("accept connection");
            let mut reader = BufReader::new(stream);
            let mut request = CapturedRequest::default();
            reader
                .read_line(&mut request.request_line)
                .await
                .expect("read request line");
            let mut content_length = 0_usize;
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).await.expect("read header");
                let line = line.trim_end().to_owned();
                if line.is_empty() {
                    break;
                }
                if let Some(value) = line.to_ascii_lowercase().strip_prefix("content-length:") {
                    content_length = value.trim().parse().expect("numeric content length");
                }
                request.headers.push(line);
            }
            let mut body = vec![0_u8; content_length];
            reader.read_exact(&mut body).await.expect("read body");
            request.body = String::from_utf8(body).expect("utf-8 body");
            reader
                .get_mut()
                .write_all(response.as_bytes())
                .await
                .expect("write response");
            let _ = sender.send(request);
        });

        Self {
            base_url: format!("http://{address}"),
            captured,
        }
    }

    /// The request the server received.
    pub async fn captured(self) -> CapturedRequest {
        self.captured.await.expect("server captured a request")
    }
}

/// A loopback URL with nothing listening behind it.
pub async fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind loopback");
    let address = listener.local_addr().expect("local address");
    drop(listener);
    format!("http://{address}")
}
