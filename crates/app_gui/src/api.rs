//! Blocking HTTP client for the screening service.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use pneumoscan_core::{PredictRequest, PredictResponse};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Client for the service's batch endpoint. Built per prediction from the
/// currently configured base URL.
pub struct ApiClient {
    http: reqwest::blocking::Client,
    base_url: String,
}

impl ApiClient {
    /// Build a client for `base_url` (scheme, host, and port; any trailing
    /// slash is dropped).
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("cannot build HTTP client")?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { http, base_url })
    }

    /// POST the encoded batch to `/batch-predict` and parse the response.
    /// Transport failures, non-2xx statuses, and undecodable bodies all
    /// surface as errors for the status line.
    pub fn predict_batch(&self, images: Vec<String>) -> Result<PredictResponse> {
        let url = format!("{}/batch-predict", self.base_url);
        let response = self
            .http
            .post(&url)
            .json(&PredictRequest { images })
            .send()
            .with_context(|| format!("request to {url} failed"))?;

        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!("service returned {status} for {url}"));
        }
        response
            .json()
            .context("service returned an undecodable body")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    fn headers_end(buf: &[u8]) -> Option<usize> {
        buf.windows(4).position(|w| w == b"\r\n\r\n").map(|i| i + 4)
    }

    fn content_length(head: &str) -> usize {
        head.lines()
            .find_map(|line| {
                let (name, value) = line.split_once(':')?;
                if name.eq_ignore_ascii_case("content-length") {
                    value.trim().parse().ok()
                } else {
                    None
                }
            })
            .unwrap_or(0)
    }

    /// Serve exactly one request with a canned response. Returns the base
    /// URL and a handle resolving to the raw request text.
    fn serve_once(
        status_line: &'static str,
        body: String,
    ) -> (String, thread::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind test listener");
        let addr = listener.local_addr().expect("listener addr");
        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().expect("accept connection");
            let mut request = Vec::new();
            let mut buf = [0u8; 8192];
            loop {
                let n = stream.read(&mut buf).expect("read request");
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
                if let Some(end) = headers_end(&request) {
                    let head = String::from_utf8_lossy(&request[..end]).into_owned();
                    if request.len() >= end + content_length(&head) {
                        break;
                    }
                }
            }
            let response = format!(
                "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).expect("write response");
            String::from_utf8_lossy(&request).into_owned()
        });
        (format!("http://{addr}"), handle)
    }

    #[test]
    fn predict_batch_posts_json_and_parses_the_response() {
        let body = serde_json::json!({
            "batch_results": [{
                "image": "aW1n",
                "result": "PNEUMONIA",
                "confidence": "97.31%",
                "heatmap": "Y2Ft",
            }]
        })
        .to_string();
        let (base_url, server) = serve_once("200 OK", body);

        // Trailing slash must not produce a double-slash path.
        let client = ApiClient::new(format!("{base_url}/")).unwrap();
        let response = client.predict_batch(vec!["aW1n".to_string()]).unwrap();
        assert_eq!(response.batch_results.len(), 1);
        assert_eq!(response.batch_results[0].result, "PNEUMONIA");
        assert_eq!(response.batch_results[0].confidence, "97.31%");

        let request = server.join().unwrap().to_ascii_lowercase();
        assert!(request.starts_with("post /batch-predict http/1.1"));
        assert!(request.contains("content-type: application/json"));
        assert!(request.contains("\"images\":[\"aw1n\"]"));
    }

    #[rstest]
    #[case("500 Internal Server Error", "500")]
    #[case("404 Not Found", "404")]
    fn predict_batch_reports_error_statuses(
        #[case] status_line: &'static str,
        #[case] code: &str,
    ) {
        let (base_url, server) = serve_once(status_line, "{}".to_string());

        let client = ApiClient::new(base_url).unwrap();
        let err = client
            .predict_batch(vec!["aW1n".to_string()])
            .unwrap_err();
        assert!(err.to_string().contains(code));
        server.join().unwrap();
    }

    #[test]
    fn predict_batch_reports_an_undecodable_body() {
        let (base_url, server) = serve_once("200 OK", "not json".to_string());

        let client = ApiClient::new(base_url).unwrap();
        let err = client
            .predict_batch(vec!["aW1n".to_string()])
            .unwrap_err();
        assert!(err.to_string().contains("undecodable"));
        server.join().unwrap();
    }

    #[test]
    fn predict_batch_reports_an_unreachable_service() {
        let client = ApiClient::new("http://127.0.0.1:9").unwrap();
        assert!(client.predict_batch(vec!["aW1n".to_string()]).is_err());
    }
}
