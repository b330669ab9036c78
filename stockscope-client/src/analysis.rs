//! Analysis endpoints
//!
//! Both calls hit the same route; `check_result=1` tells the API to look up
//! an existing result instead of triggering the workflow again.

use async_trait::async_trait;
use reqwest::RequestBuilder;
use stockscope_core::domain::check::CheckResult;
use stockscope_core::dto::analysis::AnalysisResponse;
use stockscope_core::{StatusCheck, classify};
use tracing::debug;

use crate::AnalysisClient;
use crate::error::{ClientError, Result};

pub(crate) const ANALYSIS_PATH: &str = "/api/vercel/stock-analysis";

impl AnalysisClient {
    /// Submit a stock code for analysis
    ///
    /// Starts the backend workflow and returns its first response, which
    /// usually carries basic stock info but no analysis yet.
    ///
    /// # Example
    /// ```no_run
    /// # use stockscope_client::AnalysisClient;
    /// # async fn example() -> stockscope_client::Result<()> {
    /// let client = AnalysisClient::new("http://localhost:3000");
    /// let response = client.request_analysis("600519").await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn request_analysis(&self, code: &str) -> Result<AnalysisResponse> {
        let response = self.analysis_request(code, false)?.send().await?;

        self.handle_response(response).await
    }

    /// Fetch the result of a previously submitted analysis
    ///
    /// Never triggers a new workflow run.
    pub async fn fetch_result(&self, code: &str) -> Result<AnalysisResponse> {
        let response = self.analysis_request(code, true)?.send().await?;

        self.handle_response(response).await
    }

    fn analysis_request(&self, code: &str, check_result: bool) -> Result<RequestBuilder> {
        let code = code.trim();
        if code.is_empty() {
            return Err(ClientError::InvalidRequest(
                "stock code is required".to_string(),
            ));
        }

        let url = format!("{}{}", self.base_url, ANALYSIS_PATH);
        let mut request = self.client.get(&url).query(&[("code", code)]);
        if check_result {
            request = request.query(&[("check_result", "1")]);
        }

        Ok(request)
    }
}

#[async_trait]
impl StatusCheck for AnalysisClient {
    async fn check(&self, job_id: &str) -> CheckResult {
        match self.fetch_result(job_id).await {
            Ok(response) => {
                let result = classify(response, job_id);
                debug!("Result check for {}: ready={}", job_id, result.is_ready());
                result
            }
            Err(e) => CheckResult::Error(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockscope_core::domain::check::CheckError;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Serves one canned HTTP response on loopback; yields the raw request head
    async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut head = Vec::new();
            let mut buf = [0u8; 1024];
            while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                head.extend_from_slice(&buf[..n]);
            }

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;

            String::from_utf8_lossy(&head).into_owned()
        });

        (format!("http://{}", addr), handle)
    }

    #[test]
    fn test_analysis_request_url() -> anyhow::Result<()> {
        let client = AnalysisClient::new("http://localhost:3000/");
        let request = client.analysis_request("000001", false)?.build()?;
        assert_eq!(
            request.url().as_str(),
            "http://localhost:3000/api/vercel/stock-analysis?code=000001"
        );
        Ok(())
    }

    #[test]
    fn test_result_request_sets_check_flag() -> anyhow::Result<()> {
        let client = AnalysisClient::new("http://localhost:3000");
        let request = client.analysis_request(" 600519 ", true)?.build()?;
        assert_eq!(
            request.url().query(),
            Some("code=600519&check_result=1")
        );
        Ok(())
    }

    #[test]
    fn test_empty_code_is_rejected() {
        let client = AnalysisClient::new("http://localhost:3000");
        let err = client.analysis_request("   ", true).unwrap_err();
        assert!(matches!(err, ClientError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn test_check_with_empty_code_is_an_error_result() {
        let client = AnalysisClient::new("http://localhost:3000");
        let result = client.check("").await;
        assert!(result.is_error());
    }

    #[tokio::test]
    async fn test_check_maps_error_status_to_transport() {
        let (url, server) = serve_once("502 Bad Gateway", "oops").await;
        let client = AnalysisClient::new(url);

        let result = client.check("000001").await;
        assert_eq!(
            result,
            CheckResult::Error(CheckError::Transport("HTTP 502: oops".to_string()))
        );

        let request = server.await.unwrap();
        assert!(request.starts_with(
            "GET /api/vercel/stock-analysis?code=000001&check_result=1 HTTP/1.1"
        ));
    }

    #[tokio::test]
    async fn test_check_maps_bad_json_to_malformed_response() {
        let (url, server) = serve_once("200 OK", "{not json").await;
        let client = AnalysisClient::new(url);

        let result = client.check("000001").await;
        assert!(matches!(
            result,
            CheckResult::Error(CheckError::MalformedResponse(_))
        ));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_check_pending_body_is_not_ready() {
        let (url, server) = serve_once("200 OK", r#"{"stock_code":"000001","status":"processing"}"#).await;
        let client = AnalysisClient::new(url);

        assert_eq!(client.check("000001").await, CheckResult::NotReady);
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_check_upstream_error_field() {
        let (url, server) = serve_once("200 OK", r#"{"error":"Stock 999999 not found"}"#).await;
        let client = AnalysisClient::new(url);

        assert_eq!(
            client.check("999999").await,
            CheckResult::Error(CheckError::Upstream("Stock 999999 not found".to_string()))
        );
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_check_finished_body_is_ready() {
        let (url, server) = serve_once(
            "200 OK",
            r#"{"stock_code":"600519","error":"","analysis":{"professional_analysis":"Hold."}}"#,
        )
        .await;
        let client = AnalysisClient::new(url);

        match client.check("600519").await {
            CheckResult::Ready(payload) => {
                assert_eq!(payload["stock_code"], "600519");
                assert_eq!(payload["analysis"]["professional_analysis"], "Hold.");
                assert_eq!(payload["data_source"], "n8n_workflow");
            }
            other => panic!("expected ready, got {:?}", other),
        }
        server.await.unwrap();
    }
}
