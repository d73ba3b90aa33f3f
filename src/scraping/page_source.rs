use crate::scraping::error::ScrapeError;
use log::debug;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Outcome of a failed page fetch, split by whether the scrape loop should retry.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The connection could not be established. The loop backs off and retries the same date.
    #[error("Connection to {url} failed")]
    Connection {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Anything else. Aborts the run.
    #[error(transparent)]
    Fatal(#[from] ScrapeError),
}

/// Something that can turn a history URL into a page body.
#[allow(async_fn_in_trait)]
pub trait PageSource {
    async fn fetch(&self, url: &Url) -> Result<String, FetchError>;
}

/// [`PageSource`] backed by a plain `reqwest` GET.
///
/// The HTTP status is not inspected: whatever body the server answers with is returned.
pub struct HttpPageSource {
    client: Client,
}

impl HttpPageSource {
    pub fn new(timeout: Option<Duration>) -> Result<Self, ScrapeError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(ScrapeError::ClientBuild)?;
        Ok(Self { client })
    }

    fn classify(url: &Url, e: reqwest::Error) -> FetchError {
        if e.is_connect() {
            FetchError::Connection {
                url: url.to_string(),
                source: Box::new(e),
            }
        } else {
            FetchError::Fatal(ScrapeError::Request(url.to_string(), e))
        }
    }
}

impl PageSource for HttpPageSource {
    async fn fetch(&self, url: &Url) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| Self::classify(url, e))?;
        debug!("{} answered with status {}", url, response.status());
        response.text().await.map_err(|e| Self::classify(url, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serves exactly one connection with a canned HTTP response.
    async fn serve_once(response: String) -> Result<Url, Box<dyn std::error::Error>> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            if let Ok((mut stream, _)) = listener.accept().await {
                let mut buf = vec![0u8; 4096];
                let mut request = Vec::new();
                while let Ok(n) = stream.read(&mut buf).await {
                    if n == 0 {
                        break;
                    }
                    request.extend_from_slice(&buf[..n]);
                    if request.windows(4).any(|w| w == b"\r\n\r\n") {
                        break;
                    }
                }
                let _ = stream.write_all(response.as_bytes()).await;
                let _ = stream.shutdown().await;
            }
        });
        Ok(Url::parse(&format!("http://{}/history?ID=X", addr))?)
    }

    fn http_response(status: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {}\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        )
    }

    #[tokio::test]
    async fn test_fetch_returns_body() -> Result<(), Box<dyn std::error::Error>> {
        let body = "Time,TemperatureF<br>\n2020-01-01 00:05:00,51.2<br>\n";
        let url = serve_once(http_response("200 OK", body)).await?;
        let source = HttpPageSource::new(Some(Duration::from_secs(10)))?;
        let fetched = source.fetch(&url).await?;
        assert_eq!(fetched, body);
        Ok(())
    }

    #[tokio::test]
    async fn test_fetch_ignores_http_status() -> Result<(), Box<dyn std::error::Error>> {
        let url = serve_once(http_response("500 Internal Server Error", "oops")).await?;
        let source = HttpPageSource::new(Some(Duration::from_secs(10)))?;
        assert_eq!(source.fetch(&url).await?, "oops");
        Ok(())
    }

    #[tokio::test]
    async fn test_refused_connection_is_retryable() -> Result<(), Box<dyn std::error::Error>> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        drop(listener);

        let url = Url::parse(&format!("http://{}/history", addr))?;
        let source = HttpPageSource::new(Some(Duration::from_secs(10)))?;
        let err = source.fetch(&url).await.unwrap_err();
        assert!(matches!(err, FetchError::Connection { .. }), "got {:?}", err);
        Ok(())
    }

    #[tokio::test]
    async fn test_dropped_response_is_fatal() -> Result<(), Box<dyn std::error::Error>> {
        // Connection succeeds but the server hangs up without answering.
        let url = serve_once(String::new()).await?;
        let source = HttpPageSource::new(Some(Duration::from_secs(10)))?;
        let err = source.fetch(&url).await.unwrap_err();
        assert!(
            matches!(err, FetchError::Fatal(ScrapeError::Request(..))),
            "got {:?}",
            err
        );
        Ok(())
    }
}
