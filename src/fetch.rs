//! Input source loading: local files or HTTP(S) URLs.

use anyhow::Result;
use async_trait::async_trait;
use tracing::debug;

#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: reqwest::Request) -> reqwest::Result<reqwest::Response>;
}

pub struct BasicClient(reqwest::Client);

impl BasicClient {
    pub fn new() -> Self {
        Self(reqwest::Client::new())
    }
}

impl Default for BasicClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for BasicClient {
    async fn execute(&self, req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        self.0.execute(req).await
    }
}

pub async fn fetch_bytes<C: HttpClient>(client: &C, url: &str) -> Result<Vec<u8>> {
    let req = reqwest::Request::new(reqwest::Method::GET, url.parse()?);

    let resp = client.execute(req).await?;
    Ok(resp.bytes().await?.to_vec())
}

/// Loads raw report input from a local path or fetches it over HTTP.
pub async fn load_source(source: &str) -> Result<Vec<u8>> {
    let bytes = if source.starts_with("http://") || source.starts_with("https://") {
        debug!(source, "Fetching input over HTTP");
        let client = BasicClient::new();
        fetch_bytes(&client, source).await?
    } else {
        debug!(source, "Reading input from file");
        std::fs::read(source)?
    };
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_source_reads_local_file() {
        let path = format!(
            "{}/transit_reporter_test_source.csv",
            std::env::temp_dir().display()
        );
        std::fs::write(&path, b"route_id\n101\n").unwrap();

        let bytes = load_source(&path).await.unwrap();
        assert_eq!(bytes, b"route_id\n101\n");

        std::fs::remove_file(&path).unwrap();
    }

    #[tokio::test]
    async fn test_load_source_missing_file_errors() {
        let result = load_source("/no/such/file.csv").await;
        assert!(result.is_err());
    }
}
