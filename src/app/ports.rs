use async_trait::async_trait;

use crate::error::Result;

#[async_trait]
pub trait HttpClientPort: Send + Sync {
    /// GET `url` and return the body of a successful response.
    async fn get(&self, url: &str) -> Result<HttpGetResult>;
}

#[derive(Clone, Debug)]
pub struct HttpGetResult {
    pub status: u16,
    pub bytes: Vec<u8>,
}
