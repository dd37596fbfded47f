/// Pinning backend
///
/// `PinataClient` talks to the Pinata pinning API with a JWT; tests swap in
/// their own `Pinner`.

use std::future::Future;

use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;

pub const DEFAULT_PINATA_API_URL: &str = "https://api.pinata.cloud";

#[derive(Error, Debug)]
pub enum PinError {
    #[error("Pinning service unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Pinning service returned {status}: {body}")]
    Rejected { status: u16, body: String },
}

pub trait Pinner: Send + Sync {
    /// Pin raw bytes, returning the content identifier
    fn pin_file(
        &self,
        name: &str,
        mime_type: &str,
        bytes: Vec<u8>,
    ) -> impl Future<Output = Result<String, PinError>> + Send;

    /// Pin a JSON document, returning the content identifier
    fn pin_json(&self, name: &str, content: &Value)
        -> impl Future<Output = Result<String, PinError>> + Send;
}

#[derive(Debug, Deserialize)]
struct PinResponse {
    #[serde(rename = "IpfsHash")]
    ipfs_hash: String,
}

pub struct PinataClient {
    http: reqwest::Client,
    api_url: String,
    jwt: String,
}

impl PinataClient {
    pub fn new(http: reqwest::Client, api_url: impl Into<String>, jwt: impl Into<String>) -> Self {
        Self {
            http,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            jwt: jwt.into(),
        }
    }

    async fn read_hash(response: reqwest::Response) -> Result<String, PinError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PinError::Rejected {
                status: status.as_u16(),
                body,
            });
        }
        let pinned: PinResponse = response.json().await?;
        Ok(pinned.ipfs_hash)
    }
}

impl Pinner for PinataClient {
    async fn pin_file(&self, name: &str, mime_type: &str, bytes: Vec<u8>) -> Result<String, PinError> {
        let part = Part::bytes(bytes)
            .file_name(name.to_string())
            .mime_str(mime_type)?;
        let form = Form::new()
            .part("file", part)
            .text("pinataMetadata", json!({ "name": name }).to_string());

        let response = self
            .http
            .post(format!("{}/pinning/pinFileToIPFS", self.api_url))
            .bearer_auth(&self.jwt)
            .multipart(form)
            .send()
            .await?;
        Self::read_hash(response).await
    }

    async fn pin_json(&self, name: &str, content: &Value) -> Result<String, PinError> {
        let body = json!({
            "pinataContent": content,
            "pinataMetadata": { "name": name },
        });

        let response = self
            .http
            .post(format!("{}/pinning/pinJSONToIPFS", self.api_url))
            .bearer_auth(&self.jwt)
            .json(&body)
            .send()
            .await?;
        Self::read_hash(response).await
    }
}
