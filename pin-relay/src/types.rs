/// Relay request/response shapes

use serde::{Deserialize, Serialize};

/// Matches what the claim page expects back from an upload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    #[serde(rename = "imageCID")]
    pub image_cid: String,
    #[serde(rename = "metadataCID")]
    pub metadata_cid: String,
    #[serde(rename = "totalCIDs")]
    pub total_cids: usize,
}

/// ERC-721 style token metadata pinned for each upload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowerMetadata {
    pub name: String,
    pub description: String,
    pub image: String,
}

impl FlowerMetadata {
    pub fn numbered(number: usize, image_cid: &str) -> Self {
        Self {
            name: format!("Flower #{}", number),
            description: "A unique flower, free to claim once per wallet".to_string(),
            image: format!("ipfs://{}", image_cid),
        }
    }
}
