/// File-backed availability registry
///
/// The whole list lives in memory behind one async mutex and is rewritten
/// to disk after every append.

use std::path::{Path, PathBuf};

use flower_mint::{AvailabilityRegistry, CandidateRecord};
use tokio::sync::{Mutex, MutexGuard};

pub struct RegistryStore {
    path: PathBuf,
    records: Mutex<Vec<CandidateRecord>>,
}

impl RegistryStore {
    /// Load `path`, starting empty when the file does not exist yet
    pub async fn open(path: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let path = path.into();
        let records = match tokio::fs::read_to_string(&path).await {
            Ok(json) => AvailabilityRegistry::from_json(&json)
                .map_err(|e| anyhow::anyhow!("Invalid registry file {:?}: {}", path, e))?
                .records()
                .to_vec(),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("📄 No registry at {:?}, starting empty", path);
                Vec::new()
            }
            Err(e) => return Err(e.into()),
        };
        log::info!("📚 Registry {:?}: {} entries", path, records.len());

        Ok(Self {
            path,
            records: Mutex::new(records),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn snapshot(&self) -> Vec<CandidateRecord> {
        self.records.lock().await.clone()
    }

    /// Exclusive access for the duration of one upload, so flower numbers
    /// and appends stay in step
    pub async fn lock(&self) -> MutexGuard<'_, Vec<CandidateRecord>> {
        self.records.lock().await
    }

    pub async fn persist(&self, records: &[CandidateRecord]) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(records)?;
        tokio::fs::write(&self.path, json).await?;
        Ok(())
    }
}
