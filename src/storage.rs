use std::fs;
use std::path::{Path, PathBuf};

use crate::crypto::{self, KdfParams};
use crate::models::AppData;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("crypto error: {0}")]
    Crypto(#[from] crypto::CryptoError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("data directory not found")]
    NoDataDir,
    #[error("no data file at {0}")]
    NotInitialized(PathBuf),
}

/// Passphrase-encrypted JSON data file.
#[derive(Debug, Clone)]
pub struct EncryptedStore {
    path: PathBuf,
    kdf: KdfParams,
}

impl EncryptedStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            kdf: KdfParams::default(),
        }
    }

    /// Store in the platform's local data directory.
    pub fn at_default_location() -> Result<Self, StorageError> {
        Ok(Self::new(default_data_file()?))
    }

    /// Override key-derivation cost for newly written files.
    pub fn with_kdf(mut self, kdf: KdfParams) -> Self {
        self.kdf = kdf;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the tracker has been set up before.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Encrypt and write `data`, replacing the previous file.
    pub fn save(&self, passphrase: &str, data: &AppData) -> Result<(), StorageError> {
        let json = zeroize::Zeroizing::new(serde_json::to_vec(data)?);
        let sealed = crypto::seal(passphrase, &json, &self.kdf)?;

        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        let staging = self.path.with_extension("tmp");
        fs::write(&staging, sealed)?;
        fs::rename(&staging, &self.path)?;

        tracing::info!(path = %self.path.display(), records = data.records.len(), "saved data file");
        Ok(())
    }

    pub fn load(&self, passphrase: &str) -> Result<AppData, StorageError> {
        if !self.exists() {
            return Err(StorageError::NotInitialized(self.path.clone()));
        }
        let sealed = fs::read(&self.path)?;
        let json = crypto::open(passphrase, &sealed)?;
        let data: AppData = serde_json::from_slice(&json)?;
        tracing::debug!(records = data.records.len(), "loaded data file");
        Ok(data)
    }

    /// Delete all data permanently.
    pub fn wipe(&self) -> Result<(), StorageError> {
        if self.exists() {
            fs::remove_file(&self.path)?;
            tracing::info!(path = %self.path.display(), "wiped data file");
        }
        Ok(())
    }
}

/// `<local data dir>/cyclecast/data.cyclecast`
pub fn default_data_file() -> Result<PathBuf, StorageError> {
    let dir = dirs::data_local_dir().ok_or(StorageError::NoDataDir)?;
    Ok(dir.join("cyclecast").join("data.cyclecast"))
}
