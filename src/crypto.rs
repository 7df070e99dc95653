use aes_gcm::{
    aead::{Aead, KeyInit, Payload},
    Aes256Gcm, Nonce,
};
use argon2::{Algorithm, Argon2, Params, Version};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

const MAGIC: &[u8; 6] = b"CYCAST";
const FORMAT_VERSION: u8 = 1;
const SALT_LEN: usize = 32;
const NONCE_LEN: usize = 12;
const KEY_LEN: usize = 32;
/// magic || version || memory || iterations || lanes
const HEADER_LEN: usize = MAGIC.len() + 1 + 3 * 4;
/// Ceilings on header-supplied KDF costs, checked before any key derivation.
const MAX_MEMORY_KIB: u32 = 4 * 65536;
const MAX_ITERATIONS: u32 = 10;
const MAX_LANES: u32 = 16;

#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    #[error("key derivation failed")]
    KeyDerivation,
    #[error("encryption failed")]
    Encryption,
    #[error("decryption failed: wrong passphrase or corrupted data")]
    Decryption,
    #[error("invalid data format")]
    InvalidFormat,
    #[error("unsupported format version {0}")]
    UnsupportedVersion(u8),
}

/// Argon2id cost parameters. Stored in the envelope header so files sealed
/// with older parameters still open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KdfParams {
    pub memory_kib: u32,
    pub iterations: u32,
    pub lanes: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            memory_kib: 65536,
            iterations: 3,
            lanes: 1,
        }
    }
}

impl KdfParams {
    fn header(&self) -> [u8; HEADER_LEN] {
        let mut header = [0u8; HEADER_LEN];
        header[..MAGIC.len()].copy_from_slice(MAGIC);
        header[MAGIC.len()] = FORMAT_VERSION;
        let mut offset = MAGIC.len() + 1;
        for value in [self.memory_kib, self.iterations, self.lanes] {
            header[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
            offset += 4;
        }
        header
    }

    fn from_header(header: &[u8]) -> Result<Self, CryptoError> {
        if header.len() != HEADER_LEN || &header[..MAGIC.len()] != MAGIC {
            return Err(CryptoError::InvalidFormat);
        }
        let version = header[MAGIC.len()];
        if version != FORMAT_VERSION {
            return Err(CryptoError::UnsupportedVersion(version));
        }
        let field = |i: usize| {
            let start = MAGIC.len() + 1 + i * 4;
            let mut bytes = [0u8; 4];
            bytes.copy_from_slice(&header[start..start + 4]);
            u32::from_le_bytes(bytes)
        };
        let params = Self {
            memory_kib: field(0),
            iterations: field(1),
            lanes: field(2),
        };
        if !params.within_limits() {
            return Err(CryptoError::InvalidFormat);
        }
        Ok(params)
    }

    fn within_limits(&self) -> bool {
        (1..=MAX_LANES).contains(&self.lanes)
            && (1..=MAX_ITERATIONS).contains(&self.iterations)
            && (8 * self.lanes..=MAX_MEMORY_KIB).contains(&self.memory_kib)
    }
}

fn derive_key(
    passphrase: &str,
    salt: &[u8],
    kdf: &KdfParams,
) -> Result<Zeroizing<[u8; KEY_LEN]>, CryptoError> {
    let params = Params::new(kdf.memory_kib, kdf.iterations, kdf.lanes, Some(KEY_LEN))
        .map_err(|_| CryptoError::KeyDerivation)?;
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    argon2
        .hash_password_into(passphrase.as_bytes(), salt, &mut key[..])
        .map_err(|_| CryptoError::KeyDerivation)?;
    Ok(key)
}

/// Seal `plaintext` under a passphrase-derived key.
///
/// Layout: header || salt (32) || nonce (12) || ciphertext. The header is
/// authenticated as associated data, so tampering with the KDF parameters
/// fails decryption.
pub fn seal(passphrase: &str, plaintext: &[u8], kdf: &KdfParams) -> Result<Vec<u8>, CryptoError> {
    let mut salt = [0u8; SALT_LEN];
    let mut nonce_bytes = [0u8; NONCE_LEN];
    let mut rng = rand::thread_rng();
    rng.fill_bytes(&mut salt);
    rng.fill_bytes(&mut nonce_bytes);

    let header = kdf.header();
    let key = derive_key(passphrase, &salt, kdf)?;
    let cipher = Aes256Gcm::new_from_slice(&key[..]).map_err(|_| CryptoError::Encryption)?;

    let ciphertext = cipher
        .encrypt(
            Nonce::from_slice(&nonce_bytes),
            Payload {
                msg: plaintext,
                aad: &header,
            },
        )
        .map_err(|_| CryptoError::Encryption)?;

    let mut sealed = Vec::with_capacity(HEADER_LEN + SALT_LEN + NONCE_LEN + ciphertext.len());
    sealed.extend_from_slice(&header);
    sealed.extend_from_slice(&salt);
    sealed.extend_from_slice(&nonce_bytes);
    sealed.extend_from_slice(&ciphertext);
    Ok(sealed)
}

/// Open data produced by [`seal`]. The returned buffer is wiped on drop.
pub fn open(passphrase: &str, sealed: &[u8]) -> Result<Zeroizing<Vec<u8>>, CryptoError> {
    if sealed.len() < HEADER_LEN + SALT_LEN + NONCE_LEN {
        return Err(CryptoError::InvalidFormat);
    }

    let (header, rest) = sealed.split_at(HEADER_LEN);
    let (salt, rest) = rest.split_at(SALT_LEN);
    let (nonce_bytes, ciphertext) = rest.split_at(NONCE_LEN);

    let kdf = KdfParams::from_header(header)?;
    let key = derive_key(passphrase, salt, &kdf)?;
    let cipher = Aes256Gcm::new_from_slice(&key[..]).map_err(|_| CryptoError::Decryption)?;

    cipher
        .decrypt(
            Nonce::from_slice(nonce_bytes),
            Payload {
                msg: ciphertext,
                aad: header,
            },
        )
        .map(Zeroizing::new)
        .map_err(|_| CryptoError::Decryption)
}
