//! The secure envelope around rollup calldata blobs.
//!
//! Sealing compresses the plaintext and then encrypts it with the shared symmetric key held
//! by all enclaves; opening is the exact inverse. The only contract is round-trip identity:
//! `open(seal(x)) == x`.

use aes_gcm_siv::{aead::AeadInPlace, Aes256GcmSiv, KeyInit, Nonce};
use rand_core::{OsRng, RngCore};
use std::fmt::{self, Debug, Formatter};

/// The length of the nonce appended to every sealed blob.
const NONCE_LENGTH: usize = 12;
/// The length of the authentication tag inside every sealed blob.
const TAG_LENGTH: usize = 16;

/// An error occurring while sealing or opening a blob. All of them are fatal for the rollup
/// being handled.
#[derive(Debug, thiserror::Error)]
pub enum EnvelopeError {
    /// Compression of the plaintext failed.
    #[error("compression failed: {0}")]
    Compression(String),
    /// Decompression of the decrypted blob failed.
    #[error("decompression failed: {0}")]
    Decompression(String),
    /// Decryption or the integrity check of the blob failed.
    #[error("ciphertext authentication failed")]
    Authentication,
    /// The blob is too short to hold a tag and a nonce.
    #[error("sealed blob too short")]
    TruncatedBlob,
}

/// The envelope: `seal = encrypt(compress(x))` and `open = decompress(decrypt(x))` over
/// opaque byte blobs.
///
/// Sealed blobs are laid out as `ciphertext || tag || nonce`, with a fresh random nonce per
/// seal.
pub struct SecureEnvelope {
    cipher: Aes256GcmSiv,
    compression_level: i32,
}

impl Debug for SecureEnvelope {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecureEnvelope")
            .field("compression_level", &self.compression_level)
            .finish_non_exhaustive()
    }
}

impl SecureEnvelope {
    /// Returns a new envelope over the given shared key, using the default compression level.
    pub fn new(key: &[u8; 32]) -> Self {
        Self::with_compression_level(key, zstd::DEFAULT_COMPRESSION_LEVEL)
    }

    /// Returns a new envelope over the given shared key and compression level.
    pub fn with_compression_level(key: &[u8; 32], compression_level: i32) -> Self {
        Self { cipher: Aes256GcmSiv::new(key.into()), compression_level }
    }

    /// Compresses and encrypts the plaintext.
    pub fn seal(&self, plaintext: &[u8]) -> Result<Vec<u8>, EnvelopeError> {
        let mut blob = zstd::stream::encode_all(plaintext, self.compression_level)
            .map_err(|err| EnvelopeError::Compression(err.to_string()))?;

        let mut nonce = Nonce::default();
        OsRng.fill_bytes(&mut nonce);
        self.cipher
            .encrypt_in_place(&nonce, b"", &mut blob)
            .map_err(|_| EnvelopeError::Authentication)?;
        blob.extend_from_slice(&nonce);

        Ok(blob)
    }

    /// Decrypts and decompresses a sealed blob.
    pub fn open(&self, blob: &[u8]) -> Result<Vec<u8>, EnvelopeError> {
        if blob.len() < NONCE_LENGTH + TAG_LENGTH {
            return Err(EnvelopeError::TruncatedBlob);
        }
        let (ciphertext, nonce) = blob.split_at(blob.len() - NONCE_LENGTH);

        let mut compressed = ciphertext.to_vec();
        self.cipher
            .decrypt_in_place(Nonce::from_slice(nonce), b"", &mut compressed)
            .map_err(|_| EnvelopeError::Authentication)?;

        zstd::stream::decode_all(compressed.as_slice())
            .map_err(|err| EnvelopeError::Decompression(err.to_string()))
    }
}
