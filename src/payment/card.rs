//! Client-side encryption of card metadata before transmission. The holder
//! name must never travel or be logged in plaintext.

use aes_gcm::aead::{Aead, AeadCore, KeyInit, OsRng};
use aes_gcm::{Aes256Gcm, Nonce};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;

use crate::error::WalletError;

const NONCE_LEN: usize = 12;

fn cipher_from_hex(key_hex: &str) -> Result<Aes256Gcm, WalletError> {
    let key_bytes = hex::decode(key_hex)
        .map_err(|e| WalletError::Config(format!("card encryption key is not valid hex: {e}")))?;
    Aes256Gcm::new_from_slice(&key_bytes)
        .map_err(|_| WalletError::Config("card encryption key must be 32 bytes".to_string()))
}

/// AES-256-GCM encryption of the cardholder name. Output is
/// base64(nonce || ciphertext) with a random nonce per call.
pub fn encrypt_card_holder(name: &str, key_hex: &str) -> Result<String, WalletError> {
    let cipher = cipher_from_hex(key_hex)?;
    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
    let ciphertext = cipher
        .encrypt(&nonce, name.as_bytes())
        .map_err(|_| WalletError::Encryption("cardholder encryption failed".to_string()))?;

    let mut payload = nonce.to_vec();
    payload.extend_from_slice(&ciphertext);
    Ok(BASE64.encode(payload))
}

/// Inverse of [`encrypt_card_holder`].
pub fn decrypt_card_holder(payload_b64: &str, key_hex: &str) -> Result<String, WalletError> {
    let cipher = cipher_from_hex(key_hex)?;
    let payload = BASE64
        .decode(payload_b64)
        .map_err(|e| WalletError::Encryption(format!("invalid card payload: {e}")))?;
    if payload.len() <= NONCE_LEN {
        return Err(WalletError::Encryption("card payload too short".to_string()));
    }
    let (nonce, ciphertext) = payload.split_at(NONCE_LEN);
    let plaintext = cipher
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| WalletError::Encryption("cardholder decryption failed".to_string()))?;
    String::from_utf8(plaintext)
        .map_err(|_| WalletError::Encryption("decrypted name is not UTF-8".to_string()))
}
