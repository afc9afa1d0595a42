// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Wallet key loading for the local provider.
//!
//! Keys are accepted either as a hex string or as a PEM file (SEC1 or
//! PKCS#8), and converted into an alloy signer.

use std::path::Path;

use alloy::signers::local::PrivateKeySigner;
use k256::SecretKey;

use crate::provider::WalletError;

/// Parse a private key from PEM format to hex string.
///
/// # Returns
/// * `Ok(String)` - Hex-encoded private key (64 characters, no 0x prefix)
/// * `Err(WalletError)` - If PEM parsing fails
pub fn pem_to_hex(pem_bytes: &[u8]) -> Result<String, WalletError> {
    let pem_str = std::str::from_utf8(pem_bytes)
        .map_err(|e| WalletError::Key(format!("Invalid UTF-8: {}", e)))?;

    let pem = pem::parse(pem_str).map_err(|e| WalletError::Key(format!("Invalid PEM: {}", e)))?;

    let secret_key = SecretKey::from_sec1_der(pem.contents())
        .or_else(|_| parse_pkcs8_to_secret_key(pem.contents()))
        .map_err(|e| WalletError::Key(format!("Invalid key format: {}", e)))?;

    Ok(alloy::hex::encode(secret_key.to_bytes()))
}

fn parse_pkcs8_to_secret_key(der: &[u8]) -> Result<SecretKey, String> {
    use k256::pkcs8::DecodePrivateKey;
    SecretKey::from_pkcs8_der(der).map_err(|e| e.to_string())
}

/// Create a signer from a hex private key, with or without `0x` prefix.
pub fn signer_from_hex(private_key_hex: &str) -> Result<PrivateKeySigner, WalletError> {
    let trimmed = private_key_hex.trim();
    let key_hex = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    let key_bytes = alloy::hex::decode(key_hex).map_err(|e| WalletError::Key(e.to_string()))?;

    PrivateKeySigner::from_slice(&key_bytes).map_err(|e| WalletError::Key(e.to_string()))
}

/// Create a signer from PEM-encoded private key bytes.
pub fn signer_from_pem(pem_bytes: &[u8]) -> Result<PrivateKeySigner, WalletError> {
    let hex_key = pem_to_hex(pem_bytes)?;
    signer_from_hex(&hex_key)
}

/// Read a PEM key file and create a signer from it.
pub fn signer_from_pem_file(path: &Path) -> Result<PrivateKeySigner, WalletError> {
    let bytes = std::fs::read(path)
        .map_err(|e| WalletError::Key(format!("Cannot read {}: {}", path.display(), e)))?;
    signer_from_pem(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use k256::pkcs8::{EncodePrivateKey, LineEnding};

    // Well-known development key (DO NOT use in production!)
    const TEST_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const TEST_ADDRESS: &str = "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266";

    fn test_pem() -> String {
        let bytes = alloy::hex::decode(TEST_KEY).unwrap();
        let secret = SecretKey::from_slice(&bytes).unwrap();
        secret.to_pkcs8_pem(LineEnding::LF).unwrap().to_string()
    }

    #[test]
    fn test_pem_to_hex() {
        let hex = pem_to_hex(test_pem().as_bytes()).unwrap();
        assert_eq!(hex, TEST_KEY);
    }

    #[test]
    fn test_signer_from_hex_accepts_prefix() {
        let plain = signer_from_hex(TEST_KEY).unwrap();
        let prefixed = signer_from_hex(&format!("0x{TEST_KEY}")).unwrap();
        assert_eq!(plain.address(), prefixed.address());
        assert_eq!(
            alloy::hex::encode_prefixed(plain.address().as_slice()),
            TEST_ADDRESS
        );
    }

    #[test]
    fn test_signer_from_pem_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("key.pem");
        std::fs::write(&path, test_pem()).unwrap();

        let signer = signer_from_pem_file(&path).unwrap();
        assert_eq!(
            alloy::hex::encode_prefixed(signer.address().as_slice()),
            TEST_ADDRESS
        );
    }

    #[test]
    fn test_invalid_keys_are_rejected() {
        assert!(matches!(signer_from_hex("zz"), Err(WalletError::Key(_))));
        assert!(matches!(
            pem_to_hex(b"not a pem"),
            Err(WalletError::Key(_))
        ));
        assert!(matches!(
            signer_from_pem_file(Path::new("/nonexistent/key.pem")),
            Err(WalletError::Key(_))
        ));
    }
}
