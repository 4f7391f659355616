//! Portable vault access tokens.
//!
//! A token is the URL-safe unpadded base64 of a small JSON document
//! carrying the storage connection descriptor and the master key. It is a
//! bearer credential: anyone holding it can open the vault.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use strongroom_store::ConnectionInfo;

use crate::error::{VaultError, VaultResult};

#[derive(Serialize, Deserialize)]
struct TokenPayload {
    connection: ConnectionInfo,
    #[serde(with = "crate::format::base64_bytes", default)]
    key: Vec<u8>,
}

pub(crate) fn encode(connection: &ConnectionInfo, key: &[u8]) -> VaultResult<String> {
    let payload = TokenPayload {
        connection: connection.clone(),
        key: key.to_vec(),
    };
    let json = serde_json::to_vec(&payload)?;
    Ok(URL_SAFE_NO_PAD.encode(json))
}

/// Decodes a token into its connection descriptor and master key.
///
/// Every malformation collapses into [`VaultError::InvalidToken`]; the
/// caller learns nothing about which layer rejected it.
pub(crate) fn decode(token_text: &str) -> VaultResult<(ConnectionInfo, Zeroizing<Vec<u8>>)> {
    let json = URL_SAFE_NO_PAD
        .decode(token_text)
        .map_err(|_| VaultError::InvalidToken)?;
    let payload: TokenPayload =
        serde_json::from_slice(&json).map_err(|_| VaultError::InvalidToken)?;
    Ok((payload.connection, Zeroizing::new(payload.key)))
}
