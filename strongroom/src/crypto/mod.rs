//! Cryptographic engine: subkey derivation, cipher and checksum
//! strategies, and the block codec that combines them.

pub(crate) mod checksum;
pub(crate) mod cipher;
pub(crate) mod codec;
pub(crate) mod kdf;
