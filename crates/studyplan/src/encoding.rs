//! Payload encoding for inline document uploads.

use base64::Engine;

/// Encodes a raw payload as standard base64 without a data-URL prefix.
pub fn encode_payload(bytes: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(bytes)
}
