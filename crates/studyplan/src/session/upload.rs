use crate::config::UploadConfig;
use crate::error::SessionError;
use crate::model::RawFile;

/// Splits payloads into accepted ones and rejections, keeping input order.
pub fn screen_uploads(
    upload: &UploadConfig,
    payloads: Vec<RawFile>,
) -> (Vec<RawFile>, Vec<SessionError>) {
    let mut accepted = Vec::with_capacity(payloads.len());
    let mut rejected = Vec::new();

    for payload in payloads {
        match upload.rejection_reason(&payload.mime_type, payload.size()) {
            None => accepted.push(payload),
            Some(reason) => {
                log::warn!("Rejected upload '{}': {}", payload.name, reason);
                rejected.push(SessionError::Rejected {
                    name: payload.name,
                    reason,
                });
            }
        }
    }

    (accepted, rejected)
}
