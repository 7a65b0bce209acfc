//! Per-document analysis: summary, topics and a prioritized study plan.

use std::sync::Arc;

use log::debug;
use serde_json::{json, Value};
use tracing::Instrument;

use super::backend::{GenerateRequest, GenerativeBackend};
use super::error::AiError;
use super::validation::{parse_and_validate, ResponseKind};
use crate::model::{AnalysisResult, Priority};

const ANALYSIS_PROMPT: &str = "Bu PDF belgesini detaylı bir şekilde analiz et.

Görevlerin:
1. İçeriğin kısa ve öz bir özetini çıkar (Türkçe).
2. Belgede geçen ana konu başlıklarını listele.
3. Bir öğrenci için \"Neye Çalışmalıyım?\" sorusunu cevaplayan detaylı bir çalışma planı oluştur. Her madde için öncelik seviyesi belirle (Yüksek, Orta, Düşük).

Yanıtı sadece geçerli JSON formatında ver.";

/// Response schema in the service's OpenAPI subset.
fn analysis_response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "summary": {
                "type": "STRING",
                "description": "Belgenin genel özeti."
            },
            "topics": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "Belgedeki ana konu başlıkları."
            },
            "studyPlan": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "topic": {
                            "type": "STRING",
                            "description": "Çalışılması gereken konu."
                        },
                        "action": {
                            "type": "STRING",
                            "description": "Bu konuya nasıl çalışılmalı, nelere dikkat edilmeli?"
                        },
                        "priority": {
                            "type": "STRING",
                            "enum": Priority::LABELS,
                            "description": "Çalışma önceliği."
                        }
                    },
                    "required": ["topic", "action", "priority"]
                },
                "description": "Öğrenci için çalışma planı."
            }
        },
        "required": ["summary", "topics", "studyPlan"]
    })
}

/// Turns one encoded document into an [`AnalysisResult`].
#[derive(Clone)]
pub struct AnalysisClient {
    backend: Arc<dyn GenerativeBackend>,
}

impl AnalysisClient {
    pub fn new(backend: Arc<dyn GenerativeBackend>) -> Self {
        Self { backend }
    }

    /// Analyzes a base64-encoded document. One remote call, no retry.
    pub async fn analyze(
        &self,
        encoded_payload: &str,
        mime_type: &str,
    ) -> Result<AnalysisResult, AiError> {
        let span = tracing::info_span!("ai.analyze", mime_type = %mime_type);
        async {
            let request = GenerateRequest::new(analysis_response_schema())
                .inline_data(mime_type, encoded_payload)
                .text(ANALYSIS_PROMPT);

            let text = self
                .backend
                .generate(request)
                .await?
                .ok_or(AiError::EmptyResponse)?;

            let value = parse_and_validate(ResponseKind::Analysis, &text)?;
            let result: AnalysisResult = serde_json::from_value(value)?;
            debug!(
                "Analysis returned {} topics and {} plan items",
                result.topics.len(),
                result.study_plan.len()
            );
            Ok(result)
        }
        .instrument(span)
        .await
    }
}
