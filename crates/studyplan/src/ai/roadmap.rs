//! Cross-document curriculum generation.

use std::fmt::Write;
use std::sync::Arc;

use log::{debug, info};
use serde_json::{json, Value};
use tracing::Instrument;

use super::backend::{GenerateRequest, GenerativeBackend};
use super::error::AiError;
use super::validation::{parse_and_validate, ResponseKind};
use crate::model::{AnalysisResult, RoadmapStep};

const ROADMAP_PROMPT: &str = "Aşağıda bir öğrencinin yüklediği belgelerin analizleri var.

Bu analizleri birleştirerek tek bir çalışma yol haritası oluştur:
1. Adımları temel konulardan ileri konulara doğru sırala.
2. Her adıma açık bir aşama adı ver (örneğin \"1. Hafta\" veya \"Aşama 1\").
3. Farklı belgelerde tekrar eden konuları birleştir, aynı konuyu iki kez yazma.
4. Her adım için kısa bir başlık, ne yapılacağını anlatan bir açıklama ve kapsanan konuları yaz.

Tüm metinler Türkçe olsun. Yanıtı sadece geçerli JSON formatında ver.";

fn roadmap_response_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "stepName": {
                    "type": "STRING",
                    "description": "Aşama adı, örneğin \"1. Hafta\"."
                },
                "title": {
                    "type": "STRING",
                    "description": "Adımın kısa başlığı."
                },
                "description": {
                    "type": "STRING",
                    "description": "Bu adımda ne çalışılacağı."
                },
                "topics": {
                    "type": "ARRAY",
                    "items": { "type": "STRING" },
                    "description": "Adımın kapsadığı konular."
                }
            },
            "required": ["stepName", "title", "description", "topics"]
        }
    })
}

/// Renders all results into the compact text the roadmap prompt works on.
pub fn condense_results(results: &[AnalysisResult]) -> String {
    let mut output = String::new();
    for (index, result) in results.iter().enumerate() {
        if index > 0 {
            output.push('\n');
        }
        let _ = writeln!(output, "Döküman {}", index + 1);
        let _ = writeln!(output, "Özet: {}", result.summary);
        let _ = writeln!(output, "Çalışma planı:");
        for item in &result.study_plan {
            let _ = writeln!(output, "- {} ({}): {}", item.topic, item.priority, item.action);
        }
    }
    output
}

/// Builds an ordered curriculum from completed analyses.
#[derive(Clone)]
pub struct RoadmapClient {
    backend: Arc<dyn GenerativeBackend>,
}

impl RoadmapClient {
    pub fn new(backend: Arc<dyn GenerativeBackend>) -> Self {
        Self { backend }
    }

    /// One remote call over all `results`. No input or an empty answer
    /// yields an empty roadmap.
    pub async fn build_roadmap(
        &self,
        results: &[AnalysisResult],
    ) -> Result<Vec<RoadmapStep>, AiError> {
        if results.is_empty() {
            debug!("No analyses to build a roadmap from");
            return Ok(Vec::new());
        }

        let span = tracing::info_span!("ai.roadmap", documents = results.len());
        async {
            let request = GenerateRequest::new(roadmap_response_schema())
                .text(condense_results(results))
                .text(ROADMAP_PROMPT);

            let Some(text) = self.backend.generate(request).await? else {
                info!("Roadmap request returned no text, using an empty roadmap");
                return Ok(Vec::new());
            };

            let value = parse_and_validate(ResponseKind::Roadmap, &text)?;
            let steps: Vec<RoadmapStep> = serde_json::from_value(value)?;
            info!("Roadmap generated with {} steps", steps.len());
            Ok(steps)
        }
        .instrument(span)
        .await
    }
}
