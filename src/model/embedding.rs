//! Embedding request plumbing.

use serde_json::json;

use super::dispatch::{DispatchOutcome, ModelClient};
use super::generate::Generator;

/// Flatten newlines and substitute a placeholder for blank input, which
/// embedding endpoints tend to reject.
fn normalize_text(text: &str) -> String {
    let text = text.replace('\n', " ");
    if text.trim().is_empty() {
        "this is blank".to_string()
    } else {
        text
    }
}

impl Generator<ModelClient> {
    /// Request an embedding for `text` from the named model. The same
    /// sentinel-on-failure policy as dispatch applies.
    pub async fn embed(&self, model_name: &str, text: &str) -> DispatchOutcome {
        let text = normalize_text(text);
        let info = self.registry().resolve(model_name, None);
        let body = json!({
            "model": info.name,
            "prompt": text,
        });
        self.dispatcher().post_json(&info.url, &body).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::registry::{ModelFamily, ModelInfo, ModelRegistry};
    use std::time::Duration;

    #[test]
    fn test_normalize_text() {
        assert_eq!(normalize_text("a\nb\nc"), "a b c");
        assert_eq!(normalize_text(""), "this is blank");
        assert_eq!(normalize_text("\n\n"), "this is blank");
        assert_eq!(normalize_text("fine"), "fine");
    }

    #[tokio::test]
    async fn test_embed_transport_failure_returns_sentinel() {
        let default = ModelInfo::new(
            "nomic-embed-text",
            "http://127.0.0.1:9/api/embeddings",
            ModelFamily::Llama,
        );
        let registry = ModelRegistry::new(Default::default(), default);
        let generator = Generator::with_dispatcher(
            registry,
            ModelClient::with_timeout(Duration::from_secs(2)),
        );

        let outcome = generator.embed("nomic-embed-text", "some text").await;
        assert_eq!(outcome, DispatchOutcome::RequestFailed);
    }
}
