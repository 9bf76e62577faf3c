//! Shared model gateway with an explicitly owned, lazily built client

use crate::error::AgentError;
use crate::llm::openai::{ChatClient, DEFAULT_BASE_URL, DEFAULT_MODEL};
use crate::llm::{LanguageModel, ModelRequest, ModelResponse};
use crate::Result;
use async_trait::async_trait;
use std::env;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewaySettings {
    pub api_key: Option<String>,
    pub model_name: String,
    pub base_url: String,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            api_key: None,
            model_name: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl GatewaySettings {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            api_key: env::var("OPENAI_API_KEY").ok().filter(|k| !k.trim().is_empty()),
            model_name: env::var("OPENAI_MODEL")
                .ok()
                .filter(|m| !m.trim().is_empty())
                .unwrap_or(defaults.model_name),
            base_url: env::var("OPENAI_BASE_URL")
                .ok()
                .filter(|u| !u.trim().is_empty())
                .unwrap_or(defaults.base_url),
        }
    }
}

/// Client handle plus the identity it was built for.
struct CachedClient {
    api_key: String,
    model: String,
    client: Arc<ChatClient>,
}

/// Gateway over the model provider.
///
/// The client is built on first use and rebuilt whenever the API key or the
/// requested model differs from the cached one. Construction happens under the
/// cache lock, so concurrent callers only ever observe a complete client.
pub struct ModelGateway {
    settings: RwLock<GatewaySettings>,
    cached: Mutex<Option<CachedClient>>,
}

impl ModelGateway {
    pub fn new(settings: GatewaySettings) -> Self {
        Self {
            settings: RwLock::new(settings),
            cached: Mutex::new(None),
        }
    }

    pub fn from_env() -> Self {
        Self::new(GatewaySettings::from_env())
    }

    /// Update credentials and/or default model. The cached client is dropped
    /// so the next call builds a fresh one.
    pub async fn configure(&self, api_key: Option<String>, model_name: Option<String>) {
        let mut settings = self.settings.write().await;
        if let Some(key) = api_key.filter(|k| !k.trim().is_empty()) {
            settings.api_key = Some(key);
        }
        if let Some(model) = model_name.filter(|m| !m.trim().is_empty()) {
            settings.model_name = model;
        }

        self.cached.lock().await.take();

        info!(model = %settings.model_name, "Model gateway reconfigured");
    }

    pub async fn active_model(&self) -> String {
        self.settings.read().await.model_name.clone()
    }

    async fn client(&self, model_override: Option<&str>) -> Result<Arc<ChatClient>> {
        let settings = self.settings.read().await.clone();

        let api_key = settings.api_key.ok_or_else(|| {
            AgentError::ConfigError(
                "OPENAI_API_KEY environment variable is not set. Please set it before using the agent."
                    .to_string(),
            )
        })?;
        let model = model_override.unwrap_or(&settings.model_name).to_string();

        let mut cached = self.cached.lock().await;
        if let Some(existing) = cached.as_ref() {
            if existing.api_key == api_key && existing.model == model {
                return Ok(existing.client.clone());
            }
        }

        info!(model = %model, "Initializing model client");
        let client = Arc::new(ChatClient::new(api_key.clone(), model.clone(), settings.base_url)?);
        *cached = Some(CachedClient {
            api_key,
            model,
            client: client.clone(),
        });

        Ok(client)
    }
}

#[async_trait]
impl LanguageModel for ModelGateway {
    async fn invoke(&self, request: ModelRequest) -> Result<ModelResponse> {
        let client = self.client(request.model_name.as_deref()).await?;
        client.complete(&request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn settings_for(server: &MockServer) -> GatewaySettings {
        GatewaySettings {
            api_key: Some("key-1".into()),
            model_name: "gpt-4o".into(),
            base_url: server.uri(),
        }
    }

    fn text_reply(text: &str) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "message": { "content": text } }]
        }))
    }

    #[tokio::test]
    async fn test_missing_api_key_is_config_error() {
        let gateway = ModelGateway::new(GatewaySettings::default());
        let result = gateway.invoke(ModelRequest::text("hi")).await;
        assert!(matches!(result, Err(AgentError::ConfigError(_))));
    }

    #[tokio::test]
    async fn test_client_is_reused_for_same_identity() {
        let server = MockServer::start().await;
        let gateway = ModelGateway::new(settings_for(&server));

        let first = gateway.client(None).await.unwrap();
        let second = gateway.client(None).await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn test_client_rebuilt_when_model_changes() {
        let server = MockServer::start().await;
        let gateway = ModelGateway::new(settings_for(&server));

        let first = gateway.client(None).await.unwrap();
        let overridden = gateway.client(Some("gpt-4o-mini")).await.unwrap();
        assert!(!Arc::ptr_eq(&first, &overridden));
        assert_eq!(overridden.model(), "gpt-4o-mini");

        gateway.configure(None, Some("o1".into())).await;
        assert_eq!(gateway.active_model().await, "o1");
        let reconfigured = gateway.client(None).await.unwrap();
        assert_eq!(reconfigured.model(), "o1");
    }

    #[tokio::test]
    async fn test_requests_use_reconfigured_model() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({"model": "gpt-4o-mini"})))
            .respond_with(text_reply("from mini"))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({"model": "gpt-4o"})))
            .respond_with(text_reply("from 4o"))
            .mount(&server)
            .await;

        let gateway = ModelGateway::new(settings_for(&server));
        let before = gateway.invoke(ModelRequest::text("hi")).await.unwrap();
        assert_eq!(before, ModelResponse::Text("from 4o".into()));

        gateway.configure(Some("key-2".into()), Some("gpt-4o-mini".into())).await;
        let after = gateway.invoke(ModelRequest::text("hi")).await.unwrap();
        assert_eq!(after, ModelResponse::Text("from mini".into()));
    }
}
