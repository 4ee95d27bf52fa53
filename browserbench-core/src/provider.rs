//! Provider dispatch over OpenAI-compatible chat-completion backends.
//!
//! All supported providers speak the OpenAI chat-completions dialect, so
//! dispatch reduces to a closed set of (endpoint, credential) pairs behind
//! one [`ChatClient`]. The [`ChatBackend`] trait is the seam where tests
//! substitute a scripted fake (see [`crate::mock`]).

use crate::catalog::ToolDefinition;
use crate::config::ChatConfig;
use crate::error::{ConfigError, ProviderError};
use crate::message::Message;
use crate::truncate::clip;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::fmt;
use std::str::FromStr;

/// Region used for Vertex-hosted models.
pub const VERTEX_REGION: &str = "us-central1";

/// The closed set of supported providers.
///
/// Unknown identifiers fail at parse time; provider selection is a startup
/// configuration decision, never a per-request branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    /// OpenAI API
    OpenAi,
    /// Together AI
    TogetherAi,
    /// Groq (OpenAI-compatible endpoint)
    Groq,
    /// Vertex AI OpenAPI endpoint (Gemini-hosted models only)
    Vertex,
}

impl Provider {
    /// All supported providers.
    pub const ALL: [Provider; 4] = [
        Provider::OpenAi,
        Provider::TogetherAi,
        Provider::Groq,
        Provider::Vertex,
    ];

    /// The identifier accepted on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::OpenAi => "openai",
            Provider::TogetherAi => "together.ai",
            Provider::Groq => "groq",
            Provider::Vertex => "vertex",
        }
    }

    /// Environment variable holding this provider's API key.
    ///
    /// `None` for Vertex, which authenticates with a gcloud access token
    /// rather than a static key.
    pub fn api_key_env(&self) -> Option<&'static str> {
        match self {
            Provider::OpenAi => Some("OPENAI_API_KEY"),
            Provider::TogetherAi => Some("TOGETHER_API_KEY"),
            Provider::Groq => Some("GROQ_API_KEY"),
            Provider::Vertex => None,
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "openai" => Ok(Provider::OpenAi),
            "together.ai" => Ok(Provider::TogetherAi),
            "groq" => Ok(Provider::Groq),
            "vertex" => Ok(Provider::Vertex),
            other => Err(ConfigError::UnknownProvider(other.to_string())),
        }
    }
}

/// A `<provider>:<model_id>` pair as given on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSpec {
    /// Backend serving the model
    pub provider: Provider,
    /// Provider-side model identifier (may contain `/`)
    pub model_id: String,
}

impl ModelSpec {
    /// Parse a `<provider>:<model_id>` spec.
    pub fn parse(spec: &str) -> Result<Self, ConfigError> {
        let (provider, model_id) = spec
            .split_once(':')
            .ok_or_else(|| ConfigError::InvalidModelSpec(spec.to_string()))?;
        if model_id.is_empty() {
            return Err(ConfigError::InvalidModelSpec(spec.to_string()));
        }
        Ok(Self {
            provider: provider.parse()?,
            model_id: model_id.to_string(),
        })
    }

    /// The final path segment of the model id, used to name artifacts.
    pub fn short_name(&self) -> &str {
        self.model_id
            .rsplit('/')
            .next()
            .unwrap_or(&self.model_id)
    }
}

/// One chat-completion request.
///
/// Messages stay soft-typed JSON so stored conversation turns travel to the
/// provider exactly as normalized, extra keys included.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    /// Model identifier
    pub model: String,
    /// Conversation turns in provider wire shape
    pub messages: Vec<Value>,
    /// Tool catalog; when present, tool choice is "auto"
    pub tools: Option<Vec<ToolDefinition>>,
    /// Structured-output schema for the response
    pub response_format: Option<Value>,
}

impl ChatRequest {
    /// Create a request with just a model and messages.
    pub fn new(model: impl Into<String>, messages: Vec<Value>) -> Self {
        Self {
            model: model.into(),
            messages,
            tools: None,
            response_format: None,
        }
    }

    /// Attach tool definitions (tool choice becomes "auto").
    #[must_use]
    pub fn with_tools(mut self, tools: Vec<ToolDefinition>) -> Self {
        self.tools = Some(tools);
        self
    }

    /// Demand a structured response conforming to the given schema.
    #[must_use]
    pub fn with_response_format(mut self, schema: Value) -> Self {
        self.response_format = Some(schema);
        self
    }
}

/// Uniform "send one chat request, receive one assistant message" boundary.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Issue one chat-completion request and return the top choice's message.
    async fn chat(&self, request: ChatRequest) -> Result<Message, ProviderError>;
}

/// Chat-completion client for one configured OpenAI-compatible endpoint.
///
/// One long-lived client per backend; construction resolves the credential
/// and builds the HTTP client, so every possible configuration failure
/// surfaces before the first conversation is processed.
pub struct ChatClient {
    api_base: String,
    api_key: String,
    config: ChatConfig,
    http: reqwest::Client,
}

impl fmt::Debug for ChatClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatClient")
            .field("api_base", &self.api_base)
            .field("api_key", &"[REDACTED]")
            .field("config", &self.config)
            .finish()
    }
}

impl ChatClient {
    /// Create a client for an explicit endpoint and credential.
    pub fn new(
        api_base: impl Into<String>,
        api_key: impl Into<String>,
        config: ChatConfig,
    ) -> Result<Self, ConfigError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;
        Ok(Self {
            api_base: api_base.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            config,
            http,
        })
    }

    /// Create a client for a supported provider, resolving its endpoint and
    /// credential from the environment.
    ///
    /// Missing credentials are a fatal [`ConfigError`], not a per-item
    /// condition.
    pub fn for_provider(provider: Provider, config: ChatConfig) -> Result<Self, ConfigError> {
        let (api_base, api_key) = match provider {
            Provider::OpenAi => (
                "https://api.openai.com/v1".to_string(),
                require_env(provider, "OPENAI_API_KEY")?,
            ),
            Provider::TogetherAi => (
                "https://api.together.xyz/v1".to_string(),
                require_env(provider, "TOGETHER_API_KEY")?,
            ),
            Provider::Groq => (
                "https://api.groq.com/openai/v1".to_string(),
                require_env(provider, "GROQ_API_KEY")?,
            ),
            Provider::Vertex => {
                let project = require_env(provider, "VERTEX_PROJECT_ID")?;
                let token = vertex_access_token()?;
                (
                    format!(
                        "https://{VERTEX_REGION}-aiplatform.googleapis.com/v1/projects/{project}/locations/{VERTEX_REGION}/endpoints/openapi"
                    ),
                    token,
                )
            }
        };
        Self::new(api_base, api_key, config)
    }

    /// The endpoint this client talks to.
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Build the request body in OpenAI chat-completions shape.
    fn request_body(&self, request: &ChatRequest) -> Result<Value, ProviderError> {
        let mut body = json!({
            "model": request.model,
            "messages": request.messages,
        });
        if let Some(tools) = &request.tools {
            if !tools.is_empty() {
                body["tools"] =
                    serde_json::to_value(tools).map_err(|e| ProviderError::Decode(e.to_string()))?;
                body["tool_choice"] = json!("auto");
            }
        }
        if let Some(format) = &request.response_format {
            body["response_format"] = format.clone();
        }
        if let Some(max_tokens) = self.config.max_tokens {
            body["max_tokens"] = json!(max_tokens);
        }
        if let Some(temperature) = self.config.temperature {
            body["temperature"] = json!(temperature);
        }
        Ok(body)
    }
}

#[async_trait]
impl ChatBackend for ChatClient {
    async fn chat(&self, request: ChatRequest) -> Result<Message, ProviderError> {
        let url = format!("{}/chat/completions", self.api_base);
        let body = self.request_body(&request)?;

        log::debug!(
            "chat: base={} model={} messages={}",
            self.api_base,
            request.model,
            request.messages.len()
        );

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            log::warn!(
                "chat completion failed (HTTP {}, base={}): {}",
                status,
                self.api_base,
                clip(&text, 200)
            );
            return Err(ProviderError::Api {
                status: status.as_u16(),
                body: text,
            });
        }

        parse_completion(&text)
    }
}

/// Read a required environment variable, rejecting empty values.
fn require_env(provider: Provider, env: &'static str) -> Result<String, ConfigError> {
    std::env::var(env)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .ok_or(ConfigError::MissingCredential {
            provider: provider.as_str(),
            env,
        })
}

/// Obtain a bearer token for Vertex from the gcloud CLI.
fn vertex_access_token() -> Result<String, ConfigError> {
    let output = std::process::Command::new("gcloud")
        .args(["auth", "print-access-token"])
        .output()
        .map_err(|e| ConfigError::VertexToken(e.to_string()))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ConfigError::VertexToken(stderr.trim().to_string()));
    }

    let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if token.is_empty() {
        return Err(ConfigError::VertexToken(
            "gcloud returned an empty token".to_string(),
        ));
    }
    Ok(token)
}

/// Extract the top choice's message from a chat-completion response body.
fn parse_completion(body: &str) -> Result<Message, ProviderError> {
    #[derive(Deserialize)]
    struct Completion {
        choices: Vec<Choice>,
    }

    #[derive(Deserialize)]
    struct Choice {
        message: Message,
    }

    let completion: Completion =
        serde_json::from_str(body).map_err(|e| ProviderError::Decode(e.to_string()))?;
    completion
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message)
        .ok_or(ProviderError::EmptyResponse)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ToolCatalog;
    use crate::message::Role;
    use rstest::rstest;

    #[rstest]
    #[case::openai("openai", Provider::OpenAi)]
    #[case::together("together.ai", Provider::TogetherAi)]
    #[case::groq("groq", Provider::Groq)]
    #[case::vertex("vertex", Provider::Vertex)]
    fn test_provider_from_str(#[case] input: &str, #[case] expected: Provider) {
        assert_eq!(input.parse::<Provider>().unwrap(), expected);
    }

    #[test]
    fn test_provider_from_str_unknown() {
        let error = "bedrock".parse::<Provider>().unwrap_err();
        assert!(matches!(error, ConfigError::UnknownProvider(p) if p == "bedrock"));
    }

    #[test]
    fn test_provider_round_trip() {
        for provider in Provider::ALL {
            assert_eq!(provider.as_str().parse::<Provider>().unwrap(), provider);
        }
    }

    #[test]
    fn test_model_spec_parse() {
        let spec = ModelSpec::parse("together.ai:Qwen/Qwen3-Next-80B-A3B-Thinking").unwrap();
        assert_eq!(spec.provider, Provider::TogetherAi);
        assert_eq!(spec.model_id, "Qwen/Qwen3-Next-80B-A3B-Thinking");
        assert_eq!(spec.short_name(), "Qwen3-Next-80B-A3B-Thinking");
    }

    #[test]
    fn test_model_spec_short_name_without_slash() {
        let spec = ModelSpec::parse("openai:gpt-4o-mini").unwrap();
        assert_eq!(spec.short_name(), "gpt-4o-mini");
    }

    #[rstest]
    #[case::no_colon("gpt-4o")]
    #[case::empty_model("openai:")]
    fn test_model_spec_parse_invalid(#[case] input: &str) {
        assert!(matches!(
            ModelSpec::parse(input),
            Err(ConfigError::InvalidModelSpec(_))
        ));
    }

    #[test]
    fn test_model_spec_unknown_provider() {
        assert!(matches!(
            ModelSpec::parse("bedrock:claude"),
            Err(ConfigError::UnknownProvider(_))
        ));
    }

    #[test]
    fn test_parse_completion_text() {
        let body = r#"{
            "id": "cmpl-1",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": "Paris is the capital of France."},
                "finish_reason": "stop"
            }]
        }"#;
        let message = parse_completion(body).unwrap();
        assert_eq!(message.role, Role::Assistant);
        assert_eq!(
            message.content.as_deref(),
            Some("Paris is the capital of France.")
        );
        assert!(!message.has_tool_calls());
    }

    #[test]
    fn test_parse_completion_tool_calls() {
        let body = r#"{
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [{
                        "id": "call_abc",
                        "type": "function",
                        "function": {"name": "get_page_contents", "arguments": "{\"url\": \"https://example.com\"}"}
                    }]
                }
            }]
        }"#;
        let message = parse_completion(body).unwrap();
        assert!(message.content.is_none());
        assert!(message.has_tool_calls());
        let calls = message.tool_calls.unwrap();
        assert_eq!(calls[0].function.name, "get_page_contents");
    }

    #[test]
    fn test_parse_completion_empty_choices() {
        let error = parse_completion(r#"{"choices": []}"#).unwrap_err();
        assert!(matches!(error, ProviderError::EmptyResponse));
    }

    #[test]
    fn test_parse_completion_garbage() {
        let error = parse_completion("not json").unwrap_err();
        assert!(matches!(error, ProviderError::Decode(_)));
    }

    #[test]
    fn test_request_body_includes_tools_and_auto_choice() {
        let client =
            ChatClient::new("https://api.example.com/v1", "key", ChatConfig::default()).unwrap();
        let request = ChatRequest::new(
            "test-model",
            vec![json!({"role": "user", "content": "hi"})],
        )
        .with_tools(ToolCatalog::builtin().definitions().to_vec());

        let body = client.request_body(&request).unwrap();
        assert_eq!(body["model"], "test-model");
        assert_eq!(body["tool_choice"], "auto");
        assert_eq!(body["tools"].as_array().unwrap().len(), 5);
        assert!(body.get("response_format").is_none());
        assert!(body.get("max_tokens").is_none());
    }

    #[test]
    fn test_request_body_without_tools_has_no_tool_choice() {
        let client =
            ChatClient::new("https://api.example.com/v1", "key", ChatConfig::default()).unwrap();
        let request = ChatRequest::new(
            "judge-model",
            vec![json!({"role": "system", "content": "judge"})],
        )
        .with_response_format(json!({"type": "json_schema"}));

        let body = client.request_body(&request).unwrap();
        assert!(body.get("tools").is_none());
        assert!(body.get("tool_choice").is_none());
        assert_eq!(body["response_format"]["type"], "json_schema");
    }

    #[test]
    fn test_request_body_applies_sampling_config() {
        let config = ChatConfig::new().with_max_tokens(1024).with_temperature(0.0);
        let client = ChatClient::new("https://api.example.com/v1", "key", config).unwrap();
        let request = ChatRequest::new("m", vec![]);

        let body = client.request_body(&request).unwrap();
        assert_eq!(body["max_tokens"], 1024);
        assert_eq!(body["temperature"], 0.0);
    }

    #[test]
    fn test_client_debug_redacts_api_key() {
        let client = ChatClient::new(
            "https://api.example.com/v1",
            "secret-api-key-12345",
            ChatConfig::default(),
        )
        .unwrap();
        let debug_output = format!("{:?}", client);
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("secret-api-key"));
    }

    #[test]
    fn test_client_trims_trailing_slash() {
        let client =
            ChatClient::new("https://api.example.com/v1/", "key", ChatConfig::default()).unwrap();
        assert_eq!(client.api_base(), "https://api.example.com/v1");
    }
}
