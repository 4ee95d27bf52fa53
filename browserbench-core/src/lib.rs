//! # Browserbench Core
//!
//! Data model, conversation transforms, and provider dispatch for the
//! browserbench evaluation harness.
//!
//! ## Architecture
//!
//! - **Soft-typed conversations**: stored turns are `serde_json::Value`
//!   objects, so storage-layer extras survive the trip to the provider
//!   untouched; only provider *responses* are parsed into the typed
//!   canonical [`Message`] shape.
//! - **Closed provider set**: [`Provider`] is a tagged variant over the
//!   supported backends; unknown identifiers are a startup configuration
//!   error, not a runtime branch.
//! - **Injected backends**: everything that talks to a model goes through
//!   the [`ChatBackend`] trait, so tests swap in [`mock::MockChatBackend`].
//!
//! ## Example
//!
//! ```no_run
//! use browserbench_core::{ChatBackend, ChatClient, ChatConfig, ChatRequest, Provider, ToolCatalog};
//! use serde_json::json;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ChatClient::for_provider(Provider::OpenAi, ChatConfig::default())?;
//! let catalog = ToolCatalog::builtin();
//!
//! let request = ChatRequest::new(
//!     "gpt-4o-mini",
//!     vec![json!({"role": "user", "content": "What tabs do I have open?"})],
//! )
//! .with_tools(catalog.definitions().to_vec());
//!
//! let message = client.chat(request).await?;
//! println!("tool calls: {}", message.has_tool_calls());
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod message;
pub mod mock;
pub mod normalize;
pub mod provider;
pub mod truncate;

// Re-export public API
pub use catalog::{
    ToolCatalog, ToolDefinition, ToolSpec, ENGINE_SEARCH, GET_PAGE_CONTENTS, GET_PREFERENCES,
    GET_TABS, SEARCH_HISTORY,
};
pub use config::ChatConfig;
pub use error::{ConfigError, ProviderError};
pub use message::{FunctionCall, Message, Role, ToolCall};
pub use mock::{MockChatBackend, MockReply};
pub use normalize::{normalize_conversation, normalize_turn};
pub use provider::{ChatBackend, ChatClient, ChatRequest, ModelSpec, Provider, VERTEX_REGION};
pub use truncate::{clip, truncate_page_contents, TruncateConfig, OMISSION_MARKER};
