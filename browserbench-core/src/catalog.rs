//! The browser tool catalog.
//!
//! The assistant under evaluation has exactly five browser-oriented tools.
//! The catalog is built once and passed unchanged to every prediction
//! request; the judge prompt describes the same five tools, so the two must
//! stay in sync.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Tool that fetches the text content of a web page.
pub const GET_PAGE_CONTENTS: &str = "get_page_contents";
/// Tool that searches the user's browsing history.
pub const SEARCH_HISTORY: &str = "search_history";
/// Tool that retrieves saved user preferences.
pub const GET_PREFERENCES: &str = "get_preferences";
/// Tool that lists the currently open tabs.
pub const GET_TABS: &str = "get_tabs";
/// Tool that hands the user off to a search-engine results page.
pub const ENGINE_SEARCH: &str = "engine_search";

/// The function half of a tool definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSpec {
    /// Tool name the model invokes
    pub name: String,
    /// Natural-language description shown to the model
    pub description: String,
    /// JSON-schema parameter object
    pub parameters: Value,
}

/// One entry of the catalog in OpenAI tool shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Definition kind; always `"function"`
    #[serde(rename = "type")]
    pub kind: String,
    /// The function being defined
    pub function: ToolSpec,
}

impl ToolDefinition {
    fn function(name: &str, description: &str, parameters: Value) -> Self {
        Self {
            kind: "function".to_string(),
            function: ToolSpec {
                name: name.to_string(),
                description: description.to_string(),
                parameters,
            },
        }
    }
}

/// The fixed five-tool catalog.
#[derive(Debug, Clone)]
pub struct ToolCatalog {
    tools: Vec<ToolDefinition>,
}

impl ToolCatalog {
    /// Build the built-in catalog.
    pub fn builtin() -> Self {
        let tools = vec![
            ToolDefinition::function(
                GET_PAGE_CONTENTS,
                "Returns the text content of a web page given the url.",
                json!({
                    "type": "object",
                    "properties": {
                        "url": {"type": "string", "description": "URL of the page to read."}
                    },
                    "required": ["url"]
                }),
            ),
            ToolDefinition::function(
                SEARCH_HISTORY,
                "Returns the most relevant history items related to search term with each containing url, title, visited time and a description of the page if available.",
                json!({
                    "type": "object",
                    "properties": {
                        "search_term": {"type": "string", "description": "Term to search the browsing history for."}
                    },
                    "required": ["search_term"]
                }),
            ),
            ToolDefinition::function(
                GET_PREFERENCES,
                "Retrieve the user's saved preferences (location, dietary, hobbies, interests, etc.) which could help in personalizing the response. If a query is provided, it will be used to filter for relevant preferences.",
                json!({
                    "type": "object",
                    "properties": {
                        "query": {"type": "string", "description": "Optional filter for relevant preferences.", "default": ""}
                    },
                    "required": []
                }),
            ),
            ToolDefinition::function(
                GET_TABS,
                "Returns a list of opened tabs with each including url, title and a flag indicating if the tab is currently active to the user.",
                json!({
                    "type": "object",
                    "properties": {}
                }),
            ),
            ToolDefinition::function(
                ENGINE_SEARCH,
                "Searches the web using a search engine with the provided query if that makes the most sense. It will direct the user to browser's search result page and end the conversation.",
                json!({
                    "type": "object",
                    "properties": {
                        "query": {"type": "string", "description": "Search engine query."}
                    },
                    "required": ["query"]
                }),
            ),
        ];
        Self { tools }
    }

    /// The tool definitions, in catalog order.
    pub fn definitions(&self) -> &[ToolDefinition] {
        &self.tools
    }

    /// Names of all tools, in catalog order.
    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.function.name.as_str()).collect()
    }

    /// Number of tools in the catalog.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Whether the catalog is empty (never true for the built-in catalog).
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
