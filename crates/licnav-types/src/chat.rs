//! Conversation turn and answer types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::business::BusinessType;
use crate::license::{SearchHit, SearchMethod};
use crate::llm::ProviderType;

/// One exchange between the user and the navigator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub timestamp: DateTime<Utc>,
    pub user_input: String,
    pub response: String,
}

impl ConversationTurn {
    pub fn new(user_input: impl Into<String>, response: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            user_input: user_input.into(),
            response: response.into(),
        }
    }
}

/// Everything produced for a single user question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuidanceAnswer {
    /// Sanitized query text.
    pub query: String,
    pub jurisdiction_code: String,
    pub jurisdiction_name: String,
    pub business_type: BusinessType,
    pub detected_licenses: Vec<String>,
    pub hits: Vec<SearchHit>,
    pub method: SearchMethod,
    /// Provider that produced the guidance text. `None` means built-in fallback text.
    pub provider: Option<ProviderType>,
    /// Why the fallback text was used, when it was.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_reason: Option<String>,
    /// Whether vector retrieval contributed hits to the prompt.
    pub rag_used: bool,
    /// The rendered markdown answer.
    pub markdown: String,
}
