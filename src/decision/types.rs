use serde::{Deserialize, Serialize};

/// One action as returned by the decision service: the raw kind string plus
/// the untyped parameter object. Typing and defaulting happen later in the
/// agent layer so an unknown kind survives to the translator, which logs
/// and ignores it instead of failing the deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionDescriptor {
    pub kind: String,
    pub call_id: String,
    pub params: serde_json::Value,
}

impl ActionDescriptor {
    pub fn new(kind: &str, params: serde_json::Value) -> Self {
        Self {
            kind: kind.to_string(),
            call_id: String::new(),
            params,
        }
    }
}

/// Chain of opaque response identifiers linking successive decision calls
/// within one task attempt. The latest id is echoed back as
/// `previous_response_id` so the service can reason over its own prior
/// output. Cleared between independent runs.
#[derive(Debug, Clone, Default)]
pub struct ConversationContext {
    response_ids: Vec<String>,
}

impl ConversationContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_response_id(&self) -> Option<&str> {
        self.response_ids.last().map(String::as_str)
    }

    pub fn push(&mut self, response_id: String) {
        self.response_ids.push(response_id);
    }

    pub fn exchanges(&self) -> usize {
        self.response_ids.len()
    }

    pub fn clear(&mut self) {
        self.response_ids.clear();
    }
}
