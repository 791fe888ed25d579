use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;

pub const DEFAULT_CONTENT_TYPE: &str = "text/plain";

/// A knowledge-base document. `content` is plain text here; it is base64
/// only on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DocumentRecord {
    pub id: String,
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DocumentDraft {
    pub title: String,
    pub content: String,
    #[serde(default = "default_content_type")]
    pub content_type: String,
}

impl DocumentDraft {
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.title.trim().is_empty() {
            return Err(CoreError::MissingField("title".to_string()));
        }
        Ok(())
    }
}

fn default_content_type() -> String {
    DEFAULT_CONTENT_TYPE.to_string()
}
