//! Answer resources returned by the API, and the schemas that validate them.
//!
//! Unknown fields in responses are ignored.

use pipeline::Shape;
use serde::{Deserialize, Serialize};
use serde_json::Number;

/// Identifies an answer. Assigned by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerId(u64);

impl AnswerId {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl From<u64> for AnswerId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for AnswerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Resources
// ---------------------------------------------------------------------------

/// A single answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub id: AnswerId,
    /// The answer body, usually a code snippet.
    pub content: String,
    pub author_name: String,
    pub title: String,
    /// Any JSON number; kept exactly as sent.
    pub upvotes: Number,
    pub downvotes: Number,
    /// Resource type tag, `"answer"`.
    pub object: String,
}

/// A page of answers as returned by search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerList {
    /// Resource type tag, `"list"`.
    pub object: String,
    pub data: Vec<Answer>,
}

/// The service's stringified boolean. Any other string is a schema mismatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SuccessFlag {
    #[serde(rename = "true")]
    True,
    #[serde(rename = "false")]
    False,
}

impl From<SuccessFlag> for bool {
    fn from(flag: SuccessFlag) -> Self {
        matches!(flag, SuccessFlag::True)
    }
}

/// Raw response to an update, as sent on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateReceipt {
    pub id: AnswerId,
    pub success: SuccessFlag,
}

/// Result of an update, with the success flag as a native boolean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateOutcome {
    pub id: AnswerId,
    pub success: bool,
}

impl From<UpdateReceipt> for UpdateOutcome {
    fn from(receipt: UpdateReceipt) -> Self {
        Self {
            id: receipt.id,
            success: receipt.success.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Schemas
// ---------------------------------------------------------------------------

pub const ANSWER: Shape<Answer> = Shape::new("answer");
pub const ANSWER_LIST: Shape<AnswerList> = Shape::new("list");
pub const UPDATE_RECEIPT: Shape<UpdateReceipt> = Shape::new("update");
