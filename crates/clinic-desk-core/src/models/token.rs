//! Queue token models.

use serde::{Deserialize, Serialize};

/// Token lifecycle status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenStatus {
    /// Issued, patient waiting to be called
    Waiting,
    /// Patient with the doctor
    Consulting,
    /// Visit finished
    Completed,
}

impl TokenStatus {
    /// Canonical lowercase name, as stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenStatus::Waiting => "waiting",
            TokenStatus::Consulting => "consulting",
            TokenStatus::Completed => "completed",
        }
    }

    /// Parse the canonical lowercase name.
    pub fn parse(s: &str) -> Option<TokenStatus> {
        match s {
            "waiting" => Some(TokenStatus::Waiting),
            "consulting" => Some(TokenStatus::Consulting),
            "completed" => Some(TokenStatus::Completed),
            _ => None,
        }
    }

    /// Whether a token may move from `self` to `next`.
    ///
    /// The lifecycle only runs forward: waiting -> consulting -> completed.
    /// Skipping straight from waiting to completed is allowed (walk-outs);
    /// staying put or moving backward is not.
    pub fn can_advance_to(&self, next: TokenStatus) -> bool {
        use TokenStatus::*;
        matches!(
            (self, next),
            (Waiting, Consulting) | (Waiting, Completed) | (Consulting, Completed)
        )
    }
}

impl std::fmt::Display for TokenStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A queue token: one numbered place in a single day's walk-in queue.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Token {
    /// Token id (UUID)
    pub id: String,
    /// Queue day, `YYYY-MM-DD` local time
    pub day: String,
    /// Position in the day's queue, starting at 1
    pub number: u32,
    /// Patient this token was issued to
    pub patient_id: String,
    /// Patient name at issue time (denormalized for display)
    pub patient_name: String,
    /// Lifecycle status
    pub status: TokenStatus,
    /// Issue timestamp
    pub created_at: String,
    /// Set when the token reaches completed
    pub completed_at: Option<String>,
}

impl Token {
    /// Create a freshly issued token. The day/number pair comes from the
    /// queue counter, not from the caller's imagination.
    pub fn new(day: String, number: u32, patient_id: String, patient_name: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            day,
            number,
            patient_id,
            patient_name,
            status: TokenStatus::Waiting,
            created_at: super::now_ts(),
            completed_at: None,
        }
    }

    /// Whether the visit is still in progress.
    pub fn is_open(&self) -> bool {
        self.status != TokenStatus::Completed
    }
}
