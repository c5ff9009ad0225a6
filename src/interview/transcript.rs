use crate::error::{Result, ServiceError};
use serde::{Deserialize, Serialize};

/// Speaker of a turn, lower-case on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

/// One utterance in the interview dialogue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }
}

/// Ordered, append-only sequence of turns for one session.
///
/// Owned by the client; the server only ever sees it as the stringified
/// `history` field and never keeps it between requests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// A fresh session: the assistant's opening prompt and nothing else
    pub fn opening() -> Self {
        Self {
            turns: vec![Turn::assistant(super::prompts::OPENING_PROMPT)],
        }
    }

    /// Parse the stringified `history` field. Absent or empty means empty;
    /// anything else must be a JSON array of turns.
    pub fn from_history(history: Option<&str>) -> Result<Self> {
        match history {
            None | Some("") => Ok(Self::new()),
            Some(raw) => serde_json::from_str(raw).map_err(ServiceError::InvalidHistory),
        }
    }

    /// Serialize to the stringified form sent as `history`
    pub fn to_history(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    /// Append one user turn followed by one assistant turn
    pub fn record_exchange(&mut self, user: impl Into<String>, assistant: impl Into<String>) {
        self.turns.push(Turn::user(user));
        self.turns.push(Turn::assistant(assistant));
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn answered_questions(&self) -> usize {
        self.turns.iter().filter(|t| t.role == Role::User).count()
    }
}
