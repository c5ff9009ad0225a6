use crate::error::{Result, ServiceError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const SCORE_MIN: f64 = 0.0;
pub const SCORE_MAX: f64 = 10.0;

/// Parse the model's JSON-mode reply.
///
/// Valid JSON is the only requirement; the value is forwarded to the client
/// exactly as the model produced it.
pub fn parse_model_reply(content: &str) -> Result<Value> {
    serde_json::from_str(content).map_err(ServiceError::InvalidScore)
}

/// Typed view of the end-of-session grading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreReport {
    pub technical: f64,
    pub communication: f64,
    pub clarity: f64,
    pub feedback: String,
}

impl ScoreReport {
    /// `None` when the reply doesn't have the expected shape
    pub fn from_value(value: &Value) -> Option<Self> {
        Self::deserialize(value).ok()
    }

    /// Names of scores outside [0, 10]. Reported, never corrected.
    pub fn out_of_range(&self) -> Vec<&'static str> {
        [
            ("technical", self.technical),
            ("communication", self.communication),
            ("clarity", self.clarity),
        ]
        .into_iter()
        .filter(|(_, v)| !(SCORE_MIN..=SCORE_MAX).contains(v))
        .map(|(name, _)| name)
        .collect()
    }
}
