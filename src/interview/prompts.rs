//! Fixed prompt and fallback texts

/// System instruction prepended to every interviewer completion
pub const INTERVIEWER_PERSONA: &str =
    "You are a strict interviewer. Keep answers concise (max 2 sentences).";

/// System instruction for grading a finished session
pub const SCORING_INSTRUCTIONS: &str = r#"You are an expert interviewer. Analyze the conversation. Return JSON: { "technical": (0-10), "communication": (0-10), "clarity": (0-10), "feedback": "Short summary." }"#;

/// First assistant turn of every session
pub const OPENING_PROMPT: &str = "Welcome to your mock interview. I'm here to help you practice. Let's begin when you're ready. Tell me about yourself.";

/// `userText` returned when nothing intelligible was said
pub const SILENCE_USER_TEXT: &str = "(Silence)";

/// `aiText` returned when nothing intelligible was said
pub const SILENCE_REPLY: &str = "I couldn't hear any audio. Please try speaking louder.";
