//! Turning a goal into a plan outline.
//!
//! The session controller only sees the [`Decomposer`] trait. Every failure
//! (transport, service error, unparseable answer, missing credentials) is a
//! [`GateError::Communication`](crate::error::GateError::Communication); the
//! controller treats them all alike.

use async_trait::async_trait;

use crate::{error::Result, models::Decomposition};

mod gemini;

pub use gemini::GeminiDecomposer;

/// A service that breaks a goal into steps.
#[async_trait]
pub trait Decomposer: Send + Sync {
    /// Decomposes `goal` into one objective, ordered steps and a call to
    /// action.
    async fn decompose(&self, goal: &str) -> Result<Decomposition>;
}

/// Builds the instruction sent to a language model for `goal`.
pub fn build_prompt(goal: &str, language: &str) -> String {
    format!(
        r#"Act as "NOISE GATE", an elite productivity strategist.
The user has this goal: "{goal}".

Produce a tactical operating plan as JSON.

Content requirements:
1. one_thing: the single essential objective behind the goal. Central, direct and forceful (at most 15 words).
2. steps: break it into 3 to 5 detailed tactical steps.
   - Do NOT be vague or overly brief.
   - Each step is a clear instruction on WHAT to do and HOW to do it.
   - Give enough context to execute it without doubt.
   - Use imperative verbs (for example "Analyze the X data...", "Write the draft focusing on Y...").
3. call_to_action: a short command-style line that pushes for immediate action (at most 8 words).

Language: {language}."#
    )
}
