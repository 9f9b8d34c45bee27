//! Prompt templates
//!
//! Each template is a fixed instruction followed by a single transcript slot.
//! The slot is filled by position, so transcript text is never searched for or
//! substituted inside the instruction.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptTemplate {
    instruction: &'static str,
}

impl PromptTemplate {
    pub const SUMMARY: PromptTemplate = PromptTemplate {
        instruction: "Summarize this customer support call in 2–3 concise sentences. \
                      Focus on the customer's problem and any resolution steps.",
    };

    pub const SENTIMENT: PromptTemplate = PromptTemplate {
        instruction: "Classify the customer's sentiment in ONE WORD from this set: \
                      Positive, Neutral, Negative. Only output the single word.",
    };

    pub fn instruction(&self) -> &'static str {
        self.instruction
    }

    /// Fill the transcript slot
    pub fn render(&self, transcript: &str) -> String {
        format!("{}\n\nTranscript:\n{}", self.instruction, transcript)
    }
}
