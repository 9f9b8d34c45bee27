use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").expect("email pattern")
});

static PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\+?\d[\d\s().-]{7,}\b").expect("phone pattern"));

static CARD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:\d[ -]*?){13,16}\b").expect("card pattern"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PiiKind {
    Email,
    Phone,
    Card,
}

impl PiiKind {
    pub fn token(&self) -> &'static str {
        match self {
            PiiKind::Email => "[REDACTED_EMAIL]",
            PiiKind::Phone => "[REDACTED_PHONE]",
            PiiKind::Card => "[REDACTED_CARD]",
        }
    }

    pub fn pattern(&self) -> &'static Regex {
        match self {
            PiiKind::Email => &EMAIL,
            PiiKind::Phone => &PHONE,
            PiiKind::Card => &CARD,
        }
    }
}

impl fmt::Display for PiiKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PiiKind::Email => "email",
            PiiKind::Phone => "phone",
            PiiKind::Card => "card",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedactionInfo {
    pub kind: PiiKind,
    pub count: usize,
}

/// Replaces emails, phone numbers and card numbers with fixed tokens
pub struct Redactor {
    kinds: Vec<PiiKind>,
}

impl Redactor {
    pub fn new() -> Self {
        // Card runs last so it cannot claim digits the phone pattern would match
        Self {
            kinds: vec![PiiKind::Email, PiiKind::Phone, PiiKind::Card],
        }
    }

    /// Redact PII from content
    pub fn redact(&self, content: &str) -> (String, Vec<RedactionInfo>) {
        let mut result = content.to_string();
        let mut redactions = Vec::new();

        for kind in &self.kinds {
            let pattern = kind.pattern();
            let count = pattern.find_iter(&result).count();

            if count > 0 {
                result = pattern.replace_all(&result, kind.token()).into_owned();
                redactions.push(RedactionInfo { kind: *kind, count });
            }
        }

        (result, redactions)
    }
}

impl Default for Redactor {
    fn default() -> Self {
        Self::new()
    }
}
