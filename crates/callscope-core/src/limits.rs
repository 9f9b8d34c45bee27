//! Transcript size limiting

pub const DEFAULT_MAX_TRANSCRIPT_CHARS: usize = 4000;

/// Text after applying the size ceiling
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Limited {
    pub text: String,
    pub truncated: bool,
}

/// Cuts transcripts to a fixed number of characters (Unicode scalar values)
#[derive(Debug, Clone, Copy)]
pub struct SizeLimiter {
    max_chars: usize,
}

impl SizeLimiter {
    pub fn new(max_chars: usize) -> Self {
        Self { max_chars }
    }

    pub fn max_chars(&self) -> usize {
        self.max_chars
    }

    pub fn limit(&self, text: &str) -> Limited {
        match text.char_indices().nth(self.max_chars) {
            Some((cut, _)) => Limited {
                text: text[..cut].to_string(),
                truncated: true,
            },
            None => Limited {
                text: text.to_string(),
                truncated: false,
            },
        }
    }
}

impl Default for SizeLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_TRANSCRIPT_CHARS)
    }
}
