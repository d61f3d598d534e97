//! Bounded diagnostic trace accumulated during a check

/// Default number of scraped characters kept in the trace
pub const DEFAULT_EXCERPT_CHARS: usize = 300;
/// Upper bound for a single note
const MAX_NOTE_CHARS: usize = 240;
/// Upper bound for the whole trace
pub const MAX_TRACE_CHARS: usize = 1024;

const SEPARATOR: &str = " | ";

/// Truncate to at most `max_chars` characters, marking the cut with "…"
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

#[derive(Debug, Clone)]
pub struct TraceBuilder {
    excerpt_chars: usize,
    entries: Vec<String>,
}

impl TraceBuilder {
    pub fn new(excerpt_chars: usize) -> Self {
        Self {
            excerpt_chars,
            entries: Vec::new(),
        }
    }

    /// Record the head of the scraped text, newlines flattened
    pub fn excerpt(&mut self, raw_text: &str) {
        let flat = raw_text.split_whitespace().collect::<Vec<_>>().join(" ");
        self.entries
            .push(format!("Scraped: {}", truncate_chars(&flat, self.excerpt_chars)));
    }

    pub fn note(&mut self, message: impl AsRef<str>) {
        self.entries
            .push(truncate_chars(message.as_ref(), MAX_NOTE_CHARS));
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn finish(self) -> String {
        truncate_chars(&self.entries.join(SEPARATOR), MAX_TRACE_CHARS)
    }
}

impl Default for TraceBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_EXCERPT_CHARS)
    }
}
