//! Text shown alongside the room: who the person is and a few facts.

/// Longest name kept, in characters.
pub const MAX_NAME_LEN: usize = 63;

/// Longest lifespan string kept, in characters.
pub const MAX_LIFESPAN_LEN: usize = 63;

/// Longest single fact kept, in characters.
pub const MAX_FACT_LEN: usize = 127;

/// Most facts kept.
pub const MAX_FACTS: usize = 8;

/// Person summary for the detail overlay.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DetailViewContent {
    pub name: String,
    pub lifespan: String,
    pub facts: Vec<String>,
}

impl DetailViewContent {
    pub fn new(name: impl Into<String>, lifespan: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            lifespan: lifespan.into(),
            facts: Vec::new(),
        }
    }

    pub fn with_fact(mut self, fact: impl Into<String>) -> Self {
        self.facts.push(fact.into());
        self
    }

    /// Content shown before anyone is selected.
    pub fn placeholder() -> Self {
        Self::new("Select a person", "Awaiting selection")
            .with_fact("Choose an ancestor to explore their holographic records.")
    }

    /// Copy with every field cut to its display limit.
    pub fn sanitized(&self) -> Self {
        Self {
            name: truncate_chars(&self.name, MAX_NAME_LEN),
            lifespan: truncate_chars(&self.lifespan, MAX_LIFESPAN_LEN),
            facts: self
                .facts
                .iter()
                .take(MAX_FACTS)
                .map(|fact| truncate_chars(fact, MAX_FACT_LEN))
                .collect(),
        }
    }
}

/// Truncate on a char boundary.
fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => text[..byte_index].to_string(),
        None => text.to_string(),
    }
}
