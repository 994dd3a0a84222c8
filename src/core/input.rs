//! The immutable per-cycle input object built from raw omnibox text.

use crate::classifier;
use crate::tokenizer;

/// What caused this input to be (re)issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputTrigger {
    /// The input box gained focus (fires zero-suggest on empty text).
    Focus,
    /// The user typed or deleted a character.
    Keystroke,
    /// Text was pasted wholesale.
    Paste,
}

/// Coarse classification of the raw input text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputType {
    Url,
    Query,
    ForcedQuery,
    Unknown,
}

/// One autocomplete query cycle's input. Immutable once constructed; a new
/// keystroke builds a new instance.
#[derive(Debug, Clone)]
pub struct AutocompleteInput {
    /// Trimmed text as typed (keeps the `?` of a forced query).
    pub text: String,
    pub trigger: InputTrigger,
    pub input_type: InputType,
    /// Whitespace-delimited lowercase terms, in typed order. For a forced
    /// query the leading `?` is stripped before term extraction.
    pub terms: Vec<String>,
    /// True when inline completion must not be offered for this cycle:
    /// pasted input, forced queries, and multi-word queries.
    pub prevent_inline_autocomplete: bool,
}

impl AutocompleteInput {
    /// Classify and tokenize raw text into a query-cycle input.
    pub fn from_text(text: &str, trigger: InputTrigger) -> Self {
        let trimmed = text.trim();
        let input_type = classifier::classify(trimmed);
        let terms = tokenizer::tokenize_input(Self::strip_forced_prefix(trimmed, input_type));

        let prevent_inline_autocomplete = trigger == InputTrigger::Paste
            || input_type == InputType::ForcedQuery
            || (input_type == InputType::Query && terms.len() > 1);

        Self {
            text: trimmed.to_string(),
            trigger,
            input_type,
            terms,
            prevent_inline_autocomplete,
        }
    }

    /// The text providers should treat as the query: forced queries lose
    /// their `?` prefix, everything else passes through.
    pub fn query_text(&self) -> &str {
        Self::strip_forced_prefix(&self.text, self.input_type)
    }

    /// Terms suitable for token matching against history. URL-classified
    /// input is re-split on non-alphanumeric boundaries so that
    /// `https://example.com/` matches the tokens of stored URLs instead of
    /// being treated as one opaque term.
    pub fn match_terms(&self) -> Vec<String> {
        if self.input_type == InputType::Url {
            tokenizer::tokenize(&self.text)
        } else {
            self.terms.clone()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    fn strip_forced_prefix(text: &str, input_type: InputType) -> &str {
        if input_type == InputType::ForcedQuery {
            text.trim_start_matches('?').trim_start()
        } else {
            text
        }
    }
}
