//! Prompt placeholder templates

use std::sync::LazyLock;

use regex::Regex;

/// Default placeholder text shown as the leading entry of every column
pub const DEFAULT_PROMPT_TEXT: &str = "-Select-";

/// `{{ index }}` token, case-insensitive, inner whitespace optional
#[allow(clippy::expect_used)]
static INDEX_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\{\{\s*index\s*\}\}").expect("index token pattern is valid")
});

/// Renders the placeholder text of each column.
///
/// A per-column override wins over the shared template when it is non-empty.
/// An empty rendered text means the column has no placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    text: String,
    overrides: Vec<String>,
}

impl PromptTemplate {
    #[must_use]
    pub fn new(text: impl Into<String>, overrides: Vec<String>) -> Self {
        Self {
            text: text.into(),
            overrides,
        }
    }

    /// Placeholder text for `column`, with the 1-based column number substituted.
    #[must_use]
    pub fn render(&self, column: usize) -> Option<String> {
        let template = self
            .overrides
            .get(column)
            .filter(|text| !text.is_empty())
            .unwrap_or(&self.text);
        if template.is_empty() {
            return None;
        }

        let number = (column + 1).to_string();
        Some(INDEX_TOKEN.replace_all(template, number.as_str()).into_owned())
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::new(DEFAULT_PROMPT_TEXT, Vec::new())
    }
}
