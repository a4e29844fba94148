//! Construction options of a cascade picker

use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::prompt::{PromptTemplate, DEFAULT_PROMPT_TEXT};
use crate::error::CascadeResult;

fn default_prompt_text() -> String {
    DEFAULT_PROMPT_TEXT.to_string()
}

/// Options accepted by [`crate::CascadeEngine::new`].
///
/// Deserializes from the same camelCase object hosts used to hand the picker:
///
/// ```json
/// { "promptText": "", "promptTexts": ["-Province-", "-City-"], "pickerCount": 2 }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", bound(deserialize = "T: Deserialize<'de>"))]
pub struct CascadeOptions<T> {
    /// Shared placeholder template, `{{ index }}` renders the 1-based column number.
    /// Empty disables the placeholder.
    #[serde(default = "default_prompt_text")]
    pub prompt_text: String,

    /// Per-column placeholder overrides, matched by position
    #[serde(default)]
    pub prompt_texts: Vec<String>,

    /// Fixed column count, `None` infers it from what the loader returns
    #[serde(default)]
    pub picker_count: Option<usize>,

    /// Value to preselect in each column
    #[serde(default)]
    pub init_values: Option<Vec<T>>,

    /// Unique id used to name host bindings, a fresh UUID when unset
    #[serde(default)]
    pub instance_id: Option<String>,
}

impl<T> Default for CascadeOptions<T> {
    fn default() -> Self {
        Self {
            prompt_text: default_prompt_text(),
            prompt_texts: Vec::new(),
            picker_count: None,
            init_values: None,
            instance_id: None,
        }
    }
}

impl<T: DeserializeOwned> CascadeOptions<T> {
    /// Parse options from a JSON object.
    pub fn from_json(json: &str) -> CascadeResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl<T> CascadeOptions<T> {
    #[must_use]
    pub fn with_prompt_text(mut self, text: impl Into<String>) -> Self {
        self.prompt_text = text.into();
        self
    }

    #[must_use]
    pub fn with_prompt_texts<I, S>(mut self, texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.prompt_texts = texts.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_picker_count(mut self, count: usize) -> Self {
        self.picker_count = Some(count);
        self
    }

    #[must_use]
    pub fn with_init_values(mut self, values: Vec<T>) -> Self {
        self.init_values = Some(values);
        self
    }

    #[must_use]
    pub fn with_instance_id(mut self, id: impl Into<String>) -> Self {
        self.instance_id = Some(id.into());
        self
    }

    pub(crate) fn prompt_template(&self) -> PromptTemplate {
        PromptTemplate::new(self.prompt_text.clone(), self.prompt_texts.clone())
    }

    /// Columns known before anything is loaded, at least one.
    pub(crate) fn initial_column_count(&self) -> usize {
        self.picker_count.unwrap_or(1).max(1)
    }
}
