//! Type definition module

mod option;
mod options;
mod prompt;
mod state;

pub use option::{PickerOption, PickerValue};
pub use options::CascadeOptions;
pub use prompt::{PromptTemplate, DEFAULT_PROMPT_TEXT};
pub use state::PickerState;
