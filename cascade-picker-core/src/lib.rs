//! Cascade Picker Core Library
//!
//! Provides a cascading multi-column selector, including:
//! - Cascade engine (options of each column depend on the column before it)
//! - Cascade presenter (a dismissible panel with cancel/confirm buttons)
//! - Stock options loaders (static tree, retrying decorator)
//!
//! The host view is abstracted through traits: a data store the picker state
//! is published to, and a binding registry the view routes events through.

pub mod context;
pub mod engine;
pub mod error;
pub mod loaders;
pub mod presenter;
pub mod traits;
pub mod types;

#[cfg(test)]
mod test_utils;

// Re-export common types
pub use context::HostContext;
pub use engine::CascadeEngine;
pub use error::{CascadeError, CascadeResult};
pub use presenter::{CancelEvent, CascadePresenter, ConfirmEvent};
pub use traits::{HostBindings, HostStore, OptionsLoader};
pub use types::{CascadeOptions, PickerOption, PickerState, PickerValue};
