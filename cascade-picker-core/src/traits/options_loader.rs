//! Options loader abstraction Trait

use async_trait::async_trait;

use crate::engine::CascadeEngine;
use crate::error::CascadeResult;
use crate::types::{PickerOption, PickerValue};

/// Options Loader Trait
///
/// Fetches the options of one column given the value selected in the column
/// before it. An empty list past the last known column ends the cascade, so
/// implementations must always resolve.
///
/// Failures are returned to whoever triggered the reload; the engine never
/// retries on its own (see [`crate::loaders::RetryingLoader`]).
#[async_trait]
pub trait OptionsLoader<T: PickerValue>: Send + Sync {
    /// Load the options of `column`
    ///
    /// # Arguments
    /// * `picker` - the engine asking, for loaders that need its current values
    /// * `parent` - value selected in `column - 1`, `None` for column 0 or no selection
    /// * `column` - column being loaded
    async fn load(
        &self,
        picker: &CascadeEngine<T>,
        parent: Option<&T>,
        column: usize,
    ) -> CascadeResult<Vec<PickerOption<T>>>;
}
