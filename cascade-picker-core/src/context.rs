//! Host context - the collaborators a picker is embedded into

use std::sync::Arc;

use crate::traits::{HostBindings, HostStore};
use crate::types::PickerState;

/// Host context
///
/// The host view creates this context and injects its store and binding
/// registry. Several pickers may share one context under different data keys.
pub struct HostContext<T> {
    /// View data store the picker state is published to
    pub store: Arc<dyn HostStore<PickerState<T>>>,
    /// Registry the view layer routes events through
    pub bindings: Arc<dyn HostBindings>,
}

impl<T> HostContext<T> {
    /// Create host context
    #[must_use]
    pub fn new(
        store: Arc<dyn HostStore<PickerState<T>>>,
        bindings: Arc<dyn HostBindings>,
    ) -> Self {
        Self { store, bindings }
    }
}

impl<T> Clone for HostContext<T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            bindings: Arc::clone(&self.bindings),
        }
    }
}
