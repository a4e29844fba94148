//! Test helper module
//!
//! Provides mock implementations and convenient test factory methods.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{oneshot, RwLock};

use crate::context::HostContext;
use crate::engine::CascadeEngine;
use crate::error::{CascadeError, CascadeResult};
use crate::traits::{InMemoryHostBindings, InMemoryHostStore, OptionsLoader};
use crate::types::{PickerOption, PickerState, PickerValue};

type Script<T> = Box<dyn Fn(Option<&T>, usize) -> Vec<PickerOption<T>> + Send + Sync>;

// ===== ScriptedLoader =====

/// Loader answering from a closure, recording every call.
pub struct ScriptedLoader<T> {
    script: Script<T>,
    calls: RwLock<Vec<(Option<T>, usize)>>,
    /// Columns that fail with a loader error, consumed one per call
    failures: RwLock<HashMap<usize, usize>>,
    /// Completions held back until the test releases them
    gates: RwLock<HashMap<usize, VecDeque<oneshot::Receiver<()>>>>,
}

impl<T: PickerValue> ScriptedLoader<T> {
    pub fn new<F>(script: F) -> Self
    where
        F: Fn(Option<&T>, usize) -> Vec<PickerOption<T>> + Send + Sync + 'static,
    {
        Self {
            script: Box::new(script),
            calls: RwLock::new(Vec::new()),
            failures: RwLock::new(HashMap::new()),
            gates: RwLock::new(HashMap::new()),
        }
    }

    /// Make the next `times` loads of `column` fail.
    pub async fn fail_column(&self, column: usize, times: usize) {
        self.failures.write().await.insert(column, times);
    }

    /// Hold the next load of `column` until the returned sender fires.
    pub async fn hold_column(&self, column: usize) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gates
            .write()
            .await
            .entry(column)
            .or_default()
            .push_back(rx);
        tx
    }

    pub async fn calls(&self) -> Vec<(Option<T>, usize)> {
        self.calls.read().await.clone()
    }

    pub async fn clear_calls(&self) {
        self.calls.write().await.clear();
    }
}

#[async_trait]
impl<T: PickerValue> OptionsLoader<T> for ScriptedLoader<T> {
    async fn load(
        &self,
        _picker: &CascadeEngine<T>,
        parent: Option<&T>,
        column: usize,
    ) -> CascadeResult<Vec<PickerOption<T>>> {
        self.calls.write().await.push((parent.cloned(), column));

        let gate = self
            .gates
            .write()
            .await
            .get_mut(&column)
            .and_then(VecDeque::pop_front);
        if let Some(gate) = gate {
            let _ = gate.await;
        }

        {
            let mut failures = self.failures.write().await;
            if let Some(remaining) = failures.get_mut(&column) {
                if *remaining > 0 {
                    *remaining -= 1;
                    return Err(CascadeError::loader(column, "scripted failure"));
                }
            }
        }

        Ok((self.script)(parent, column))
    }
}

// ===== Factory methods =====

pub type TestStore<T> = InMemoryHostStore<PickerState<T>>;

/// Create a test `HostContext` backed by the in-memory store and bindings
pub fn create_test_host<T: PickerValue>() -> (
    HostContext<T>,
    Arc<TestStore<T>>,
    Arc<InMemoryHostBindings>,
) {
    let store = Arc::new(InMemoryHostStore::new());
    let bindings = Arc::new(InMemoryHostBindings::new());
    let host = HostContext::new(store.clone(), bindings.clone());
    (host, store, bindings)
}

pub fn opt(text: &str, value: i32) -> PickerOption<i32> {
    PickerOption::new(text, value)
}

/// Three-column region-like tree:
/// - column 0: A(1), B(2)
/// - column 1: X(10) under 1, Y(20) and Z(21) under 2
/// - column 2: P(100) under 10, Q(200) under 20
pub fn region_script(parent: Option<&i32>, column: usize) -> Vec<PickerOption<i32>> {
    match (column, parent) {
        (0, _) => vec![opt("A", 1), opt("B", 2)],
        (1, Some(1)) => vec![opt("X", 10)],
        (1, Some(2)) => vec![opt("Y", 20), opt("Z", 21)],
        (2, Some(10)) => vec![opt("P", 100)],
        (2, Some(20)) => vec![opt("Q", 200)],
        _ => Vec::new(),
    }
}

/// The three-column scenario loader: column 1 only has options under 1 and
/// column 2 never has any.
pub fn sparse_script(parent: Option<&i32>, column: usize) -> Vec<PickerOption<i32>> {
    match (column, parent) {
        (0, _) => vec![opt("A", 1), opt("B", 2)],
        (1, Some(1)) => vec![opt("X", 10)],
        _ => Vec::new(),
    }
}

/// Assert the invariants every settled state holds.
pub fn assert_consistent<T: PickerValue>(state: &PickerState<T>) {
    assert_eq!(state.prompt_texts.len(), state.options_groups.len());
    if let Some(indexs) = &state.select_indexs {
        for (column, index) in indexs.iter().enumerate() {
            let Some(index) = index else { continue };
            let group_len = state.options_groups.get(column).map_or(0, Vec::len);
            let bound = group_len + usize::from(state.has_prompt(column));
            assert!(
                *index < bound,
                "column {column}: index {index} outside [0, {bound})"
            );
        }
    }
}
