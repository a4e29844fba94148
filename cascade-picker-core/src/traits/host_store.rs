//! Host view store abstraction Trait

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{watch, RwLock};

/// How a write reaches the view layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetMode {
    /// Update the data and ask the host to re-render
    Render,
    /// Update the in-memory data only
    Silent,
}

/// Host Store Trait
///
/// The key-value data bucket a host view renders from. A picker keeps its
/// whole state under one key.
#[async_trait]
pub trait HostStore<S>: Send + Sync {
    /// Read the value stored under `key`
    async fn get(&self, key: &str) -> Option<S>;

    /// Write the value stored under `key`
    ///
    /// # Arguments
    /// * `key` - data key
    /// * `value` - new value
    /// * `mode` - whether the host re-renders
    async fn set(&self, key: &str, value: S, mode: SetMode);

    /// Remove `key`, re-rendering without it. Removing a missing key is a no-op.
    async fn remove(&self, key: &str);
}

/// In-memory host store
///
/// Default implementation, counts the re-renders it was asked for.
#[derive(Clone)]
pub struct InMemoryHostStore<S> {
    data: Arc<RwLock<HashMap<String, S>>>,
    renders: Arc<watch::Sender<u64>>,
}

impl<S> InMemoryHostStore<S> {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        let (renders, _) = watch::channel(0);
        Self {
            data: Arc::new(RwLock::new(HashMap::new())),
            renders: Arc::new(renders),
        }
    }

    /// Number of re-renders requested so far
    pub fn render_count(&self) -> u64 {
        *self.renders.borrow()
    }

    /// Receiver notified on every re-render
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.renders.subscribe()
    }

    /// Keys currently stored
    pub async fn keys(&self) -> Vec<String> {
        self.data.read().await.keys().cloned().collect()
    }

    fn notify(&self) {
        self.renders.send_modify(|count| *count += 1);
    }
}

impl<S> Default for InMemoryHostStore<S> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<S: Clone + Send + Sync> HostStore<S> for InMemoryHostStore<S> {
    async fn get(&self, key: &str) -> Option<S> {
        self.data.read().await.get(key).cloned()
    }

    async fn set(&self, key: &str, value: S, mode: SetMode) {
        self.data.write().await.insert(key.to_string(), value);
        if mode == SetMode::Render {
            self.notify();
        }
    }

    async fn remove(&self, key: &str) {
        if self.data.write().await.remove(key).is_some() {
            self.notify();
        }
    }
}
