//! Host event binding abstraction Trait

use async_trait::async_trait;
use futures::future::BoxFuture;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{CascadeError, CascadeResult};

/// Event delivered by the view layer to a bound handler
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    /// The picker widget changed: display index of every column
    Change(Vec<usize>),
    /// A button was tapped
    Tap,
}

/// Named callback reachable from the view layer's declarative bindings
pub type HostHandler = Arc<dyn Fn(HostEvent) -> BoxFuture<'static, ()> + Send + Sync>;

/// Host Bindings Trait
///
/// Registers named handlers the view layer routes its change/tap events to.
#[async_trait]
pub trait HostBindings: Send + Sync {
    /// Register `handler` under `name`, replacing any previous one
    async fn bind(&self, name: String, handler: HostHandler);

    /// Remove the handler under `name`. Unbinding a missing name is a no-op.
    async fn unbind(&self, name: &str);
}

/// In-memory host bindings registry
///
/// Default implementation, lets a host (or a test) dispatch events by name.
#[derive(Clone, Default)]
pub struct InMemoryHostBindings {
    handlers: Arc<RwLock<HashMap<String, HostHandler>>>,
}

impl InMemoryHostBindings {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Run the handler bound under `name` to completion.
    pub async fn dispatch(&self, name: &str, event: HostEvent) -> CascadeResult<()> {
        // Clone out of the lock so the handler may bind or unbind.
        let handler = self
            .handlers
            .read()
            .await
            .get(name)
            .cloned()
            .ok_or_else(|| CascadeError::HandlerNotBound(name.to_string()))?;
        handler(event).await;
        Ok(())
    }

    /// Whether a handler is bound under `name`
    pub async fn is_bound(&self, name: &str) -> bool {
        self.handlers.read().await.contains_key(name)
    }

    /// Names of all bound handlers
    pub async fn names(&self) -> Vec<String> {
        self.handlers.read().await.keys().cloned().collect()
    }
}

#[async_trait]
impl HostBindings for InMemoryHostBindings {
    async fn bind(&self, name: String, handler: HostHandler) {
        self.handlers.write().await.insert(name, handler);
    }

    async fn unbind(&self, name: &str) {
        self.handlers.write().await.remove(name);
    }
}
