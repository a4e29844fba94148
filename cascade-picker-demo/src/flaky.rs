//! Loader simulating a slow, unreliable region service

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use cascade_picker_core::{CascadeEngine, CascadeError, CascadeResult, OptionsLoader, PickerOption};
use rand::Rng;

/// Delays every load and fails a share of them
pub struct FlakyLoader {
    inner: Arc<dyn OptionsLoader<String>>,
    failure_rate: f64,
    max_latency_ms: u64,
}

impl FlakyLoader {
    pub fn new(
        inner: Arc<dyn OptionsLoader<String>>,
        failure_rate: f64,
        max_latency_ms: u64,
    ) -> Self {
        Self {
            inner,
            failure_rate,
            max_latency_ms,
        }
    }
}

#[async_trait]
impl OptionsLoader<String> for FlakyLoader {
    async fn load(
        &self,
        picker: &CascadeEngine<String>,
        parent: Option<&String>,
        column: usize,
    ) -> CascadeResult<Vec<PickerOption<String>>> {
        // ThreadRng is not Send, keep it out of the awaits.
        let (latency, fail) = {
            let mut rng = rand::rng();
            (
                rng.random_range(0..=self.max_latency_ms),
                rng.random_bool(self.failure_rate),
            )
        };

        tokio::time::sleep(Duration::from_millis(latency)).await;
        if fail {
            tracing::debug!("Simulated outage loading column {column}");
            return Err(CascadeError::loader(column, "region service unavailable"));
        }
        self.inner.load(picker, parent, column).await
    }
}
