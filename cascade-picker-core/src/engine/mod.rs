//! Cascade engine - the embeddable multi-column picker core
//!
//! Each column's options depend on the value selected in the column before
//! it. Selecting in column N reloads columns N+1.. one after the other through
//! the injected [`OptionsLoader`], and the combined state is published to the
//! host store under one data key.

mod clock;


use std::sync::{Arc, Weak};

use futures::FutureExt;
use tokio::sync::Mutex;

use crate::context::HostContext;
use crate::error::CascadeResult;
use crate::traits::{HostEvent, HostHandler, OptionsLoader, SetMode};
use crate::types::{CascadeOptions, PickerOption, PickerState, PickerValue, PromptTemplate};

use clock::ReloadClock;

/// Cascade engine
///
/// A cheap handle: clones share the same picker.
pub struct CascadeEngine<T: PickerValue> {
    inner: Arc<EngineInner<T>>,
}

struct EngineInner<T: PickerValue> {
    host: HostContext<T>,
    data_key: String,
    instance_id: String,
    template: PromptTemplate,
    /// Columns published before the first load
    picker_count: usize,
    init_values: Option<Vec<T>>,
    loader: Arc<dyn OptionsLoader<T>>,
    /// Serializes every state write; never held across a loader call.
    clock: Mutex<ReloadClock>,
}

impl<T: PickerValue> Clone for CascadeEngine<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: PickerValue> CascadeEngine<T> {
    /// Create an engine without touching the host. Call [`Self::init`] next.
    #[must_use]
    pub fn new(
        host: HostContext<T>,
        data_key: impl Into<String>,
        loader: Arc<dyn OptionsLoader<T>>,
        options: CascadeOptions<T>,
    ) -> Self {
        let template = options.prompt_template();
        let picker_count = options.initial_column_count();
        let instance_id = options
            .instance_id
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

        Self {
            inner: Arc::new(EngineInner {
                host,
                data_key: data_key.into(),
                instance_id,
                template,
                picker_count,
                init_values: options.init_values,
                loader,
                clock: Mutex::new(ReloadClock::default()),
            }),
        }
    }

    /// Create an engine and run its initial load.
    ///
    /// If the initial load fails the engine is destroyed before the error is returned.
    pub async fn create(
        host: HostContext<T>,
        data_key: impl Into<String>,
        loader: Arc<dyn OptionsLoader<T>>,
        options: CascadeOptions<T>,
    ) -> CascadeResult<Self> {
        let engine = Self::new(host, data_key, loader, options);
        if let Err(e) = engine.init().await {
            engine.destroy().await;
            return Err(e);
        }
        Ok(engine)
    }

    /// Publish the empty columns, bind the change handler and load the
    /// cascade from column 0, preselecting the initial values.
    pub async fn init(&self) -> CascadeResult<()> {
        let count = self.inner.picker_count;
        let name = self.change_handler_name();
        {
            let clock = self.inner.clock.lock().await;
            if clock.is_destroyed() {
                return Ok(());
            }
            let mut state = self.load_state().await;
            state.set_options_groups(vec![Vec::new(); count], &self.inner.template);
            state.on_change_name = Some(name.clone());
            self.store_state(state, SetMode::Render).await;
        }

        self.inner
            .host
            .bindings
            .bind(name, self.change_handler())
            .await;
        log::debug!(
            "[{}] Cascade picker initialized with {count} column(s)",
            self.inner.data_key
        );

        let init_values = self.inner.init_values.clone();
        self.reload(None, None, init_values.as_deref()).await
    }

    /// Data key the state is published under
    pub fn data_key(&self) -> &str {
        &self.inner.data_key
    }

    /// Unique id of this picker instance
    pub fn instance_id(&self) -> &str {
        &self.inner.instance_id
    }

    /// Name the change handler is bound under
    pub fn change_handler_name(&self) -> String {
        format!("__CascadeEngine_{}_onChange", self.inner.instance_id)
    }

    pub(crate) fn host(&self) -> &HostContext<T> {
        &self.inner.host
    }

    /// Snapshot of the published state, `None` once destroyed
    pub async fn state(&self) -> Option<PickerState<T>> {
        self.inner.host.store.get(&self.inner.data_key).await
    }

    /// Number of columns currently known
    pub async fn column_count(&self) -> usize {
        self.load_state().await.column_count()
    }

    /// Selected value of every column, `None` where nothing is selected
    pub async fn values(&self) -> Vec<Option<T>> {
        self.load_state().await.values()
    }

    /// Select the given value in each column, reloading the whole cascade.
    pub async fn set_values<I>(&self, values: I) -> CascadeResult<()>
    where
        I: IntoIterator<Item = T>,
    {
        let presets: Vec<T> = values.into_iter().collect();
        self.reload(None, None, Some(&presets)).await
    }

    /// Selected option of every column, `None` where nothing is selected
    pub async fn selected_items(&self) -> Vec<Option<PickerOption<T>>> {
        self.load_state().await.selected_items()
    }

    /// Options currently loaded in `column`
    pub async fn column_options(&self, column: usize) -> Option<Vec<PickerOption<T>>> {
        self.load_state()
            .await
            .options_group(column)
            .map(<[PickerOption<T>]>::to_vec)
    }

    /// Reload every column after `from_column` (`None`: the whole cascade).
    ///
    /// `parent` is the value selected in `from_column`. When `presets` holds
    /// an entry for a column, that value is selected there as soon as the
    /// column is loaded and is passed on as the parent of the next column.
    ///
    /// Columns are loaded one after the other; the chain stops at the first
    /// empty result past the last known column. A completion made obsolete by
    /// a newer reload of an earlier column is discarded.
    pub async fn reload(
        &self,
        from_column: Option<usize>,
        parent: Option<T>,
        presets: Option<&[T]>,
    ) -> CascadeResult<()> {
        let mut parent = parent;
        let generation = {
            let mut clock = self.inner.clock.lock().await;
            if clock.is_destroyed() {
                return Ok(());
            }
            if let Some(column) = from_column {
                if let Some(value) = presets.and_then(|p| p.get(column)) {
                    let mut state = self.load_state().await;
                    state.update_select_index_by_value(column, value);
                    self.store_state(state, SetMode::Render).await;
                    parent = Some(value.clone());
                }
            }
            clock.claim(from_column)
        };

        self.run_chain(from_column, parent, presets, generation)
            .await
    }

    async fn run_chain(
        &self,
        mut origin: Option<usize>,
        mut parent: Option<T>,
        presets: Option<&[T]>,
        mut generation: u64,
    ) -> CascadeResult<()> {
        let key = &self.inner.data_key;
        loop {
            let target = origin.map_or(0, |column| column + 1);
            let items = match self
                .inner
                .loader
                .load(self, parent.as_ref(), target)
                .await
            {
                Ok(items) => items,
                Err(e) => {
                    log::debug!("[{key}] Loading column {target} failed: {e}");
                    return Err(e);
                }
            };

            let mut clock = self.inner.clock.lock().await;
            if !clock.is_current(generation, target) {
                log::debug!("[{key}] Discarding stale options for column {target}");
                return Ok(());
            }

            let mut state = self.load_state().await;
            if items.is_empty() && target >= state.column_count() {
                log::debug!(
                    "[{key}] Cascade settled with {} column(s)",
                    state.column_count()
                );
                return Ok(());
            }

            log::debug!("[{key}] Loaded {} option(s) for column {target}", items.len());
            state.set_options_group(target, items, &self.inner.template);
            parent = state.selected_value(target);
            origin = Some(target);

            if let Some(value) = presets.and_then(|p| p.get(target)) {
                state.update_select_index_by_value(target, value);
                parent = Some(value.clone());
            }

            self.store_state(state, SetMode::Render).await;
            generation = clock.claim(origin);
        }
    }

    /// Handle the picker widget's change event carrying the display index of
    /// every column.
    ///
    /// The first column that differs from the stored indices is reloaded
    /// downstream. The indices themselves are stored without a re-render;
    /// one outside its column's group is stored as no selection.
    pub async fn on_change(&self, selected: Vec<usize>) -> CascadeResult<()> {
        let (origin, parent, generation) = {
            let mut clock = self.inner.clock.lock().await;
            if clock.is_destroyed() {
                return Ok(());
            }
            let mut state = self.load_state().await;
            let origin = state.first_changed_column(&selected);
            state.select_indexs = Some(selected.into_iter().map(Some).collect());
            // Columns past the origin are checked as the reload rewrites them.
            state.clear_out_of_range_indexs(origin.map_or(usize::MAX, |column| column + 1));
            let parent = origin.and_then(|column| state.selected_value(column));
            self.store_state(state, SetMode::Silent).await;

            let Some(origin) = origin else {
                return Ok(());
            };
            (origin, parent, clock.claim(Some(origin)))
        };

        log::debug!(
            "[{}] Column {origin} changed, reloading downstream",
            self.inner.data_key
        );
        self.run_chain(Some(origin), parent, None, generation).await
    }

    /// Remove the published state and unbind the change handler. Safe to call twice.
    pub async fn destroy(&self) {
        let mut clock = self.inner.clock.lock().await;
        clock.destroy();
        self.inner.host.store.remove(&self.inner.data_key).await;
        self.inner
            .host
            .bindings
            .unbind(&self.change_handler_name())
            .await;
        log::debug!("[{}] Cascade picker destroyed", self.inner.data_key);
    }

    /// Apply `update` to the published state unless the engine is destroyed.
    pub(crate) async fn update_state<F>(&self, mode: SetMode, update: F)
    where
        F: FnOnce(&mut PickerState<T>) + Send,
    {
        let clock = self.inner.clock.lock().await;
        if clock.is_destroyed() {
            return;
        }
        let mut state = self.load_state().await;
        update(&mut state);
        self.store_state(state, mode).await;
    }

    fn change_handler(&self) -> HostHandler {
        let weak: Weak<EngineInner<T>> = Arc::downgrade(&self.inner);
        Arc::new(move |event: HostEvent| {
            let weak = weak.clone();
            async move {
                let HostEvent::Change(selected) = event else {
                    return;
                };
                let Some(inner) = weak.upgrade() else {
                    return;
                };
                let engine = CascadeEngine { inner };
                if let Err(e) = engine.on_change(selected).await {
                    if e.is_expected() {
                        log::warn!("[{}] Change handling failed: {e}", engine.data_key());
                    } else {
                        log::error!("[{}] Change handling failed: {e}", engine.data_key());
                    }
                }
            }
            .boxed()
        })
    }

    async fn load_state(&self) -> PickerState<T> {
        self.inner
            .host
            .store
            .get(&self.inner.data_key)
            .await
            .unwrap_or_default()
    }

    async fn store_state(&self, state: PickerState<T>, mode: SetMode) {
        self.inner
            .host
            .store
            .set(&self.inner.data_key, state, mode)
            .await;
    }
}
