//! Cascade presenter - a dismissible panel around a cascade engine
//!
//! Adds the show/hide flag and the cancel/confirm buttons of a picker that
//! slides up from the bottom of the view.

use std::sync::{Arc, Weak};

use futures::FutureExt;

use crate::context::HostContext;
use crate::engine::CascadeEngine;
use crate::error::CascadeResult;
use crate::traits::{HostEvent, HostHandler, OptionsLoader, SetMode};
use crate::types::{CascadeOptions, PickerOption, PickerValue};

/// Passed to the cancel callback
pub struct CancelEvent<T: PickerValue> {
    pub engine: CascadeEngine<T>,
}

/// Passed to the confirm callback
pub struct ConfirmEvent<T: PickerValue> {
    pub engine: CascadeEngine<T>,
    /// Values selected at the moment the button was tapped
    pub values: Vec<Option<T>>,
}

pub type CancelCallback<T> = Arc<dyn Fn(CancelEvent<T>) + Send + Sync>;
pub type ConfirmCallback<T> = Arc<dyn Fn(ConfirmEvent<T>) + Send + Sync>;

/// Cascade presenter
pub struct CascadePresenter<T: PickerValue> {
    inner: Arc<PresenterInner<T>>,
}

struct PresenterInner<T: PickerValue> {
    engine: CascadeEngine<T>,
    on_cancel: Option<CancelCallback<T>>,
    on_confirm: Option<ConfirmCallback<T>>,
}

impl<T: PickerValue> Clone for CascadePresenter<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: PickerValue> CascadePresenter<T> {
    /// Create a hidden presenter, bind its buttons and run the initial load.
    ///
    /// If the initial load fails the presenter is destroyed before the error is returned.
    pub async fn create(
        host: HostContext<T>,
        data_key: impl Into<String>,
        loader: Arc<dyn OptionsLoader<T>>,
        options: CascadeOptions<T>,
        on_cancel: Option<CancelCallback<T>>,
        on_confirm: Option<ConfirmCallback<T>>,
    ) -> CascadeResult<Self> {
        let engine = CascadeEngine::new(host, data_key, loader, options);
        let presenter = Self {
            inner: Arc::new(PresenterInner {
                engine,
                on_cancel,
                on_confirm,
            }),
        };

        presenter.bind_buttons().await;
        if let Err(e) = presenter.inner.engine.init().await {
            presenter.destroy().await;
            return Err(e);
        }
        Ok(presenter)
    }

    /// The wrapped engine
    pub fn engine(&self) -> &CascadeEngine<T> {
        &self.inner.engine
    }

    /// Name the cancel button handler is bound under
    pub fn cancel_handler_name(&self) -> String {
        format!(
            "__CascadePresenter_{}_onCancelClick",
            self.inner.engine.instance_id()
        )
    }

    /// Name the confirm button handler is bound under
    pub fn confirm_handler_name(&self) -> String {
        format!(
            "__CascadePresenter_{}_onConfirmClick",
            self.inner.engine.instance_id()
        )
    }

    /// Show the panel
    pub async fn show(&self) {
        self.set_visible(true).await;
    }

    /// Hide the panel
    pub async fn hide(&self) {
        self.set_visible(false).await;
    }

    pub async fn is_visible(&self) -> bool {
        self.inner
            .engine
            .state()
            .await
            .and_then(|state| state.visible)
            .unwrap_or(false)
    }

    pub async fn values(&self) -> Vec<Option<T>> {
        self.inner.engine.values().await
    }

    pub async fn set_values<I>(&self, values: I) -> CascadeResult<()>
    where
        I: IntoIterator<Item = T>,
    {
        self.inner.engine.set_values(values).await
    }

    pub async fn selected_items(&self) -> Vec<Option<PickerOption<T>>> {
        self.inner.engine.selected_items().await
    }

    pub async fn column_options(&self, column: usize) -> Option<Vec<PickerOption<T>>> {
        self.inner.engine.column_options(column).await
    }

    /// Hide, then report the cancellation.
    pub async fn cancel(&self) {
        self.hide().await;
        if let Some(on_cancel) = &self.inner.on_cancel {
            on_cancel(CancelEvent {
                engine: self.inner.engine.clone(),
            });
        }
    }

    /// Hide, then report the values selected right now.
    pub async fn confirm(&self) {
        self.hide().await;
        let values = self.inner.engine.values().await;
        log::debug!(
            "[{}] Confirmed {} value(s)",
            self.inner.engine.data_key(),
            values.len()
        );
        if let Some(on_confirm) = &self.inner.on_confirm {
            on_confirm(ConfirmEvent {
                engine: self.inner.engine.clone(),
                values,
            });
        }
    }

    /// Destroy the engine and unbind both buttons. Safe to call twice.
    pub async fn destroy(&self) {
        self.inner.engine.destroy().await;
        let bindings = &self.inner.engine.host().bindings;
        bindings.unbind(&self.cancel_handler_name()).await;
        bindings.unbind(&self.confirm_handler_name()).await;
    }

    async fn set_visible(&self, visible: bool) {
        self.inner
            .engine
            .update_state(SetMode::Render, |state| state.visible = Some(visible))
            .await;
    }

    async fn bind_buttons(&self) {
        let cancel_name = self.cancel_handler_name();
        let confirm_name = self.confirm_handler_name();

        let bindings = &self.inner.engine.host().bindings;
        bindings
            .bind(cancel_name.clone(), self.button_handler(Button::Cancel))
            .await;
        bindings
            .bind(confirm_name.clone(), self.button_handler(Button::Confirm))
            .await;

        self.inner
            .engine
            .update_state(SetMode::Render, |state| {
                state.on_cancel_name = Some(cancel_name);
                state.on_confirm_name = Some(confirm_name);
                state.visible = Some(false);
            })
            .await;
    }

    fn button_handler(&self, button: Button) -> HostHandler {
        let weak: Weak<PresenterInner<T>> = Arc::downgrade(&self.inner);
        Arc::new(move |_event: HostEvent| {
            let weak = weak.clone();
            async move {
                let Some(inner) = weak.upgrade() else {
                    return;
                };
                let presenter = CascadePresenter { inner };
                match button {
                    Button::Cancel => presenter.cancel().await,
                    Button::Confirm => presenter.confirm().await,
                }
            }
            .boxed()
        })
    }
}

#[derive(Debug, Clone, Copy)]
enum Button {
    Cancel,
    Confirm,
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::test_utils::{create_test_host, region_script, ScriptedLoader, TestStore};
    use crate::traits::{HostStore, InMemoryHostBindings};

    struct Fixture {
        presenter: CascadePresenter<i32>,
        store: Arc<TestStore<i32>>,
        bindings: Arc<InMemoryHostBindings>,
        cancelled: Arc<Mutex<usize>>,
        confirmed: Arc<Mutex<Vec<Vec<Option<i32>>>>>,
    }

    async fn fixture() -> Fixture {
        let (host, store, bindings) = create_test_host();
        let loader = Arc::new(ScriptedLoader::new(region_script));
        let cancelled = Arc::new(Mutex::new(0));
        let confirmed = Arc::new(Mutex::new(Vec::new()));

        let on_cancel: CancelCallback<i32> = {
            let cancelled = cancelled.clone();
            Arc::new(move |_event: CancelEvent<i32>| *cancelled.lock().unwrap() += 1)
        };
        let on_confirm: ConfirmCallback<i32> = {
            let confirmed = confirmed.clone();
            Arc::new(move |event: ConfirmEvent<i32>| {
                confirmed.lock().unwrap().push(event.values);
            })
        };

        let presenter = CascadePresenter::create(
            host,
            "areaPicker2",
            loader,
            CascadeOptions::default()
                .with_prompt_texts(["-Province-", "-City-", "-District-"])
                .with_picker_count(3)
                .with_init_values(vec![2, 20, 200]),
            Some(on_cancel),
            Some(on_confirm),
        )
        .await
        .unwrap();

        Fixture {
            presenter,
            store,
            bindings,
            cancelled,
            confirmed,
        }
    }

    #[tokio::test]
    async fn starts_hidden_with_buttons_published() {
        let f = fixture().await;
        let state = f.store.get("areaPicker2").await.unwrap();
        assert_eq!(state.visible, Some(false));
        assert_eq!(state.on_cancel_name, Some(f.presenter.cancel_handler_name()));
        assert_eq!(state.on_confirm_name, Some(f.presenter.confirm_handler_name()));
        assert_eq!(
            state.on_change_name,
            Some(f.presenter.engine().change_handler_name())
        );
        assert_eq!(f.presenter.values().await, vec![Some(2), Some(20), Some(200)]);
    }

    #[tokio::test]
    async fn show_and_hide_render() {
        let f = fixture().await;
        let renders = f.store.render_count();

        f.presenter.show().await;
        assert!(f.presenter.is_visible().await);
        f.presenter.hide().await;
        assert!(!f.presenter.is_visible().await);

        assert_eq!(f.store.render_count(), renders + 2);
    }

    #[tokio::test]
    async fn confirm_click_hides_and_reports_current_values() {
        let f = fixture().await;
        f.presenter.show().await;
        f.bindings
            .dispatch(
                &f.presenter.engine().change_handler_name(),
                HostEvent::Change(vec![1, 1, 0]),
            )
            .await
            .unwrap();

        f.bindings
            .dispatch(&f.presenter.confirm_handler_name(), HostEvent::Tap)
            .await
            .unwrap();

        assert!(!f.presenter.is_visible().await);
        assert_eq!(
            *f.confirmed.lock().unwrap(),
            vec![vec![Some(1), Some(10), None]]
        );
        assert_eq!(*f.cancelled.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn cancel_click_hides_and_reports() {
        let f = fixture().await;
        f.presenter.show().await;

        f.bindings
            .dispatch(&f.presenter.cancel_handler_name(), HostEvent::Tap)
            .await
            .unwrap();

        assert!(!f.presenter.is_visible().await);
        assert_eq!(*f.cancelled.lock().unwrap(), 1);
        assert!(f.confirmed.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn buttons_without_callbacks_only_hide() {
        let (host, _, bindings) = create_test_host();
        let loader = Arc::new(ScriptedLoader::new(region_script));
        let presenter = CascadePresenter::create(
            host,
            "picker",
            loader,
            CascadeOptions::default(),
            None,
            None,
        )
        .await
        .unwrap();
        presenter.show().await;

        bindings
            .dispatch(&presenter.confirm_handler_name(), HostEvent::Tap)
            .await
            .unwrap();

        assert!(!presenter.is_visible().await);
    }

    #[tokio::test]
    async fn destroy_unbinds_everything_and_is_idempotent() {
        let f = fixture().await;

        f.presenter.destroy().await;
        f.presenter.destroy().await;

        assert!(f.store.get("areaPicker2").await.is_none());
        assert!(f.bindings.names().await.is_empty());

        // Show after destroy must not bring the state back.
        f.presenter.show().await;
        assert!(f.store.get("areaPicker2").await.is_none());
    }
}
