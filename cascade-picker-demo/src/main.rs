//! Region picker demo
//!
//! Drives a three-column province/city/district picker through the in-memory
//! host: the initial load, a few change events the way a picker widget emits
//! them, then the confirm button. The region service is simulated with random
//! latency and outages, recovered by the retrying loader.

mod flaky;
mod regions;

use std::process::ExitCode;
use std::sync::Arc;

use cascade_picker_core::loaders::{MemoryOptionsLoader, RetryingLoader};
use cascade_picker_core::presenter::{CancelCallback, CancelEvent, ConfirmCallback, ConfirmEvent};
use cascade_picker_core::traits::{HostEvent, InMemoryHostBindings, InMemoryHostStore};
use cascade_picker_core::{
    CascadeOptions, CascadePresenter, CascadeResult, HostContext, PickerOption, PickerState,
};
use flaky::FlakyLoader;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DATA_KEY: &str = "areaPicker";

const OPTIONS: &str = r#"{
    "promptText": "",
    "promptTexts": ["-Province-", "-City-", "-District-"],
    "pickerCount": 3,
    "initValues": ["450000", "450200", "450202"]
}"#;

const MAX_RETRIES: u32 = 5;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .without_time(),
        )
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Demo failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> CascadeResult<()> {
    let tree = MemoryOptionsLoader::from_tree(regions::region_tree()?);
    let flaky = FlakyLoader::new(Arc::new(tree), 0.3, 40);
    let loader = Arc::new(RetryingLoader::<String>::new(Arc::new(flaky), MAX_RETRIES));

    let store = Arc::new(InMemoryHostStore::<PickerState<String>>::new());
    let bindings = Arc::new(InMemoryHostBindings::new());
    let host = HostContext::new(store.clone(), bindings.clone());

    let mut renders = store.subscribe();
    tokio::spawn(async move {
        while renders.changed().await.is_ok() {
            let count = *renders.borrow_and_update();
            tracing::debug!("Host re-render #{count}");
        }
    });

    let on_cancel: CancelCallback<String> = Arc::new(|event: CancelEvent<String>| {
        tracing::info!("Picker {} cancelled", event.engine.data_key());
    });
    let on_confirm: ConfirmCallback<String> = Arc::new(|event: ConfirmEvent<String>| {
        let codes: Vec<&str> = event
            .values
            .iter()
            .map(|value| value.as_deref().unwrap_or("-"))
            .collect();
        tracing::info!(
            "Picker {} confirmed: {}",
            event.engine.data_key(),
            codes.join(" / ")
        );
    });

    let options = CascadeOptions::from_json(OPTIONS)?;
    let presenter = CascadePresenter::create(
        host,
        DATA_KEY,
        loader,
        options,
        Some(on_cancel),
        Some(on_confirm),
    )
    .await?;
    tracing::info!("Initial selection: {}", describe(&presenter.selected_items().await));

    presenter.show().await;

    // Display indices as the widget reports them, placeholder rows included.
    let change_name = presenter.engine().change_handler_name();
    for selected in [vec![2, 0, 0], vec![2, 2, 0], vec![2, 2, 2]] {
        bindings
            .dispatch(&change_name, HostEvent::Change(selected.clone()))
            .await?;
        tracing::info!(
            "After change {:?}: {}",
            selected,
            describe(&presenter.selected_items().await)
        );
    }

    bindings
        .dispatch(&presenter.confirm_handler_name(), HostEvent::Tap)
        .await?;
    tracing::info!(
        "Panel visible after confirm: {}, {} re-render(s) requested",
        presenter.is_visible().await,
        store.render_count()
    );

    presenter.destroy().await;
    tracing::info!(
        "Destroyed, {} key(s) and {} binding(s) left",
        store.keys().await.len(),
        bindings.names().await.len()
    );
    Ok(())
}

fn describe(items: &[Option<PickerOption<String>>]) -> String {
    items
        .iter()
        .map(|item| item.as_ref().map_or("-", |item| item.text.as_str()))
        .collect::<Vec<_>>()
        .join(" / ")
}
