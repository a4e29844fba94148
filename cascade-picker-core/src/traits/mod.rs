//! Host and data source abstraction trait definition

mod host_bindings;
mod host_store;
mod options_loader;

pub use host_bindings::{HostBindings, HostEvent, HostHandler, InMemoryHostBindings};
pub use host_store::{HostStore, InMemoryHostStore, SetMode};
pub use options_loader::OptionsLoader;
