//! Stock options loaders

mod memory;
mod retry;

pub use memory::{MemoryOptionsLoader, OptionNode};
pub use retry::RetryingLoader;
