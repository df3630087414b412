//! Token cache stores.

mod memory;
mod noop;

pub use memory::InMemoryTokenCache;
pub use noop::NoopTokenCache;
