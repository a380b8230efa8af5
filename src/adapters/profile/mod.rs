//! Profile store adapters.

mod memory;

pub use memory::InMemoryProfileStore;
