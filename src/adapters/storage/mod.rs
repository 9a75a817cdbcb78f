//! Storage adapters - session store implementations.

mod in_memory;

pub use in_memory::InMemorySessionStore;
