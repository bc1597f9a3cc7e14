mod file_store;
mod memory;

pub use crate::{file_store::FileStore, memory::MemoryFileStore};
