pub mod codec;
pub mod eco;
pub mod file;
pub mod memory;
pub mod traits;

// Re-export
pub use eco::EcoRepository;
pub use file::FileKeyValueStore;
pub use memory::MemoryKeyValueStore;
pub use traits::{KeyValueStore, StoreKey};
