//! Session storage backends

pub mod file;
pub mod memory;
pub mod traits;

pub use file::FileSessionStorage;
pub use memory::MemorySessionStorage;
pub use traits::SessionStorage;
