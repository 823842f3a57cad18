//! Platform ports
//!
//! The simulation core never touches the host platform. These small ports
//! carry the host-side concerns:
//! - `storage`: key/value persistence (web LocalStorage, in-memory native)
//! - `input`: pointer/touch/keyboard events folded into per-tick input

pub mod input;
pub mod storage;

pub use input::{InputAdapter, InputEvent, Key};
pub use storage::{MemoryStore, ScoreStore};

#[cfg(target_arch = "wasm32")]
pub use storage::LocalStorageStore;
