//! Ports (trait boundaries) for external dependencies.
//!
//! These traits are owned by the domain and implemented by adapters and
//! players elsewhere in the crate.

pub mod observer;
pub mod repository;
pub mod selector;

pub use observer::{NullObserver, TrainingObserver};
pub use repository::TableRepository;
pub use selector::MoveSelector;
