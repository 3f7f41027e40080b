// Adapters layer: concrete implementations of the domain ports (storage, frame scheduling).

pub mod scheduler;
pub mod storage;

pub use scheduler::ManualScheduler;
pub use storage::LocalStorage;
