pub mod count_up;
pub mod easing;
pub mod engine;
pub mod format;
pub mod normalizer;
pub mod pipeline;

pub use crate::domain::model::{CleanupResult, CountUpState, FrameHandle, Record};
pub use crate::domain::ports::{CleanupSettings, FrameScheduler, Pipeline, Storage};
pub use crate::utils::error::Result;
