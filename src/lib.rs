pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::{LocalStorage, ManualScheduler};
pub use app::frame_loop::FrameLoop;
pub use config::AppConfig;
pub use core::count_up::{CountUp, CountUpOptions};
pub use core::engine::CleanupEngine;
pub use core::format::NumberFormat;
pub use core::normalizer::{clean_text, Normalized, TextNormalizer};
pub use core::pipeline::BenefitCleanupPipeline;
pub use domain::model::{CountUpState, FrameHandle, Record};
pub use utils::error::{KitError, Result};
