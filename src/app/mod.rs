#[cfg(feature = "cli")]
pub mod commands;
pub mod frame_loop;
