// file: src/utils/mod.rs
// version: 2.0.0
// guid: 9d1f7271-955e-48f7-acfb-00c1c63a8156

//! Utility modules for system operations

pub mod clock;
pub mod system;

pub use clock::{Sleeper, TokioSleeper};
pub use system::SystemUtils;
