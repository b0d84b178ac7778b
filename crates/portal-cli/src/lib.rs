//! Library side of the `portal` binary: logging setup, config loading and
//! terminal rendering.

pub mod logging;
pub mod render;
pub mod settings;
