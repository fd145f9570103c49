mod code_block;
mod config;
mod core;
mod ops;
mod plugin;

pub use crate::code_block::*;
pub use crate::config::*;
pub use crate::core::*;
pub use crate::ops::*;
pub use crate::plugin::*;
