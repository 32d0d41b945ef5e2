//! Process-level infrastructure shared by every layer: command line / environment
//! configuration and the global logger.

pub mod config;
pub mod logging;
