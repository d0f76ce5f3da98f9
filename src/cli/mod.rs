//! Command-line entry points
//!
//! Binaries parse their arguments with clap and hand off to the functions here.

pub mod server;

pub use server::{LogFilter, ServerArgs, filter_directive, init_logging, run_server_mode};
