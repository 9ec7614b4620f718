//! This crate captures the call stack of the running process and renders it as
//! human-readable text. It is meant to be called from crash and assertion paths,
//! so nothing here panics or returns an error while capturing or rendering: a
//! trace that cannot be symbolized degrades to raw addresses, and a platform
//! without a backtrace facility produces an empty trace.
//!
//! Simple usage:
//! ```
//! use stacktrace::StackTrace;
//!
//! // Capturing is cheap and never allocates.
//! let trace = StackTrace::new();
//!
//! // Symbolization is deferred until the trace is rendered.
//! trace.print_backtrace();
//!
//! let mut out = Vec::new();
//! trace.output_to_stream(&mut out).unwrap();
//! ```
//!
//! Sample output of `output_to_stream` on linux-gnu:
//! ```text
//! Backtrace:
//!     ./target/debug/app(+0x1b2c4) [0x55d5e3a1f2c4]
//!     ./target/debug/app(+0x1b491) [0x55d5e3a1f491]
//!     /lib/x86_64-linux-gnu/libc.so.6(__libc_start_main+0xf3) [0x7f0f2b6a2083]
//! ```
//!
//! The rendering strategy is chosen once per process, see [Strategy].

#[macro_use]
extern crate tracing;

use std::collections::TryReserveError;
use std::io;

mod capture;
mod config;
pub mod demangle;
mod output;
pub mod platform;
mod render;
mod utils;

pub use capture::{Capture, StackTrace, MAX_FRAMES};
pub use config::{config, Config, Strategy, STRATEGY_ENV};
pub use demangle::{demangle_symbols, Demangle, Itanium};
pub use platform::{Resolve, ResolveAll};
pub use render::{Disabled, Fallback, Rendered, Renderer, SymbolizationOutcome, Symbolizer, TraceLine};
pub use utils::Address;

/// A result type that wraps [Error].
pub type Result<T> = std::result::Result<T, Error>;

/// Error definition.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The symbol resolver produced nothing. Carries the OS error text.
    #[error("{0}")]
    Resolution(String),

    #[error("{0}")]
    Alloc(#[from] TryReserveError),

    #[error("unknown strategy: {0:?}")]
    UnknownStrategy(String),

    #[error("{0}")]
    Io(#[from] io::Error),
}
