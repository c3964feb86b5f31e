//! `dectest`: a conformance harness for decimal arithmetic engines.
//!
//! Reads test-vector scripts line by line, keeps a session of precision and
//! rounding directives, evaluates each test through a [`DecimalEngine`] and
//! compares the canonical string of the result with the oracle.
//!
//! # Example
//!
//! ```
//! use dectest::{BigDecimalEngine, Dialect, Harness};
//! use std::io::Cursor;
//!
//! let mut harness = Harness::new(BigDecimalEngine::default(), Dialect::Fixed, 34);
//! harness
//!     .run_reader("inline", Cursor::new("precision: 9\nt1 add '1' '2' -> '3'\n"))
//!     .unwrap();
//! assert_eq!(harness.counters().succeeded, 1);
//! ```

pub mod cli;
pub mod config;
pub mod dialect;
pub mod dispatch;
pub mod engine;
pub mod error;
pub mod evaluator;
pub mod format;
pub mod logging;
pub mod model;
pub mod runner;
pub mod script;
pub mod session;
pub mod util;

pub use dialect::Dialect;
pub use engine::{BigDecimalEngine, Context, DecimalEngine, EngineError};
pub use error::{ErrorCode, HarnessError, Result, StructuredError};
pub use format::Report;
pub use model::{RoundingMode, RunCounters};
pub use runner::Harness;
pub use session::Session;
