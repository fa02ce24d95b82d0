//! # Dialogue Core
//!
//! The dialogue graph engine. It compiles a CSV-authored branching script into
//! the pools of `dialogue_pool` and walks the resulting graph under
//! flag-gated preconditions, calling back into an external presenter.
//!
//! ## Core Components
//!
//! - **compiler**: CSV rows -> nodes, choices and flag references
//! - **runner**: The interpreter (step, choose, jump) and its presenter/gate boundaries
//! - **validation**: Optional post-compile reference checks
//! - **snapshot**: Save/load state of a play session
//! - **backlog**: Bounded history of entered lines
//!
//! ## Design Philosophy
//!
//! - **Arena-Based**: Pools are rebuilt wholesale on reload, never patched
//! - **Fail-Soft Content**: Malformed fields and dangling references degrade silently; only capacity overflow is fatal
//! - **Presentation-Agnostic**: The core never renders, animates or touches the disk

pub mod backlog;
pub mod compiler;
pub mod config;
pub mod error;
pub mod runner;
pub mod snapshot;
pub mod validation;

pub use backlog::*;
pub use compiler::{compile, ScriptCompiler};
pub use config::*;
pub use error::*;
pub use runner::*;
pub use snapshot::*;
pub use validation::*;

pub use dialogue_pool;
