//! # Dialogue Pool
//!
//! The data model of the dialogue graph: every node, choice and flag reference
//! of a compiled script lives in one fixed-capacity, index-addressed pool.
//! This crate holds no parsing or interpreter logic; it is the single source of
//! truth that the engine in `dialogue_core` reads from.
//!
//! ## Core Components
//!
//! - **pool**: Nodes, choices, flag-reference slices and the id -> slot index
//! - **flags**: The 1024-bit runtime flag store
//! - **limits**: Capacity ceilings for the pools

pub mod error;
pub mod flags;
pub mod limits;
pub mod pool;

pub use error::*;
pub use flags::*;
pub use limits::*;
pub use pool::*;
