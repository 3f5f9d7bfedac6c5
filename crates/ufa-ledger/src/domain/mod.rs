//! # Domain Layer (Inner Hexagon)
//!
//! Typed agreement and invoice records plus the validation engine.
//! NO I/O: rules that depend on stored state receive it as plain values.

pub mod entities;
pub mod invariants;
pub mod value_objects;

pub use entities::*;
pub use invariants::*;
pub use value_objects::*;
