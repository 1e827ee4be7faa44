//! Value model for jsoncalc expressions
//!
//! This crate provides the JSON-like [`Value`] type that expressions resolve
//! to, together with the explicit coercion table ([`coercion`]) that defines
//! truthiness, numeric conversion, display conversion and equality. Every
//! other crate in the workspace goes through this table instead of inventing
//! its own conversions.

#![warn(missing_docs)]

pub mod coercion;
mod value;

pub use value::{Map, Value};
