//! Hand-written test doubles.

pub mod source;
