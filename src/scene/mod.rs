//! Seams to the black-box scene runtime.

pub mod runtime;
