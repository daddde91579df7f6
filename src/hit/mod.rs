//! Screen-space pointer resolution against the live render tree.

pub(crate) mod tester;
