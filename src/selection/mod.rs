//! Optimistic/authoritative selection rectangle reconciliation.

pub(crate) mod reconciler;
