//! Scene compilation: content-hash fingerprinting, the durable module cache,
//! and the single-flight compiler driving the service round-trips.

pub(crate) mod cache;
pub(crate) mod compiler;
pub(crate) mod fingerprint;
pub(crate) mod single_flight;
