//! Logging boundary.
//!
//! All crate events go through `tracing` under a single target so hosts can
//! filter them with one directive (`filtra=debug`). The library never installs
//! a subscriber.

/// Single logging target for filtra.
pub(crate) const LOG_TARGET: &str = "filtra";
