//! Domain layer: pure booking logic with no I/O.
//!
//! Everything here is synchronous and deterministic. External collaborators
//! (reply generation, persistence, notifications) live behind ports.

pub mod booking;
pub mod extraction;
pub mod qualification;
