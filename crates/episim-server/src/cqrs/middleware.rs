//! Marker traits distinguishing writes from reads
//!
//! Every command and query type in the feature slices tags itself with one
//! of these traits; cross-cutting concerns (logging, future authorization)
//! key off the distinction.

/// Marker for state-changing requests
pub trait Command {}

/// Marker for read-only requests
pub trait Query {}
