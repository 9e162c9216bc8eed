//! Stage timings and task counters exposed for an external overlay.

pub mod profiler;
