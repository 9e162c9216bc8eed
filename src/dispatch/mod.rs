//! Per-core work distribution: the barrier dispatcher and partitioned scratch lists.

pub mod dispatcher;
pub mod partition;
