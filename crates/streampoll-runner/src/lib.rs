#![forbid(unsafe_code)]

//! Concurrent probe fan-out: one external probe process per stream, with
//! outcomes aggregated in completion order.

pub mod batch;
pub mod probe;

pub use batch::{run_batch, BatchOptions};
pub use probe::{ProbeCommand, ProbeError};
