#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! Shared models, probe-output evaluation, and input parsing for streampoll.

pub mod input;
pub mod model;
pub mod validate;
