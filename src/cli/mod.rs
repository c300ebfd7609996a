//! Command implementations behind the `streams` binary.

pub mod call;
pub mod favorites;
pub mod output;
pub mod session;
