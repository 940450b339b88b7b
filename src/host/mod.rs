//! Host integration: versioned request/response envelopes and the stdio bridge.

pub mod contract;
pub mod stdio;
