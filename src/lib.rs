pub mod cli;
pub mod collectors;
pub mod derived;
pub mod error;
pub mod extract;
pub mod metrics;
pub mod sampler;
pub mod session;
pub mod sink;
