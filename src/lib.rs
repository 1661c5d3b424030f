// Library for the agent and check binaries, and for tests

pub mod checks;
pub mod client;
pub mod collector;
pub mod config;
pub mod counters;
pub mod error;
pub mod models;
pub mod peers;
pub mod routes;
pub mod sampler;
pub mod verdict;
pub mod version;
