pub mod aggregator;
pub mod cli;
pub mod config;
pub mod engine;
pub mod event;
pub mod publish;
pub mod transport;
