pub mod runner;

pub use runner::{run_engine, EngineError, EngineReport};
