pub mod config;
pub mod cost;
pub mod error;
pub mod executor;
pub mod output;
pub mod planner;
pub mod registry;
pub mod state;
