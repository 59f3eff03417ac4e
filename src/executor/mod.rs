pub mod audit;
pub mod simulator;
