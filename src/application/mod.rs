// Application layer - Use cases driving the simulation
pub mod dashboard_service;
pub mod random_source;
pub mod sample_source;
pub mod signal_generator;
pub mod simulation_service;
pub mod status_evaluator;
pub mod ticker;
