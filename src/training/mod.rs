pub mod config;
pub mod driver;

pub use config::TrainingConfig;
pub use driver::run_training;
