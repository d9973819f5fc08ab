pub mod health;
pub mod processing;
pub mod progress;
