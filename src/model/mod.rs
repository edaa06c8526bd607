pub mod aggregate;
pub mod label;
pub mod prediction;
pub mod sample;
pub mod thresholds;
