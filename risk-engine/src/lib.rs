//! Risk Engine for fraud screening
//!
//! Rule-based fraud risk assessment for card and account transactions

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod lenient;
pub mod noise;
pub mod scoring;
pub mod types;

pub use noise::{FixedNoise, NoiseSource, ThreadRngNoise};
pub use scoring::RiskScorer;
pub use types::*;
