pub mod analysis;
pub mod clock;
pub mod config;
pub mod contribution;
pub mod error;
pub mod matching;
pub mod report;
pub mod types;
pub mod verification;

pub use error::{PodTrustError, Result};
