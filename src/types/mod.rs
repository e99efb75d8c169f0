pub mod config;
pub mod contribution;
pub mod pod;
pub mod verification;
