pub mod audit;
pub mod build;
