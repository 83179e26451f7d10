pub mod scoring;
pub mod search;
