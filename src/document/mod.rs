pub mod filters;
pub mod parser;
