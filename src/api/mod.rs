pub mod format;
pub mod handlers;

pub use handlers::configure;
