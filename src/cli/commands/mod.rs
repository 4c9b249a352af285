//! CLI command implementations

pub mod config;
pub mod path;
pub mod status;

pub use config::execute as config;
pub use path::execute as path;
pub use status::execute as status;
