//! Device-side collaborators: file existence checks and system properties

mod files;
mod props;

pub use files::{FileProbe, LocalFileProbe, ShellFileProbe};
pub use props::{GetpropSource, PropertySource};
