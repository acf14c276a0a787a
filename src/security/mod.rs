//! Security validators: path containment and command allowlisting.

pub mod command;
pub mod path;
pub mod patterns;

pub use command::{CommandValidation, CommandValidator};
pub use path::{FileOperation, PathValidation, PathValidator};
pub use patterns::DangerousPattern;
