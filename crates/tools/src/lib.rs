//! Side-effecting primitives behind directive execution.
//!
//! [`FileWriter`] applies file directives and [`ShellRunner`] runs command
//! directives. Neither restricts what the model may touch.

pub mod file_write;
pub mod shell;

pub use file_write::FileWriter;
pub use shell::{CommandOutput, ShellRunner};
