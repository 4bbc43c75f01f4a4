//! Image processing pipeline components.
//!
//! This module contains all the stages of a GraphicsMagick invocation:
//! - **arguments**: Ordered argument list for the tool
//! - **translate**: One validation/translation step per transformation family
//! - **assemble**: Runs the translation steps in their fixed order
//! - **workspace**: Per-request scratch directory with the source file
//! - **command**: Launches `gm` and enforces the timeout
//! - **processor**: Orchestrates the full pipeline and reads the result back

pub mod arguments;
pub mod assemble;
pub mod command;
pub mod processor;
pub mod translate;
pub mod workspace;

// Re-exports for convenient access
pub use arguments::Arguments;
pub use assemble::{build_arguments, CommandPlan};
pub use command::CommandRunner;
pub use processor::ImageProcessor;
pub use workspace::Workspace;
