//! Display wrapper types for formatting different contexts.
//!
//! Domain models implement [`std::fmt::Display`] directly (see [`models`]);
//! the wrappers here format collections, operation feedback and whole
//! screens. All output is markdown, which the CLI renders with colors or
//! prints as-is.
//!
//! - [`History`]: archived plans, newest first
//! - [`LocalDateTime`]: timestamps in the system timezone
//! - [`OperationStatus`]: success/failure messages
//! - [`ScreenView`]: the session's current screen

pub mod collections;
pub mod datetime;
pub mod models;
pub mod screen;
pub mod status;

pub use collections::History;
pub use datetime::LocalDateTime;
pub use screen::ScreenView;
pub use status::OperationStatus;
