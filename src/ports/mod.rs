//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the step logic and an external
//! system (pipeline host, child processes, filesystem, clock).
//! Implementations live in `src/adapters/`.

pub mod clock;
pub mod filesystem;
pub mod host;
pub mod process;

pub use clock::Clock;
pub use filesystem::FileSystem;
pub use host::{AttachmentKind, Platform, TaskHost, TaskResult};
pub use process::{ExecOptions, ProcessRunner};
