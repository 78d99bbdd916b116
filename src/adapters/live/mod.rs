//! Live adapters for real external interactions.

pub mod clock;
pub mod filesystem;
pub mod host;
pub mod process;

pub use clock::LiveClock;
pub use filesystem::LiveFileSystem;
pub use host::LiveTaskHost;
pub use process::LiveProcessRunner;
