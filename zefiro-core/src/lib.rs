pub mod codec;
pub mod error;
pub mod qos;
pub mod reason;

/// A specialized `Result` type for zefiro operations
///
/// This is defined as a convenience
pub type Result<T> = std::result::Result<T, crate::error::Error>;
