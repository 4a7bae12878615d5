//! Timers backing [`delay`], [`timeout`] and the retry interval.
//!
//! Exactly one backend is compiled in. The `"tokio"` feature takes precedence when both runtime
//! features are enabled.
//!
//! [`timeout`]: crate::timeout()

#[cfg(all(feature = "async-std", not(feature = "tokio")))]
pub mod async_std;
#[cfg(all(feature = "async-std", not(feature = "tokio")))]
pub use self::async_std::*;
#[cfg(feature = "tokio")]
pub mod tokio;
#[cfg(feature = "tokio")]
pub use self::tokio::*;

#[cfg(not(any(feature = "tokio", feature = "async-std")))]
compile_error!("async_flow needs a timer: enable either the \"tokio\" or the \"async-std\" feature");
