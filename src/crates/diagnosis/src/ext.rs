//! Annotating `Result` values in place
//!
//! ```rust
//! use diagnosis::{cause, Failure, ResultExt};
//!
//! fn flush() -> Result<(), std::io::Error> {
//!     Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full"))
//! }
//!
//! fn commit() -> Result<(), Failure> {
//!     flush().annotate("flush failed")?;
//!     Ok(())
//! }
//!
//! let err = commit().annotate("commit failed").unwrap_err();
//! assert_eq!(err.to_string(), "commit failed");
//! assert_eq!(cause(&err).map(|c| c.to_string()).as_deref(), Some("disk full"));
//! ```

use std::error::Error as StdError;

use crate::failure::Failure;
use crate::ops;

/// Adds annotation layers to the error of a `Result`.
pub trait ResultExt<T> {
    /// Wrap the error, if any, with `annotation`.
    fn annotate<A>(self, annotation: A) -> Result<T, Failure>
    where
        A: Into<Failure>;

    /// Like [`ResultExt::annotate`], building the annotation only on error.
    fn annotate_with<A, F>(self, annotation: F) -> Result<T, Failure>
    where
        A: Into<Failure>,
        F: FnOnce() -> A;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: StdError + Send + Sync + 'static,
{
    fn annotate<A>(self, annotation: A) -> Result<T, Failure>
    where
        A: Into<Failure>,
    {
        self.map_err(|error| Failure::Diagnosed(ops::wrap(Failure::new(error), annotation)))
    }

    fn annotate_with<A, F>(self, annotation: F) -> Result<T, Failure>
    where
        A: Into<Failure>,
        F: FnOnce() -> A,
    {
        self.map_err(|error| Failure::Diagnosed(ops::wrap(Failure::new(error), annotation())))
    }
}
