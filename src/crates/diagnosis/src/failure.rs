//! Error-like values accepted and returned by the annotation API
//!
//! A [`Failure`] is either a plain error or something that carries the
//! [`Diagnosis`] capability. Keeping the two apart as enum variants is what lets
//! the free functions in [`crate::ops`] decide, without guessing, whether a
//! value already holds annotation layers.
//!
//! ```rust
//! use diagnosis::Failure;
//!
//! let io = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
//! let failure = Failure::new(io);
//!
//! assert!(!failure.is_diagnosis());
//! assert_eq!(failure.to_string(), "disk full");
//! assert!(failure.downcast_ref::<std::io::Error>().is_some());
//! ```

use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use crate::diagnosis::{Diagnosed, Diagnosis, DiagnosisRef};

/// Shared handle to a plain error.
pub type DynError = dyn StdError + Send + Sync + 'static;

/// A plain error built from a string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct Message(String);

impl Message {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// An error-like value: a plain error or a diagnosis.
///
/// Cloning is cheap and keeps identity, see [`Failure::ptr_eq`].
#[derive(Clone)]
pub enum Failure {
    /// Any error without annotation layers
    Plain(Arc<DynError>),
    /// A value with the [`Diagnosis`] capability
    Diagnosed(DiagnosisRef),
}

impl Failure {
    /// Lift an error into a `Failure`.
    ///
    /// A `Failure` passed in is returned as is. A [`Diagnosed`] or a
    /// [`DiagnosisRef`] becomes [`Failure::Diagnosed`], the latter keeping its
    /// allocation. Everything else is stored as [`Failure::Plain`]. Other
    /// [`Diagnosis`] implementers passed by value cannot be recognized from a
    /// bare error type and end up plain; lift them with
    /// [`Failure::from_diagnosis`] instead.
    pub fn new<E>(error: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        let boxed: Box<DynError> = Box::new(error);

        let boxed = match boxed.downcast::<Failure>() {
            Ok(failure) => return *failure,
            Err(boxed) => boxed,
        };
        let boxed = match boxed.downcast::<DiagnosisRef>() {
            Ok(diagnosis) => return Failure::Diagnosed(*diagnosis),
            Err(boxed) => boxed,
        };
        match boxed.downcast::<Diagnosed>() {
            Ok(diagnosed) => Failure::Diagnosed(Arc::new(*diagnosed)),
            Err(boxed) => Failure::Plain(Arc::from(boxed)),
        }
    }

    /// A plain failure carrying only a message.
    pub fn msg(text: impl Into<String>) -> Self {
        Failure::Plain(Arc::new(Message::new(text)))
    }

    /// Lift any [`Diagnosis`] implementer.
    pub fn from_diagnosis<D: Diagnosis>(diagnosis: D) -> Self {
        Failure::Diagnosed(Arc::new(diagnosis))
    }

    pub fn is_diagnosis(&self) -> bool {
        matches!(self, Failure::Diagnosed(_))
    }

    /// The diagnosis behind this value, if it has the capability.
    pub fn as_diagnosis(&self) -> Option<&DiagnosisRef> {
        match self {
            Failure::Diagnosed(diagnosis) => Some(diagnosis),
            Failure::Plain(_) => None,
        }
    }

    /// Recover the concrete type of a plain error.
    ///
    /// Diagnoses are never downcast; peel them with [`crate::cause`] or
    /// [`crate::unwrap_all`] first.
    pub fn downcast_ref<E: StdError + 'static>(&self) -> Option<&E> {
        match self {
            Failure::Plain(error) => error.downcast_ref::<E>(),
            Failure::Diagnosed(_) => None,
        }
    }

    /// True when both values share one allocation.
    pub fn ptr_eq(&self, other: &Failure) -> bool {
        match (self, other) {
            (Failure::Plain(a), Failure::Plain(b)) => Arc::ptr_eq(a, b),
            (Failure::Diagnosed(a), Failure::Diagnosed(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Failure::Plain(error) => fmt::Display::fmt(error, f),
            Failure::Diagnosed(diagnosis) => fmt::Display::fmt(diagnosis, f),
        }
    }
}

impl fmt::Debug for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Failure::Plain(error) => fmt::Debug::fmt(error, f),
            Failure::Diagnosed(diagnosis) => fmt::Debug::fmt(diagnosis, f),
        }
    }
}

impl StdError for Failure {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Failure::Plain(error) => error.source(),
            Failure::Diagnosed(diagnosis) => diagnosis.source(),
        }
    }
}

impl From<&str> for Failure {
    fn from(text: &str) -> Self {
        Failure::msg(text)
    }
}

impl From<String> for Failure {
    fn from(text: String) -> Self {
        Failure::msg(text)
    }
}

impl From<Message> for Failure {
    fn from(message: Message) -> Self {
        Failure::Plain(Arc::new(message))
    }
}

impl From<Diagnosed> for Failure {
    fn from(diagnosed: Diagnosed) -> Self {
        Failure::Diagnosed(Arc::new(diagnosed))
    }
}

impl From<DiagnosisRef> for Failure {
    fn from(diagnosis: DiagnosisRef) -> Self {
        Failure::Diagnosed(diagnosis)
    }
}

impl From<Box<DynError>> for Failure {
    fn from(error: Box<DynError>) -> Self {
        Failure::Plain(Arc::from(error))
    }
}
