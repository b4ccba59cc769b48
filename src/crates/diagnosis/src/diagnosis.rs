//! The annotation container and its capability traits
//!
//! # Overview
//!
//! A diagnosis is an error together with zero or more annotation layers,
//! ordered oldest first. Index 0 is the original cause and the last index is
//! the most recent annotation, which also decides what the diagnosis displays.
//!
//! - [`Diagnosis`] - the capability every diagnosis offers: cause, wrap, unwrap
//! - [`AllUnwrapper`] - optional bulk access to every layer at once
//! - [`Diagnosed`] - the built-in implementation of both
//!
//! # Storage and aliasing
//!
//! [`Diagnosed`] keeps its layers in reference-counted storage. Peeling a layer
//! with [`Diagnosis::unwrap_layer`] returns a shorter view of the same storage,
//! so it never copies. Appending never writes into storage another value can
//! see: [`Diagnosis::wrap`] copies the visible layers, and the consuming
//! [`Diagnosed::annotate`] only grows the storage in place when it is the sole
//! owner. Two diagnoses wrapped from the same predecessor are therefore always
//! independent of each other.
//!
//! ```rust
//! use diagnosis::{unwrap_all, Diagnosis, Failure};
//!
//! let base = diagnosis::new("disk full");
//! let a: Failure = base.wrap("flush failed".into()).into();
//! let b: Failure = base.wrap("sync failed".into()).into();
//!
//! assert_eq!(unwrap_all(&a)[1].to_string(), "flush failed");
//! assert_eq!(unwrap_all(&b)[1].to_string(), "sync failed");
//! ```

use std::error::Error as StdError;
use std::fmt;
use std::slice;
use std::sync::Arc;

use crate::failure::Failure;

/// Shared handle to any diagnosis.
pub type DiagnosisRef = Arc<dyn Diagnosis>;

/// An error and layered error annotations.
///
/// The error behavior (`Display`, `source`) follows the most recent
/// annotation. Implementers only need the three required methods; the free
/// functions in this crate handle anything else.
pub trait Diagnosis: StdError + Send + Sync + 'static {
    /// The initial error of the diagnosis, `None` when there are no layers.
    fn root_cause(&self) -> Option<Failure>;

    /// A new diagnosis with `annotation` appended as the newest layer.
    ///
    /// `self` is left untouched. Implementations must not let two results
    /// wrapped from the same receiver observe each other's annotation.
    fn wrap(&self, annotation: Failure) -> DiagnosisRef;

    /// The remaining diagnosis and the most recent annotation.
    ///
    /// The remaining diagnosis is `None` once no layers would be left, so a
    /// single-layer diagnosis yields `(None, Some(layer))` and an empty one
    /// `(None, None)`.
    fn unwrap_layer(&self) -> (Option<DiagnosisRef>, Option<Failure>);

    /// Bulk access to the layers, when the implementation supports it.
    fn as_all_unwrapper(&self) -> Option<&dyn AllUnwrapper> {
        None
    }
}

/// Optional capability used by [`crate::unwrap_all`].
pub trait AllUnwrapper {
    /// Every layer in order of annotation, oldest first.
    fn unwrap_all(&self) -> &[Failure];
}

/// The built-in diagnosis.
///
/// Cheap to clone; clones share storage and are never affected by appends on
/// one another.
#[derive(Clone, Default)]
pub struct Diagnosed {
    layers: Arc<Vec<Failure>>,
    len: usize,
}

impl Diagnosed {
    /// A diagnosis holding `error` as its only layer.
    pub fn new(error: impl Into<Failure>) -> Self {
        Self {
            layers: Arc::new(vec![error.into()]),
            len: 1,
        }
    }

    /// Append `annotation` as the newest layer.
    ///
    /// Grows the storage in place when this value owns it alone, otherwise
    /// copies the visible layers first.
    pub fn annotate(mut self, annotation: impl Into<Failure>) -> Self {
        let layers = Arc::make_mut(&mut self.layers);
        layers.truncate(self.len);
        layers.push(annotation.into());
        self.len = layers.len();
        self
    }

    /// Visible layers, oldest first.
    pub fn layers(&self) -> &[Failure] {
        &self.layers[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Layers in order of annotation.
    pub fn iter(&self) -> slice::Iter<'_, Failure> {
        self.layers().iter()
    }

    /// The most recent annotation.
    pub fn latest(&self) -> Option<&Failure> {
        self.layers().last()
    }

    fn prefix(&self, len: usize) -> Self {
        Self {
            layers: Arc::clone(&self.layers),
            len,
        }
    }
}

impl Diagnosis for Diagnosed {
    fn root_cause(&self) -> Option<Failure> {
        self.layers().first().cloned()
    }

    fn wrap(&self, annotation: Failure) -> DiagnosisRef {
        let mut layers = Vec::with_capacity(self.len + 1);
        layers.extend_from_slice(self.layers());
        layers.push(annotation);
        let len = layers.len();

        Arc::new(Diagnosed {
            layers: Arc::new(layers),
            len,
        })
    }

    fn unwrap_layer(&self) -> (Option<DiagnosisRef>, Option<Failure>) {
        match self.layers() {
            [] => (None, None),
            [only] => (None, Some(only.clone())),
            [.., last] => {
                let rest: DiagnosisRef = Arc::new(self.prefix(self.len - 1));
                (Some(rest), Some(last.clone()))
            }
        }
    }

    fn as_all_unwrapper(&self) -> Option<&dyn AllUnwrapper> {
        Some(self)
    }
}

impl AllUnwrapper for Diagnosed {
    fn unwrap_all(&self) -> &[Failure] {
        self.layers()
    }
}

impl fmt::Display for Diagnosed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.latest() {
            Some(latest) => fmt::Display::fmt(latest, f),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for Diagnosed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Diagnosed")
            .field("layers", &self.layers())
            .finish()
    }
}

impl StdError for Diagnosed {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.latest().and_then(|latest| latest.source())
    }
}

impl FromIterator<Failure> for Diagnosed {
    fn from_iter<I: IntoIterator<Item = Failure>>(iter: I) -> Self {
        let layers: Vec<Failure> = iter.into_iter().collect();
        let len = layers.len();
        Self {
            layers: Arc::new(layers),
            len,
        }
    }
}

impl<'a> IntoIterator for &'a Diagnosed {
    type Item = &'a Failure;
    type IntoIter = slice::Iter<'a, Failure>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
