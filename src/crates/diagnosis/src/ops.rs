//! Free functions over any error-like value
//!
//! These accept a [`Failure`] whether or not it carries the [`Diagnosis`]
//! capability. Diagnoses are delegated to; plain errors are treated as a single
//! layer that is already fully unwrapped.

use std::borrow::Cow;
use std::sync::Arc;

use crate::diagnosis::{Diagnosed, Diagnosis, DiagnosisRef};
use crate::failure::Failure;

/// A diagnosis for `error`.
///
/// A value that already is a diagnosis is returned unaltered, the same `Arc`
/// and not a copy. Anything else becomes a single-layer [`Diagnosed`].
pub fn new(error: impl Into<Failure>) -> DiagnosisRef {
    match error.into() {
        Failure::Diagnosed(diagnosis) => diagnosis,
        plain @ Failure::Plain(_) => {
            #[cfg(feature = "tracing")]
            tracing::trace!(error = %plain, "lifting plain error into diagnosis");
            Arc::new(Diagnosed::new(plain)) as DiagnosisRef
        }
    }
}

/// The initially identified cause of `error`.
///
/// For a diagnosis this is its oldest layer, for anything else the error
/// itself.
pub fn cause(error: &Failure) -> Option<Failure> {
    match error {
        Failure::Diagnosed(diagnosis) => diagnosis.root_cause(),
        Failure::Plain(_) => Some(error.clone()),
    }
}

/// Add `annotation` to `error`, returning a diagnosis.
pub fn wrap(error: impl Into<Failure>, annotation: impl Into<Failure>) -> DiagnosisRef {
    new(error).wrap(annotation.into())
}

/// The remaining diagnosis and the most recent annotation of `error`.
///
/// A plain error yields no diagnosis and itself.
pub fn unwrap(error: &Failure) -> (Option<DiagnosisRef>, Option<Failure>) {
    match error {
        Failure::Diagnosed(diagnosis) => diagnosis.unwrap_layer(),
        Failure::Plain(_) => (None, Some(error.clone())),
    }
}

/// Every layer of `error` in order of annotation, oldest first.
///
/// Diagnoses offering [`crate::AllUnwrapper`] are borrowed without copying.
/// Other diagnoses are peeled one layer at a time; a peel step that yields no
/// layer adds nothing to the list. A plain error is returned as a single
/// element and an absent one as an empty list.
pub fn unwrap_all<'a>(error: impl Into<Option<&'a Failure>>) -> Cow<'a, [Failure]> {
    let error: Option<&'a Failure> = error.into();
    let Some(error) = error else {
        return Cow::Borrowed(&[]);
    };

    match error {
        Failure::Diagnosed(diagnosis) => match diagnosis.as_all_unwrapper() {
            Some(all) => Cow::Borrowed(all.unwrap_all()),
            None => Cow::Owned(peel(Arc::clone(diagnosis))),
        },
        Failure::Plain(_) => Cow::Owned(vec![error.clone()]),
    }
}

fn peel(diagnosis: DiagnosisRef) -> Vec<Failure> {
    #[cfg(feature = "tracing")]
    tracing::debug!(error = %diagnosis, "no bulk access, peeling diagnosis layer by layer");

    let mut layers = Vec::new();
    let mut current = Some(diagnosis);
    while let Some(diagnosis) = current {
        let (rest, layer) = diagnosis.unwrap_layer();
        layers.extend(layer);
        current = rest;
    }

    // peeled newest first
    layers.reverse();
    layers
}
