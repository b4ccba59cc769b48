//! # diagnosis - Layered error annotation
//!
//! Wrap an underlying failure with successive context layers while keeping
//! the original cause recoverable, the full chain inspectable, and each layer
//! removable one at a time. Callers never have to parse message strings to get
//! back to the root cause.
//!
//! ## Core Concepts
//!
//! - [`Failure`] - any error-like value, either plain or a diagnosis
//! - [`Diagnosis`] - the capability trait: cause, wrap, unwrap
//! - [`AllUnwrapper`] - optional bulk access to every layer
//! - [`Diagnosed`] - the built-in diagnosis
//!
//! The free functions [`new`], [`cause`], [`wrap`], [`unwrap`] and
//! [`unwrap_all`] accept any [`Failure`] and dispatch on whether it already is
//! a diagnosis. [`ResultExt`] brings the same layering to `Result`.
//!
//! Errors from any source are lifted with [`Failure::new`], which keeps an
//! existing [`Failure`], [`Diagnosed`] or [`DiagnosisRef`] as a diagnosis. A
//! [`Diagnosis`] implemented outside this crate cannot be recognized from a
//! bare error type; lift it with [`Failure::from_diagnosis`] so it keeps its
//! layers:
//!
//! ```rust
//! use diagnosis::{cause, wrap, Diagnosed, Diagnosis, DiagnosisRef, Failure};
//!
//! #[derive(Debug)]
//! struct Lookup(Failure);
//!
//! impl std::fmt::Display for Lookup {
//!     fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
//!         std::fmt::Display::fmt(&self.0, f)
//!     }
//! }
//!
//! impl std::error::Error for Lookup {}
//!
//! impl Diagnosis for Lookup {
//!     fn root_cause(&self) -> Option<Failure> {
//!         Some(self.0.clone())
//!     }
//!
//!     fn wrap(&self, annotation: Failure) -> DiagnosisRef {
//!         Diagnosed::new(self.0.clone()).wrap(annotation)
//!     }
//!
//!     fn unwrap_layer(&self) -> (Option<DiagnosisRef>, Option<Failure>) {
//!         (None, Some(self.0.clone()))
//!     }
//! }
//!
//! let lookup = Failure::from_diagnosis(Lookup(Failure::msg("key not found")));
//! assert!(lookup.is_diagnosis());
//!
//! let d = Failure::from(wrap(lookup, "load failed"));
//! assert_eq!(cause(&d).map(|c| c.to_string()).as_deref(), Some("key not found"));
//! ```
//!
//! A diagnosis displays its most recent annotation. Layers are kept in order
//! of annotation: the first is the original cause, the last the newest.
//!
//! ## Quick Start
//!
//! ```rust
//! use diagnosis::{cause, unwrap_all, wrap, Failure};
//!
//! let d = wrap(wrap("disk full", "flush failed"), "commit failed");
//! assert_eq!(d.to_string(), "commit failed");
//!
//! let d = Failure::from(d);
//! assert_eq!(cause(&d).map(|c| c.to_string()).as_deref(), Some("disk full"));
//!
//! let layers: Vec<String> = unwrap_all(&d).iter().map(|l| l.to_string()).collect();
//! assert_eq!(layers, ["disk full", "flush failed", "commit failed"]);
//! ```
//!
//! ## Peeling Layers
//!
//! ```rust
//! use diagnosis::{unwrap, Failure};
//!
//! let d = Failure::from(diagnosis::wrap("disk full", "flush failed"));
//!
//! let (rest, newest) = unwrap(&d);
//! assert_eq!(newest.map(|e| e.to_string()).as_deref(), Some("flush failed"));
//!
//! // one layer left: the remaining diagnosis collapses to `None`
//! let (rest, oldest) = unwrap(&Failure::from(rest.unwrap()));
//! assert!(rest.is_none());
//! assert_eq!(oldest.map(|e| e.to_string()).as_deref(), Some("disk full"));
//! ```
//!
//! ## Sharing
//!
//! Wrapping never mutates storage visible to another value, so two diagnoses
//! wrapped from one predecessor are independent and may be built from
//! different threads. A single value offers no interior mutability and needs no
//! locking. See [`diagnosis`](mod@crate::diagnosis) for the storage model.
//!
//! ## Features
//!
//! - `tracing` - emit `trace`/`debug` events from the free functions (enabled
//!   by default)

pub mod diagnosis;
pub mod ext;
pub mod failure;
pub mod ops;

pub use diagnosis::{AllUnwrapper, Diagnosed, Diagnosis, DiagnosisRef};
pub use ext::ResultExt;
pub use failure::{DynError, Failure, Message};
pub use ops::{cause, new, unwrap, unwrap_all, wrap};
