//! Integration tests for layering, peeling and flattening
//!
//! These exercise the public surface the way a downstream crate would,
//! including a diagnosis implemented outside this crate.

use diagnosis::{
    cause, new, unwrap, unwrap_all, wrap, AllUnwrapper, Diagnosed, Diagnosis, DiagnosisRef,
    Failure, Message, ResultExt,
};
use std::fmt;
use std::sync::Arc;
use std::thread;

fn messages(layers: &[Failure]) -> Vec<String> {
    layers.iter().map(ToString::to_string).collect()
}

fn message_of(failure: Option<Failure>) -> Option<String> {
    failure.map(|failure| failure.to_string())
}

/// A diagnosis that only implements the required capability: a linked list
/// with no bulk access to its layers.
#[derive(Debug)]
struct Chain {
    parent: Option<DiagnosisRef>,
    layer: Failure,
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.layer, f)
    }
}

impl std::error::Error for Chain {}

impl Diagnosis for Chain {
    fn root_cause(&self) -> Option<Failure> {
        match &self.parent {
            Some(parent) => parent.root_cause(),
            None => Some(self.layer.clone()),
        }
    }

    fn wrap(&self, annotation: Failure) -> DiagnosisRef {
        let parent: DiagnosisRef = Arc::new(Chain {
            parent: self.parent.clone(),
            layer: self.layer.clone(),
        });
        Arc::new(Chain {
            parent: Some(parent),
            layer: annotation,
        })
    }

    fn unwrap_layer(&self) -> (Option<DiagnosisRef>, Option<Failure>) {
        (self.parent.clone(), Some(self.layer.clone()))
    }
}

fn chain(layers: &[&str]) -> Failure {
    let mut current: Option<DiagnosisRef> = None;
    for layer in layers {
        current = Some(Arc::new(Chain {
            parent: current,
            layer: Failure::msg(*layer),
        }));
    }
    current.map(Failure::from).expect("at least one layer")
}

#[test]
fn test_new_returns_existing_diagnosis_unaltered() {
    let e = Failure::msg("disk full");
    let once = new(e);
    let twice = new(Failure::from(Arc::clone(&once)));
    assert!(Arc::ptr_eq(&once, &twice));
}

#[test]
fn test_cause_of_plain_and_lifted() {
    let e = Failure::new(std::io::Error::new(std::io::ErrorKind::Other, "disk full"));

    assert!(cause(&e).is_some_and(|c| c.ptr_eq(&e)));
    let lifted = Failure::from(new(e.clone()));
    assert!(cause(&lifted).is_some_and(|c| c.ptr_eq(&e)));
}

#[test]
fn test_three_layer_chain() {
    let e0 = Failure::msg("e0");
    let e1 = Failure::msg("e1");
    let e2 = Failure::msg("e2");

    let d = new(e0.clone()).wrap(e1.clone()).wrap(e2.clone());
    assert_eq!(d.to_string(), e2.to_string());
    assert!(d.root_cause().is_some_and(|c| c.ptr_eq(&e0)));

    let d = Failure::from(d);
    let all = unwrap_all(&d);
    assert_eq!(all.len(), 3);
    assert!(all[0].ptr_eq(&e0));
    assert!(all[1].ptr_eq(&e1));
    assert!(all[2].ptr_eq(&e2));
}

#[test]
fn test_peeling_three_layers() {
    let d = Failure::from(wrap(wrap("e0", "e1"), "e2"));

    let (rest, layer) = unwrap(&d);
    assert_eq!(message_of(layer).as_deref(), Some("e2"));
    let rest = Failure::from(rest.expect("two layers remain"));
    assert_eq!(messages(&unwrap_all(&rest)), vec!["e0", "e1"]);

    let (rest, layer) = unwrap(&rest);
    assert_eq!(message_of(layer).as_deref(), Some("e1"));
    let rest = Failure::from(rest.expect("one layer remains"));
    assert_eq!(messages(&unwrap_all(&rest)), vec!["e0"]);

    let (rest, layer) = unwrap(&rest);
    assert_eq!(message_of(layer).as_deref(), Some("e0"));
    assert!(rest.is_none());
}

#[test]
fn test_free_wrap_matches_method_wrap() {
    let e0 = Failure::msg("e0");
    let e1 = Failure::msg("e1");

    let free = Failure::from(wrap(e0.clone(), e1.clone()));
    let method = Failure::from(new(e0).wrap(e1));

    let free = unwrap_all(&free);
    let method = unwrap_all(&method);
    assert_eq!(free.len(), method.len());
    assert!(free.iter().zip(method.iter()).all(|(a, b)| a.ptr_eq(b)));
}

#[test]
fn test_unwrap_all_absent_and_plain() {
    assert!(unwrap_all(None).is_empty());

    let plain = Failure::new(Message::new("plain"));
    let all = unwrap_all(&plain);
    assert_eq!(all.len(), 1);
    assert!(all[0].ptr_eq(&plain));
}

#[test]
fn test_disk_full_scenario() {
    let e0 = Failure::msg("disk full");
    let e1 = Failure::msg("flush failed");
    let e2 = Failure::msg("commit failed");

    let d = Failure::from(wrap(wrap(e0, e1), e2));
    assert_eq!(d.to_string(), "commit failed");
    assert_eq!(message_of(cause(&d)).as_deref(), Some("disk full"));
    assert_eq!(
        messages(&unwrap_all(&d)),
        vec!["disk full", "flush failed", "commit failed"]
    );
}

#[test]
fn test_sibling_wraps_are_independent() {
    let e0 = Failure::msg("e0");
    let base = new(e0);
    let a = Failure::from(base.wrap(Failure::msg("eA")));
    let b = Failure::from(base.wrap(Failure::msg("eB")));

    assert_eq!(messages(&unwrap_all(&a)), vec!["e0", "eA"]);
    assert_eq!(messages(&unwrap_all(&b)), vec!["e0", "eB"]);
    assert_eq!(messages(&unwrap_all(&Failure::from(base))), vec!["e0"]);
}

#[test]
fn test_wrapping_a_peeled_remainder_keeps_original() {
    let full = Failure::from(wrap(wrap("e0", "e1"), "e2"));
    let (rest, _) = unwrap(&full);
    let rest = rest.expect("two layers remain");

    let branched = Failure::from(rest.wrap(Failure::msg("eX")));
    assert_eq!(messages(&unwrap_all(&full)), vec!["e0", "e1", "e2"]);
    assert_eq!(messages(&unwrap_all(&branched)), vec!["e0", "e1", "eX"]);
}

#[test]
fn test_concurrent_wraps_from_common_ancestor() {
    let base = new(wrap("e0", "e1"));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let base = Arc::clone(&base);
            thread::spawn(move || Failure::from(base.wrap(Failure::msg(format!("branch {i}")))))
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let branch = handle.join().expect("thread completes");
        assert_eq!(
            messages(&unwrap_all(&branch)),
            vec!["e0".to_string(), "e1".to_string(), format!("branch {i}")]
        );
    }
}

#[test]
fn test_custom_diagnosis_falls_back_to_peeling() {
    let custom = chain(&["disk full", "flush failed", "commit failed"]);

    assert!(custom
        .as_diagnosis()
        .is_some_and(|d| d.as_all_unwrapper().is_none()));
    assert_eq!(custom.to_string(), "commit failed");
    assert_eq!(message_of(cause(&custom)).as_deref(), Some("disk full"));
    assert_eq!(
        messages(&unwrap_all(&custom)),
        vec!["disk full", "flush failed", "commit failed"]
    );
}

#[test]
fn test_custom_diagnosis_through_free_functions() {
    let custom = chain(&["disk full"]);

    // already a diagnosis: kept as is, then wrapped by the custom impl
    let wrapped = Failure::from(wrap(custom.clone(), "flush failed"));
    assert_eq!(
        messages(&unwrap_all(&wrapped)),
        vec!["disk full", "flush failed"]
    );

    let (rest, layer) = unwrap(&custom);
    assert!(rest.is_none());
    assert_eq!(message_of(layer).as_deref(), Some("disk full"));
}

#[test]
fn test_builtin_exposes_bulk_access() {
    let d = Diagnosed::new("disk full").annotate("flush failed");
    let all = d
        .as_all_unwrapper()
        .map(|all| messages(all.unwrap_all()))
        .unwrap_or_default();
    assert_eq!(all, vec!["disk full", "flush failed"]);
}

#[test]
fn test_result_annotation_chain() {
    fn flush() -> Result<(), std::io::Error> {
        Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full"))
    }

    fn commit() -> Result<(), Failure> {
        flush().annotate("flush failed")?;
        Ok(())
    }

    let err = commit().annotate("commit failed").unwrap_err();
    assert_eq!(err.to_string(), "commit failed");

    let root = cause(&err).expect("root cause");
    assert_eq!(
        root.downcast_ref::<std::io::Error>().map(|e| e.kind()),
        Some(std::io::ErrorKind::Other)
    );
    assert_eq!(
        messages(&unwrap_all(&err)),
        vec!["disk full", "flush failed", "commit failed"]
    );
}

#[test]
fn test_lifting_shared_diagnosis_keeps_identity() {
    let shared = wrap("disk full", "flush failed");
    let lifted = Failure::new(Arc::clone(&shared));

    assert!(lifted.is_diagnosis());
    assert!(lifted
        .as_diagnosis()
        .is_some_and(|d| Arc::ptr_eq(d, &shared)));
    assert!(Arc::ptr_eq(&new(lifted), &shared));
}

#[test]
fn test_annotating_shared_diagnosis_result() {
    fn flush() -> Result<(), DiagnosisRef> {
        Err(wrap("disk full", "flush failed"))
    }

    let err = flush().annotate("commit failed").unwrap_err();
    assert_eq!(err.to_string(), "commit failed");
    assert_eq!(message_of(cause(&err)).as_deref(), Some("disk full"));
    assert_eq!(
        messages(&unwrap_all(&err)),
        vec!["disk full", "flush failed", "commit failed"]
    );
}

#[test]
fn test_custom_diagnosis_lifted_with_from_diagnosis() {
    let by_value = Chain {
        parent: None,
        layer: Failure::msg("disk full"),
    };
    let lifted = Failure::from_diagnosis(by_value);
    assert!(lifted.is_diagnosis());

    let d = Failure::from(wrap(lifted, "flush failed"));
    assert_eq!(message_of(cause(&d)).as_deref(), Some("disk full"));
    assert_eq!(messages(&unwrap_all(&d)), vec!["disk full", "flush failed"]);
}

#[test]
fn test_peeling_logs_with_subscriber_installed() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("diagnosis=trace")
        .with_test_writer()
        .try_init();

    let custom = chain(&["a", "b"]);
    assert_eq!(messages(&unwrap_all(&custom)), vec!["a", "b"]);
    assert_eq!(new("plain").to_string(), "plain");
}
