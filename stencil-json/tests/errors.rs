use std::sync::mpsc::Sender;

use stencil_core::{ShapeKind, UnsupportedKind, opaque, record};
use stencil_json::{CompileError, CompileErrorKind, Config, Encoder};
use stencil_testhelpers::test;

record! {
    struct WithCallback {
        name: String => "name",
        callback: fn(i32) -> i32 => "callback",
    }
}

record! {
    struct Inner {
        ok: u8 => "ok",
        events: Vec<Sender<u32>> => "events",
    }
}

record! {
    struct Outer {
        id: u64 => "id",
        inner: Option<Inner> => "inner",
    }
}

record! {
    struct Untagged {
        visible: u8 => "visible",
        pointer: *const u8,
    }
}

/// A value with no JSON capability at all.
struct Blob;

opaque!(Blob);

record! {
    struct HasBlob {
        blob: Blob => "blob",
    }
}

fn double(x: i32) -> i32 {
    x * 2
}

#[test]
fn unsupported_field_names_the_field() {
    let err = Encoder::<WithCallback>::record(Config::default()).unwrap_err();
    assert_eq!(err.path, ["callback"]);
    assert!(matches!(
        err.kind,
        CompileErrorKind::Unsupported {
            kind: ShapeKind::Unsupported(UnsupportedKind::Function),
            ..
        }
    ));
    let message = err.to_string();
    assert!(message.starts_with("unsupported type `fn(i32) -> i32` (function)"));
    assert!(message.ends_with("at `callback`"));

    // A valid value of the type exists; it just cannot be encoded.
    let _ = WithCallback {
        name: String::new(),
        callback: double,
    };
}

#[test]
fn nested_failures_carry_the_full_path() {
    let err = Encoder::<Outer>::record(Config::default()).unwrap_err();
    assert_eq!(err.path, ["inner", "events"]);
    assert!(matches!(
        err.kind,
        CompileErrorKind::Unsupported {
            kind: ShapeKind::Unsupported(UnsupportedKind::Channel),
            ..
        }
    ));
}

#[test]
fn compile_failures_are_deterministic() {
    let first: CompileError = Encoder::<Outer>::record(Config::default()).unwrap_err();
    let second: CompileError = Encoder::<Outer>::record(Config::default()).unwrap_err();
    assert_eq!(first, second);
    assert_eq!(first.to_string(), second.to_string());
}

#[test]
fn untagged_fields_are_never_inspected() {
    let encoder = Encoder::<Untagged>::record(Config::default())?;
    let value = Untagged {
        visible: 1,
        pointer: core::ptr::null(),
    };
    assert_eq!(encoder.to_string(&value)?, r#"{"visible":1}"#);
}

#[test]
fn opaque_types_need_a_capability() {
    let err = Encoder::<HasBlob>::record(Config::default()).unwrap_err();
    assert_eq!(err.path, ["blob"]);
    assert!(matches!(
        err.kind,
        CompileErrorKind::Unsupported {
            kind: ShapeKind::Opaque,
            ..
        }
    ));
}

#[test]
fn unsupported_elements_fail_at_the_root() {
    let err = Encoder::<Vec<*mut u8>>::sequence(Config::default()).unwrap_err();
    assert!(err.path.is_empty());
    assert!(matches!(
        err.kind,
        CompileErrorKind::Unsupported {
            kind: ShapeKind::Unsupported(UnsupportedKind::RawPointer),
            ..
        }
    ));
}

#[test]
fn root_kind_must_match_the_constructor() {
    let err = Encoder::<u32>::record(Config::default()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "expected a record, but `u32` is a scalar"
    );
}
