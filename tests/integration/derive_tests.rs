//! The `Details` derive.

use serde::Serialize;
use wari::{Details, Handlers, TaggedResultExt};

#[derive(Serialize, Details)]
struct NotFound {
    resource: String,
}

#[derive(Serialize, Details)]
#[details(tag = "http.timeout")]
struct Timeout {
    after_ms: u64,
}

#[derive(Serialize, Details)]
struct Interrupted;

#[derive(Serialize, Details)]
struct Limits(u32, u32);

#[derive(Serialize, Details)]
enum Storage {
    Full { free: u64 },
    ReadOnly,
}

#[test]
fn test_tag_defaults_to_type_name() {
    assert_eq!(NotFound::TAG, "NotFound");
    assert_eq!(Interrupted::TAG, "Interrupted");
    assert_eq!(Limits::TAG, "Limits");
    assert_eq!(Storage::TAG, "Storage");
}

#[test]
fn test_explicit_tag() {
    assert_eq!(Timeout::TAG, "http.timeout");
    let err = wari::make(Timeout { after_ms: 30 });
    assert_eq!(err.message(), r#"http.timeout: {"after_ms":30}"#);
}

#[test]
fn test_payload_shapes() {
    assert_eq!(wari::make(Interrupted).message(), "Interrupted: null");
    assert_eq!(wari::make(Limits(1, 2)).message(), "Limits: [1,2]");
    assert_eq!(
        wari::make(Storage::Full { free: 0 }).message(),
        r#"Storage: {"Full":{"free":0}}"#
    );
    assert_eq!(wari::make(Storage::ReadOnly).message(), r#"Storage: "ReadOnly""#);
}

#[test]
fn test_derived_kinds_dispatch() {
    let res: Result<u8, _> = Err(wari::make(NotFound {
        resource: "user/1".into(),
    }));
    let out = res.dispatch(
        Handlers::new()
            .with_kind::<Timeout>(|_| 1)
            .with_kind::<NotFound>(|_| 2),
    );
    assert_eq!(out.ok(), Some(2));
}
