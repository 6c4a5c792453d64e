//! Dispatching errors returned from realistic call chains.

use std::cell::RefCell;

use wari::{Handlers, TaggedError, TaggedResultExt, Unknown};

use crate::common::{FileFailure, HttpError, JsonError, Operation, http_error, init_tracing, json_error};

/// A fetch that can fail with either of two kinds.
fn fetch(status: u16, body: &str) -> Result<String, TaggedError> {
    if status >= 400 {
        return Err(wari::make(http_error(status)));
    }
    if !body.starts_with('{') {
        return Err(wari::make(json_error(body)));
    }
    Ok(body.to_owned())
}

#[test]
fn test_success_skips_handlers() {
    let calls = RefCell::new(Vec::new());
    let out = wari::dispatch(
        fetch(200, "{}"),
        Handlers::new()
            .with_kind::<JsonError>(|_| {
                calls.borrow_mut().push("json");
                String::new()
            })
            .with_default(|_| {
                calls.borrow_mut().push("default");
                String::new()
            }),
    );
    assert_eq!(out.ok().as_deref(), Some("{}"));
    assert!(calls.borrow().is_empty());
}

#[test]
fn test_routes_each_kind_to_its_handler() {
    let handlers = || {
        Handlers::new()
            .with_kind::<JsonError>(|err| {
                let text = err.payload::<JsonError>().map(|d| d.text.clone());
                format!("bad body: {}", text.unwrap_or_default())
            })
            .with_kind::<HttpError>(|err| {
                let status = err.payload::<HttpError>().map_or(0, |d| d.status);
                format!("status {status}")
            })
    };

    assert_eq!(
        fetch(200, "oops").dispatch(handlers()).ok().as_deref(),
        Some("bad body: oops")
    );
    assert_eq!(
        fetch(502, "").dispatch(handlers()).ok().as_deref(),
        Some("status 502")
    );
}

#[test]
fn test_handler_receives_the_same_error() {
    let original = wari::make(json_error("x"));
    let seen = RefCell::new(None);
    let out: Result<Option<()>, _> = wari::dispatch(
        Err::<Option<()>, _>(original.clone()),
        Handlers::new().with_kind::<JsonError>(|err| {
            *seen.borrow_mut() = Some(err);
            None
        }),
    );
    assert_eq!(out.ok(), Some(None));
    let seen = seen.into_inner();
    assert!(seen.is_some_and(|err| TaggedError::ptr_eq(&err, &original)));
}

#[test]
fn test_default_catches_other_kinds() {
    let out = fetch(500, "").dispatch(
        Handlers::new()
            .with_kind::<JsonError>(|_| "json".to_owned())
            .with_default(|err| format!("fallback for {}", err.tag())),
    );
    assert_eq!(out.ok().as_deref(), Some("fallback for HttpError"));
}

#[test]
fn test_missing_handler_is_returned_not_raised() {
    init_tracing();

    let out = fetch(404, "").dispatch(Handlers::new().with_kind::<JsonError>(|_| String::new()));

    let err = out.err();
    let Some(err) = err else {
        panic!("expected an unhandled error");
    };
    assert!(err.is_kind::<Unknown>());
    assert!(err.message().contains("missing error type 'HttpError' in match call"));
    assert_eq!(err.payload::<Unknown>().and_then(|u| u.tag.as_deref()), Some("HttpError"));
    assert!(err.unhandled().is_some_and(|e| e.is_kind::<HttpError>()));
}

#[test]
fn test_handlers_may_return_new_errors() {
    fn read_config(path: &str) -> Result<String, TaggedError> {
        Err(wari::make(FileFailure {
            operation: Operation::Read,
            file_path: path.into(),
            error: "ENOENT".into(),
        }))
    }

    // Recover from a missing file by falling back to defaults, but turn every
    // other failure into a distinct error for the caller.
    let out = read_config("app.toml")
        .map(Ok::<String, TaggedError>)
        .dispatch(
            Handlers::new()
                .with_kind::<FileFailure>(|_| Ok("defaults".to_owned()))
                .with_default(|err| Err(TaggedError::new("ConfigError", err.tag().to_owned()))),
        );
    assert_eq!(out.ok().and_then(Result::ok).as_deref(), Some("defaults"));
}

#[test]
fn test_runtime_and_typed_tags_agree() {
    let err = TaggedError::new("JsonError", "raw");
    let out = Err::<i32, _>(err).dispatch(Handlers::new().with_kind::<JsonError>(|_| 7));
    assert_eq!(out.ok(), Some(7));
}

#[test]
fn test_handler_literals_take_the_value_type() {
    fn port(raw: Option<u64>) -> Result<u64, TaggedError> {
        raw.ok_or_else(|| wari::make(json_error("port")))
    }

    let handlers = || Handlers::new().with_kind::<JsonError>(|_| 8080);
    assert_eq!(wari::dispatch(port(Some(u64::MAX)), handlers()).ok(), Some(u64::MAX));
    assert_eq!(wari::dispatch(port(None), handlers()).ok(), Some(8080));
    assert_eq!(port(Some(1)).dispatch(Handlers::new()).ok(), Some(1));
}

#[test]
fn test_dispatch_into_option_for_handlers_without_value() {
    let seen = RefCell::new(Vec::new());
    let run = |res: Result<u16, TaggedError>| {
        res.dispatch_into::<Option<u16>>(Handlers::new().with_default(|err| {
            seen.borrow_mut().push(err.tag().to_owned());
            None
        }))
    };

    assert_eq!(run(Ok(200)).ok(), Some(Some(200)));
    assert_eq!(run(Err(wari::make(http_error(500)))).ok(), Some(None));
    assert_eq!(seen.into_inner(), vec!["HttpError".to_owned()]);
}
