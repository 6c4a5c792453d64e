//! Guards around code that panics.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use wari::{
    Caught, CaughtKind, Guard, GuardConfig, Handlers, IntoUnknown, TaggedError, TaggedResultExt,
    Unknown,
};

use crate::common::{JsonError, init_tracing, json_error};

fn parse_strict(text: &str) -> serde_json::Value {
    match serde_json::from_str(text) {
        Ok(value) => value,
        Err(err) => panic!("{err}"),
    }
}

#[test]
fn test_try_catch_success() {
    let res = wari::try_catch(|| parse_strict(r#"{"a":1}"#));
    assert_eq!(res.ok().and_then(|v| v["a"].as_i64()), Some(1));
}

#[test]
fn test_try_catch_panic_becomes_unknown() {
    init_tracing();

    let res = wari::try_catch(|| parse_strict("{"));
    let err = res.unwrap_err();
    assert!(err.is_kind::<Unknown>());
    let unknown = err.payload::<Unknown>().unwrap();
    assert_eq!(unknown.error.kind(), CaughtKind::Panic);
    assert!(unknown.error.message().contains("EOF"));
}

#[test]
fn test_try_catch_with_maps_to_own_kind() {
    let text = "{";
    let res = wari::try_catch_with(
        || parse_strict(text),
        |_| wari::make(json_error(text)),
    );
    let err = res.unwrap_err();
    assert_eq!(err.message(), r#"JsonError: {"text":"{"}"#);
}

#[test]
fn test_try_catch_returns_tagged_values_as_is() {
    // A call that reports failure as a value is not a panic.
    let res = wari::try_catch(|| Err::<(), _>(wari::make(json_error("x"))));
    let inner = res.unwrap();
    assert!(inner.is_tag("JsonError"));
}

#[test]
fn test_panic_with_tagged_error_payload() {
    let original = wari::make(json_error("x"));
    let thrown = original.clone();
    let res: Result<(), Caught> =
        wari::try_catch_with(|| std::panic::panic_any(thrown), |caught| caught);
    let caught = res.unwrap_err();
    let source = caught.downcast_ref::<TaggedError>().unwrap();
    assert!(TaggedError::ptr_eq(source, &original));
}

#[test]
fn test_safe_wrapper_passes_arguments_to_handler() {
    let parse = wari::safe(
        |text: String| parse_strict(&text),
        |_, text| wari::make(json_error(&text)),
    );

    assert!(parse(r#"[1,2]"#.to_owned()).is_ok());

    let out = parse("nope".to_owned()).dispatch(
        Handlers::new().with_kind::<JsonError>(|err| {
            let text = err.payload::<JsonError>().map(|d| d.text.clone());
            serde_json::Value::String(text.unwrap_or_default())
        }),
    );
    assert_eq!(out.unwrap(), serde_json::Value::String("nope".into()));
}

#[test]
fn test_safe_wrapper_is_reusable() {
    let calls = AtomicUsize::new(0);
    let half = wari::safe(
        |n: u32| {
            calls.fetch_add(1, Ordering::SeqCst);
            assert!(n % 2 == 0, "odd input");
            n / 2
        },
        |caught, n| format!("{n}: {caught}"),
    );

    assert_eq!(half(4), Ok(2));
    assert_eq!(half(3), Err("3: odd input".to_owned()));
    assert_eq!(half(10), Ok(5));
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[test]
fn test_configured_guard_captures_backtrace() {
    let guard = Guard::new(GuardConfig::quiet().with_capture_backtrace(true));
    let res: Result<(), Caught> = guard.try_catch_with(|| panic!("boom"), |caught| caught);
    let caught = res.unwrap_err();
    assert_eq!(caught.message(), "boom");
    assert!(caught.backtrace().is_some());
}

#[test]
fn test_or_unknown_converts_std_errors() {
    let res: Result<serde_json::Value, TaggedError> =
        serde_json::from_str::<serde_json::Value>("{").or_unknown();
    let err = res.unwrap_err();
    let unknown = err.payload::<Unknown>().unwrap();
    assert_eq!(unknown.error.kind(), CaughtKind::Error);
    assert!(unknown.error.downcast_ref::<serde_json::Error>().is_some());
}

#[tokio::test]
async fn test_try_catch_async_success() {
    let res = wari::try_catch_async(|| async { 42 }).await;
    assert_eq!(res.ok(), Some(42));
}

#[tokio::test]
async fn test_try_catch_async_panic_while_polling() {
    let res = wari::try_catch_async(|| async {
        tokio::task::yield_now().await;
        parse_strict("{")
    })
    .await;
    assert!(res.is_tag("Unknown"));
}

#[tokio::test]
async fn test_try_catch_async_panic_before_future() {
    #[allow(unreachable_code)]
    let res = wari::try_catch_async_with(
        || {
            panic!("eager");
            async { 1 }
        },
        |caught| caught.message().to_owned(),
    )
    .await;
    assert_eq!(res, Err("eager".to_owned()));
}

#[tokio::test]
async fn test_safe_async_wrapper() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let fetch_json = wari::safe_async(
        move |body: String| {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(std::time::Duration::from_millis(1)).await;
                parse_strict(&body)
            }
        },
        |_, body| wari::make(json_error(&body)),
    );

    let ok = fetch_json("true".to_owned()).await;
    assert_eq!(ok.ok(), Some(serde_json::Value::Bool(true)));

    let err = fetch_json("tru".to_owned()).await.unwrap_err();
    assert_eq!(err.message(), r#"JsonError: {"text":"tru"}"#);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_safe_async_futures_are_send() {
    let double = wari::safe_async(|n: u64| async move { n * 2 }, |caught, _| caught);
    let handle = tokio::spawn(double(21));
    let res = handle.await.unwrap();
    assert_eq!(res.ok(), Some(42));
}

#[derive(Debug, thiserror::Error)]
#[error("upstream returned {0}")]
struct Upstream(u16);

#[test]
fn test_safe_fallible_sees_returned_errors() {
    let fetch = wari::safe_fallible(
        |status: u16| {
            if status >= 400 {
                return Err(Upstream(status));
            }
            Ok(status)
        },
        |caught, status| {
            let upstream = caught.downcast_ref::<Upstream>().map(|u| u.0);
            (upstream, status, caught.message().to_owned())
        },
    );

    assert_eq!(fetch(200), Ok(200));
    assert_eq!(
        fetch(503),
        Err((Some(503), 503, "upstream returned 503".to_owned()))
    );
}

#[test]
fn test_try_catch_result_maps_errors_to_own_kind() {
    let text = "{";
    let res = wari::try_catch_result_with(
        || serde_json::from_str::<serde_json::Value>(text),
        |caught| {
            assert_eq!(caught.kind(), CaughtKind::Error);
            wari::make(json_error(text))
        },
    );
    assert!(res.is_tag("JsonError"));
}

#[tokio::test]
async fn test_safe_async_fallible_handles_async_errors() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let fetch = wari::safe_async_fallible(
        |status: u16| async move {
            tokio::task::yield_now().await;
            if status >= 400 {
                return Err(Upstream(status));
            }
            Ok(status)
        },
        move |caught, status| {
            counter.fetch_add(1, Ordering::SeqCst);
            TaggedError::new("FetchError", format!("{status}: {caught}"))
        },
    );

    assert_eq!(fetch(204).await.ok(), Some(204));
    let err = fetch(500).await.unwrap_err();
    assert_eq!(err.message(), r#"FetchError: "500: upstream returned 500""#);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_try_catch_async_result_returns_unknown() {
    let res = wari::try_catch_async_result(|| async { Err::<(), _>(Upstream(502)) }).await;
    let err = res.unwrap_err();
    let unknown = err.payload::<Unknown>().unwrap();
    assert_eq!(unknown.error.kind(), CaughtKind::Error);
    assert!(unknown.error.downcast_ref::<Upstream>().is_some());
}
