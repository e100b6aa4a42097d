//! Integration tests for functions returning `Result`: only `Ok` values are stored

use memoir::{args, memoized, memoized_into, Args, CacheStore, MemoError, SharedCache, Value};
use std::sync::atomic::{AtomicUsize, Ordering};

static DIVIDE_CALLS: AtomicUsize = AtomicUsize::new(0);

#[memoized]
fn divide(a: i32, b: i32) -> Result<i32, String> {
    DIVIDE_CALLS.fetch_add(1, Ordering::SeqCst);
    if b == 0 {
        return Err("division by zero".to_string());
    }
    Ok(a / b)
}

#[test]
fn test_ok_is_cached_err_is_not() {
    assert_eq!(divide(10, 2), Ok(5));
    assert_eq!(divide(10, 2), Ok(5));
    assert_eq!(DIVIDE_CALLS.load(Ordering::SeqCst), 1);

    assert!(divide(10, 0).is_err());
    assert!(divide(10, 0).is_err());
    assert_eq!(DIVIDE_CALLS.load(Ordering::SeqCst), 3);
}

static PARSE_CALLS: AtomicUsize = AtomicUsize::new(0);

#[memoized]
fn parse_port(raw: &str) -> Result<u16, std::num::ParseIntError> {
    PARSE_CALLS.fetch_add(1, Ordering::SeqCst);
    let port = raw.trim().parse::<u16>()?;
    Ok(port)
}

#[test]
fn test_question_mark_inside_body() {
    assert_eq!(parse_port("8080"), Ok(8080));
    assert_eq!(parse_port("8080"), Ok(8080));
    assert!(parse_port("http").is_err());
    assert_eq!(PARSE_CALLS.load(Ordering::SeqCst), 2);
}

static FLAKY_ATTEMPTS: AtomicUsize = AtomicUsize::new(0);

#[memoized]
fn flaky_fetch(id: u32) -> Result<String, String> {
    let attempt = FLAKY_ATTEMPTS.fetch_add(1, Ordering::SeqCst);
    if attempt == 0 {
        Err(format!("timeout fetching {}", id))
    } else {
        Ok(format!("record {}", id))
    }
}

#[test]
fn test_failure_then_success_is_cached() {
    assert_eq!(flaky_fetch(9), Err("timeout fetching 9".to_string()));
    assert_eq!(flaky_fetch(9), Ok("record 9".to_string()));
    assert_eq!(flaky_fetch(9), Ok("record 9".to_string()));
    assert_eq!(FLAKY_ATTEMPTS.load(Ordering::SeqCst), 2);
}

#[derive(Debug, Clone, PartialEq)]
enum LoadError {
    BadArguments(MemoError),
    Missing(String),
}

impl From<MemoError> for LoadError {
    fn from(err: MemoError) -> Self {
        LoadError::BadArguments(err)
    }
}

#[test]
fn test_dynamic_try_call() {
    let cache: SharedCache<Result<i64, LoadError>> = SharedCache::new();
    let load = memoized_into(cache.clone()).named("load").wrap(|a: &Args| -> Result<i64, LoadError> {
        match a.get(0).and_then(Value::as_str) {
            Some("answer") => Ok(42),
            Some(other) => Err(LoadError::Missing(other.to_string())),
            None => Err(LoadError::Missing(String::new())),
        }
    });

    assert_eq!(load.try_call(&args!["answer"]), Ok(42));
    assert_eq!(load.try_call(&args!["nothing"]), Err(LoadError::Missing("nothing".into())));
    assert_eq!(cache.len(), 1);

    let err = load.try_call(&args![Value::list([])]).unwrap_err();
    assert!(matches!(err, LoadError::BadArguments(MemoError::Unhashable { .. })));
}

#[test]
fn test_call_stores_err_as_an_ordinary_value() {
    // `call` sees the Result as an opaque value; `try_call` is the Ok-only path
    let cache: SharedCache<Result<i64, String>> = SharedCache::new();
    let f = memoized_into(cache.clone()).wrap(|_: &Args| Err::<i64, String>("nope".into()));

    assert_eq!(f.call(&args![1]), Ok(Err("nope".to_string())));
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_default_memoizer_with_result() {
    let f = memoized(|a: &Args| -> Result<i64, LoadError> {
        a.keyword("n").and_then(Value::as_int).ok_or(LoadError::Missing("n".into()))
    });

    assert_eq!(f.try_call(&args![; n = 3]), Ok(3));
    assert_eq!(f.try_call(&args![; m = 3]), Err(LoadError::Missing("n".into())));
    assert_eq!(f.cache().len(), 1);
}
