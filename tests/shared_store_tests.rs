//! Integration tests for memoizing into externally supplied stores

use memoir::{memoized, CacheStore, CallSignature, Key, SharedCache, ThreadLocalCache};
use once_cell::sync::Lazy;
use serial_test::serial;
use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

static LABELS: Lazy<SharedCache<String>> = Lazy::new(SharedCache::new);

static USER_CALLS: AtomicUsize = AtomicUsize::new(0);

#[memoized(cache = LABELS)]
fn user_label(id: u32) -> String {
    USER_CALLS.fetch_add(1, Ordering::SeqCst);
    format!("user-{}", id)
}

#[memoized(cache = LABELS)]
fn group_label(id: u32) -> String {
    format!("group-{}", id)
}

#[test]
#[serial]
fn test_two_functions_share_one_store_without_colliding() {
    LABELS.clear();

    assert_eq!(user_label(1), "user-1");
    assert_eq!(group_label(1), "group-1");
    assert_eq!(LABELS.len(), 2);

    let user_sig = CallSignature::from_keys(vec![Key::Int(1)]).with_namespace("user_label");
    let group_sig = CallSignature::from_keys(vec![Key::Int(1)]).with_namespace("group_label");
    assert_eq!(LABELS.get(&user_sig), Some("user-1".to_string()));
    assert_eq!(LABELS.get(&group_sig), Some("group-1".to_string()));
}

#[test]
#[serial]
fn test_clearing_the_store_forces_recompute() {
    LABELS.clear();
    let before = USER_CALLS.load(Ordering::SeqCst);

    user_label(42);
    user_label(42);
    assert_eq!(USER_CALLS.load(Ordering::SeqCst) - before, 1);

    LABELS.clear();
    assert!(LABELS.is_empty());

    user_label(42);
    assert_eq!(USER_CALLS.load(Ordering::SeqCst) - before, 2);
}

#[test]
#[serial]
fn test_removing_one_entry() {
    LABELS.clear();

    user_label(5);
    group_label(5);

    let user_sig = CallSignature::from_keys(vec![Key::Int(5)]).with_namespace("user_label");
    assert_eq!(LABELS.remove(&user_sig), Some("user-5".to_string()));
    assert_eq!(LABELS.len(), 1);
}

static NAMED: Lazy<SharedCache<i64>> = Lazy::new(SharedCache::new);

#[memoized(cache = NAMED, name = "lookup")]
fn lookup_v1(x: i64) -> i64 {
    x + 1
}

#[memoized(cache = NAMED, name = "lookup")]
fn lookup_v2(x: i64) -> i64 {
    x + 2
}

#[test]
fn test_same_name_shares_entries() {
    // Equal names opt into sharing: the second function reads the first one's entry
    assert_eq!(lookup_v1(10), 11);
    assert_eq!(lookup_v2(10), 11);
    assert_eq!(NAMED.len(), 1);
}

fn scratch() -> &'static SharedCache<u64> {
    static SCRATCH: Lazy<SharedCache<u64>> = Lazy::new(SharedCache::new);
    &SCRATCH
}

#[memoized(cache = scratch())]
fn cube(x: u64) -> u64 {
    x * x * x
}

#[test]
fn test_store_from_function_call() {
    assert_eq!(cube(3), 27);
    assert!(scratch().contains(&CallSignature::from_keys(vec![Key::Int(3)]).with_namespace("cube")));
}

thread_local! {
    static LOCAL: RefCell<HashMap<CallSignature, String>> = RefCell::new(HashMap::new());
}

#[memoized(cache = ThreadLocalCache::new(&LOCAL))]
fn shout(word: &str) -> String {
    word.to_uppercase()
}

#[test]
fn test_thread_local_store_supplied_by_caller() {
    let store = ThreadLocalCache::new(&LOCAL);

    assert_eq!(shout("hi"), "HI");
    assert_eq!(store.len(), 1);

    let other = std::thread::spawn(move || {
        let store = ThreadLocalCache::new(&LOCAL);
        let before = store.len();
        shout("hi");
        (before, store.len())
    })
    .join()
    .unwrap();

    assert_eq!(other, (0, 1));
    assert_eq!(store.len(), 1);
}

#[test]
fn test_shared_cache_handle_clones() {
    let cache: SharedCache<i32> = SharedCache::new();
    let handle = cache.clone();
    assert!(cache.same_cache(&handle));

    let sig = CallSignature::from_keys(vec![Key::Str("k".into())]);
    handle.insert(sig.clone(), 1);
    assert_eq!(cache.get(&sig), Some(1));
    assert_eq!(cache.signatures(), vec![sig]);
}
