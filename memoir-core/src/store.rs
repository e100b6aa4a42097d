use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::CallSignature;

/// Backing mapping of a memoized callable.
///
/// A store maps [`CallSignature`]s to previously computed values. It never
/// evicts on its own; entries go away only through [`remove`] or [`clear`].
/// Every method takes `&self` so one store can be handed to several wrapped
/// callables at once.
///
/// Implementations must not hold a lock or borrow across calls: the
/// memoizer looks a value up, runs the wrapped function with nothing held,
/// then inserts. This is what lets a memoized function call itself
/// recursively.
///
/// [`remove`]: CacheStore::remove
/// [`clear`]: CacheStore::clear
pub trait CacheStore<V> {
    /// Returns a clone of the value stored under `signature`.
    fn get(&self, signature: &CallSignature) -> Option<V>;

    /// Stores `value`, replacing whatever was stored under `signature`.
    fn insert(&self, signature: CallSignature, value: V);

    fn contains(&self, signature: &CallSignature) -> bool;

    fn remove(&self, signature: &CallSignature) -> Option<V>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn clear(&self);
}

/// Stores `Ok` results only; an `Err` leaves the store untouched so the next
/// call with the same signature runs the function again.
///
/// # Examples
///
/// ```
/// use memoir_core::{insert_ok, CacheStore, CallSignature, Key, SharedCache};
///
/// let cache: SharedCache<Result<i32, String>> = SharedCache::new();
/// let sig = CallSignature::from_keys(vec![Key::Int(1)]);
///
/// insert_ok(&cache, sig.clone(), &Err("boom".to_string()));
/// assert!(!cache.contains(&sig));
///
/// insert_ok(&cache, sig.clone(), &Ok(7));
/// assert_eq!(cache.get(&sig), Some(Ok(7)));
/// ```
pub fn insert_ok<S, T, E>(store: &S, signature: CallSignature, result: &Result<T, E>)
where
    S: CacheStore<Result<T, E>> + ?Sized,
    T: Clone,
{
    if let Ok(value) = result {
        store.insert(signature, Ok(value.clone()));
    }
}

impl<V, S: CacheStore<V> + ?Sized> CacheStore<V> for &S {
    fn get(&self, signature: &CallSignature) -> Option<V> {
        (**self).get(signature)
    }

    fn insert(&self, signature: CallSignature, value: V) {
        (**self).insert(signature, value)
    }

    fn contains(&self, signature: &CallSignature) -> bool {
        (**self).contains(signature)
    }

    fn remove(&self, signature: &CallSignature) -> Option<V> {
        (**self).remove(signature)
    }

    fn len(&self) -> usize {
        (**self).len()
    }

    fn clear(&self) {
        (**self).clear()
    }
}

impl<V, S: CacheStore<V> + ?Sized> CacheStore<V> for Arc<S> {
    fn get(&self, signature: &CallSignature) -> Option<V> {
        (**self).get(signature)
    }

    fn insert(&self, signature: CallSignature, value: V) {
        (**self).insert(signature, value)
    }

    fn contains(&self, signature: &CallSignature) -> bool {
        (**self).contains(signature)
    }

    fn remove(&self, signature: &CallSignature) -> Option<V> {
        (**self).remove(signature)
    }

    fn len(&self) -> usize {
        (**self).len()
    }

    fn clear(&self) {
        (**self).clear()
    }
}

impl<V, S: CacheStore<V> + ?Sized> CacheStore<V> for Rc<S> {
    fn get(&self, signature: &CallSignature) -> Option<V> {
        (**self).get(signature)
    }

    fn insert(&self, signature: CallSignature, value: V) {
        (**self).insert(signature, value)
    }

    fn contains(&self, signature: &CallSignature) -> bool {
        (**self).contains(signature)
    }

    fn remove(&self, signature: &CallSignature) -> Option<V> {
        (**self).remove(signature)
    }

    fn len(&self) -> usize {
        (**self).len()
    }

    fn clear(&self) {
        (**self).clear()
    }
}

/// Lets a `static` store declared with `Lazy` be passed as `cache = STATIC`.
impl<V, S, F> CacheStore<V> for Lazy<S, F>
where
    S: CacheStore<V>,
    F: FnOnce() -> S,
{
    fn get(&self, signature: &CallSignature) -> Option<V> {
        (**self).get(signature)
    }

    fn insert(&self, signature: CallSignature, value: V) {
        (**self).insert(signature, value)
    }

    fn contains(&self, signature: &CallSignature) -> bool {
        (**self).contains(signature)
    }

    fn remove(&self, signature: &CallSignature) -> Option<V> {
        (**self).remove(signature)
    }

    fn len(&self) -> usize {
        (**self).len()
    }

    fn clear(&self) {
        (**self).clear()
    }
}

/// A plain single-threaded map is a store too.
impl<V: Clone> CacheStore<V> for RefCell<HashMap<CallSignature, V>> {
    fn get(&self, signature: &CallSignature) -> Option<V> {
        self.borrow().get(signature).cloned()
    }

    fn insert(&self, signature: CallSignature, value: V) {
        self.borrow_mut().insert(signature, value);
    }

    fn contains(&self, signature: &CallSignature) -> bool {
        self.borrow().contains_key(signature)
    }

    fn remove(&self, signature: &CallSignature) -> Option<V> {
        self.borrow_mut().remove(signature)
    }

    fn len(&self) -> usize {
        self.borrow().len()
    }

    fn clear(&self) {
        self.borrow_mut().clear()
    }
}
