use std::cell::RefCell;
use std::collections::HashMap;
use std::thread::LocalKey;

use crate::{CacheStore, CallSignature};

/// A store backed by thread-local storage.
///
/// Each thread sees its own map, so no locking happens and entries computed
/// on one thread are never visible on another. The map is declared with
/// `thread_local!`; `#[memoized(scope = "thread")]` does this for you.
///
/// # Examples
///
/// ```
/// use std::cell::RefCell;
/// use std::collections::HashMap;
/// use memoir_core::{CacheStore, CallSignature, Key, ThreadLocalCache};
///
/// thread_local! {
///     static SQUARES: RefCell<HashMap<CallSignature, u64>> = RefCell::new(HashMap::new());
/// }
///
/// let cache = ThreadLocalCache::new(&SQUARES);
/// let sig = CallSignature::from_keys(vec![Key::Int(12)]);
/// cache.insert(sig.clone(), 144);
/// assert_eq!(cache.get(&sig), Some(144));
///
/// std::thread::spawn(move || {
///     let cache = ThreadLocalCache::new(&SQUARES);
///     assert_eq!(cache.get(&sig), None);
/// })
/// .join()
/// .unwrap();
/// ```
pub struct ThreadLocalCache<V: 'static> {
    map: &'static LocalKey<RefCell<HashMap<CallSignature, V>>>,
}

impl<V: 'static> ThreadLocalCache<V> {
    pub fn new(map: &'static LocalKey<RefCell<HashMap<CallSignature, V>>>) -> Self {
        Self { map }
    }
}

impl<V: 'static> Clone for ThreadLocalCache<V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<V: 'static> Copy for ThreadLocalCache<V> {}

impl<V: Clone + 'static> CacheStore<V> for ThreadLocalCache<V> {
    fn get(&self, signature: &CallSignature) -> Option<V> {
        self.map.with(|m| m.borrow().get(signature).cloned())
    }

    fn insert(&self, signature: CallSignature, value: V) {
        self.map.with(|m| {
            m.borrow_mut().insert(signature, value);
        });
    }

    fn contains(&self, signature: &CallSignature) -> bool {
        self.map.with(|m| m.borrow().contains_key(signature))
    }

    fn remove(&self, signature: &CallSignature) -> Option<V> {
        self.map.with(|m| m.borrow_mut().remove(signature))
    }

    fn len(&self) -> usize {
        self.map.with(|m| m.borrow().len())
    }

    fn clear(&self) {
        self.map.with(|m| m.borrow_mut().clear());
    }
}
