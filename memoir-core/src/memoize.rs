use std::borrow::Cow;
use std::marker::PhantomData;

use crate::store::insert_ok;
use crate::{Args, CacheStore, CallSignature, MemoError, MemoResult, SharedCache};

/// Wraps `func` with a private [`SharedCache`].
///
/// This is the bare form of the decorator: no options, a fresh store that
/// lives as long as the returned [`Memoized`].
///
/// For a function returning `Result`, call it through
/// [`Memoized::try_call`] so that failures are not cached; [`Memoized::call`]
/// treats the whole `Result` as the value and stores an `Err` as well.
///
/// # Examples
///
/// ```
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use memoir_core::{args, memoized};
///
/// let calls = AtomicUsize::new(0);
/// let add = memoized(|a: &memoir_core::Args| {
///     calls.fetch_add(1, Ordering::SeqCst);
///     a.get(0).and_then(|v| v.as_int()).unwrap_or(0) + a.get(1).and_then(|v| v.as_int()).unwrap_or(0)
/// });
///
/// assert_eq!(add.call(&args![2, 3]).unwrap(), 5);
/// assert_eq!(add.call(&args![2, 3]).unwrap(), 5);
/// assert_eq!(calls.load(Ordering::SeqCst), 1);
/// ```
pub fn memoized<F, V>(func: F) -> Memoized<F, V, SharedCache<V>>
where
    F: Fn(&Args) -> V,
    V: Clone,
{
    memoized_into(SharedCache::new()).wrap(func)
}

/// Returns a decorator that memoizes into `store`.
///
/// Pass a clone of a [`SharedCache`] (or a reference to any store) to share
/// one cache between several callables or to inspect and clear it from
/// outside.
///
/// As with [`memoized`], use [`Memoized::try_call`] for fallible functions
/// to keep `Err` results out of the store.
///
/// ```
/// use memoir_core::{args, memoized_into, Args, CacheStore, SharedCache};
///
/// let cache: SharedCache<i64> = SharedCache::new();
/// let double = memoized_into(cache.clone()).wrap(|a: &Args| a.get(0).and_then(|v| v.as_int()).unwrap() * 2);
///
/// double.call(&args![21]).unwrap();
/// assert_eq!(cache.len(), 1);
/// cache.clear();
/// assert!(double.cache().is_empty());
/// ```
pub fn memoized_into<S>(store: S) -> Memoizer<S> {
    Memoizer::new(store)
}

/// A decorator bound to a store, waiting for the function to wrap.
#[derive(Clone, Debug)]
pub struct Memoizer<S> {
    store: S,
    name: Option<Cow<'static, str>>,
}

impl<S> Memoizer<S> {
    pub fn new(store: S) -> Self {
        Self { store, name: None }
    }

    /// Namespaces every signature produced by the wrapped callable.
    ///
    /// Two callables sharing a store but carrying different names never
    /// see each other's entries, even when called with identical
    /// arguments. Unnamed callables on one store share entries whenever
    /// their arguments match.
    pub fn named(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn wrap<F, V>(self, func: F) -> Memoized<F, V, S>
    where
        F: Fn(&Args) -> V,
        S: CacheStore<V>,
    {
        Memoized {
            func,
            store: self.store,
            name: self.name,
            _value: PhantomData,
        }
    }
}

/// A memoized callable.
///
/// Built by [`memoized`] or [`Memoizer::wrap`]. The wrapped function is
/// assumed to be pure; on a hit it is not invoked at all, so none of its
/// side effects happen.
///
/// # Concurrency
///
/// Lookups and inserts are separate store operations and the function runs
/// with no lock held. Concurrent misses on one signature may each run the
/// function; the last insert wins. There is no at-most-once guarantee.
pub struct Memoized<F, V, S> {
    func: F,
    store: S,
    name: Option<Cow<'static, str>>,
    _value: PhantomData<fn() -> V>,
}

impl<F, V, S> Memoized<F, V, S> {
    /// The backing store.
    pub fn cache(&self) -> &S {
        &self.store
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Computes the signature `args` would be cached under.
    ///
    /// # Errors
    ///
    /// Fails with [`MemoError::Unhashable`] or
    /// [`MemoError::DuplicateKeyword`] exactly as [`Memoized::call`] would.
    pub fn signature(&self, args: &Args) -> MemoResult<CallSignature> {
        let signature = CallSignature::from_args(args)?;
        Ok(match &self.name {
            Some(name) => signature.with_namespace(name.clone()),
            None => signature,
        })
    }

    fn trace_lookup(&self, signature: &CallSignature, hit: bool) {
        tracing::trace!(
            name = self.name().unwrap_or("<anonymous>"),
            arity = signature.arity(),
            hit,
            "memoized lookup"
        );
    }
}

impl<F, V, S> Memoized<F, V, S>
where
    F: Fn(&Args) -> V,
    S: CacheStore<V>,
    V: Clone,
{
    /// Calls the wrapped function, or returns the cached result.
    ///
    /// # Errors
    ///
    /// Returns [`MemoError::Unhashable`] if an argument is (or contains) a
    /// list or dict, and [`MemoError::DuplicateKeyword`] if a keyword
    /// repeats. In both cases the function is not called and the store is
    /// left untouched.
    ///
    /// A function returning `Result` has its `Err` values cached by this
    /// method; use [`Memoized::try_call`] to cache successes only.
    pub fn call(&self, args: &Args) -> MemoResult<V> {
        let signature = self.signature(args)?;

        if let Some(cached) = self.store.get(&signature) {
            self.trace_lookup(&signature, true);
            return Ok(cached);
        }
        self.trace_lookup(&signature, false);

        let value = (self.func)(args);
        self.store.insert(signature, value.clone());
        Ok(value)
    }
}

impl<F, T, E, S> Memoized<F, Result<T, E>, S>
where
    F: Fn(&Args) -> Result<T, E>,
    S: CacheStore<Result<T, E>>,
    T: Clone,
    E: From<MemoError>,
{
    /// Calls a fallible function, caching `Ok` values only.
    ///
    /// An `Err` returned by the function propagates unchanged and is not
    /// stored, so the next call with the same arguments runs the function
    /// again. Signature errors are converted into `E`.
    pub fn try_call(&self, args: &Args) -> Result<T, E> {
        let signature = self.signature(args)?;

        if let Some(cached) = self.store.get(&signature) {
            self.trace_lookup(&signature, true);
            return cached;
        }
        self.trace_lookup(&signature, false);

        let result = (self.func)(args);
        insert_ok(&self.store, signature, &result);
        result
    }
}
