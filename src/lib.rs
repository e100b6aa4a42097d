//! # Memoir
//!
//! Memoization for Rust functions, with cache stores you can supply, share
//! and inspect, plus lazily computed per-instance properties.
//!
//! ## Features
//!
//! - **Attribute macro**: put `#[memoized]` on a function or method
//! - **Pluggable stores**: memoize into any [`CacheStore`], including one
//!   shared by several functions
//! - **Hashable arguments only**: arguments must implement [`ToKey`];
//!   mutable containers are rejected at compile time (typed functions) or
//!   with [`MemoError::Unhashable`] (dynamic calls)
//! - **Result-aware**: only `Ok` values of `Result`-returning functions are
//!   stored
//! - **Memoized properties**: [`MemoizedProperty`] computes a value once per
//!   instance and lets you override or reset it
//!
//! The code generated by `#[memoized]` refers to `memoir_core`, so add it
//! next to `memoir` in `Cargo.toml`.
//!
//! ## Quick Start
//!
//! ```rust
//! use memoir::memoized;
//!
//! #[memoized]
//! fn fibonacci(n: u64) -> u64 {
//!     if n < 2 {
//!         return n;
//!     }
//!     fibonacci(n - 1) + fibonacci(n - 2)
//! }
//!
//! assert_eq!(fibonacci(50), 12_586_269_025);
//! ```
//!
//! ## Sharing a Store
//!
//! Several functions can memoize into one store. Each function namespaces
//! its entries with its name, so identical arguments never collide:
//!
//! ```rust
//! use memoir::{memoized, CacheStore, SharedCache};
//! use once_cell::sync::Lazy;
//!
//! static LABELS: Lazy<SharedCache<String>> = Lazy::new(SharedCache::new);
//!
//! #[memoized(cache = LABELS)]
//! fn user_label(id: u32) -> String {
//!     format!("user-{}", id)
//! }
//!
//! #[memoized(cache = LABELS)]
//! fn group_label(id: u32) -> String {
//!     format!("group-{}", id)
//! }
//!
//! assert_eq!(user_label(1), "user-1");
//! assert_eq!(group_label(1), "group-1");
//! assert_eq!(LABELS.len(), 2);
//! ```
//!
//! ## Dynamic Calls
//!
//! When the arguments are only known at runtime, wrap a closure over
//! [`Args`]:
//!
//! ```rust
//! use memoir::{args, memoized_into, Args, SharedCache};
//!
//! let cache: SharedCache<String> = SharedCache::new();
//! let greet = memoized_into(cache.clone())
//!     .named("greet")
//!     .wrap(|a: &Args| {
//!         let name = a.get(0).and_then(|v| v.as_str()).unwrap_or("stranger");
//!         let punct = a.keyword("punct").and_then(|v| v.as_str()).unwrap_or(".");
//!         format!("Hello, {}{}", name, punct)
//!     });
//!
//! assert_eq!(greet.call(&args!["Ada"; punct = "!"]).unwrap(), "Hello, Ada!");
//! ```
//!
//! ## Memoized Properties
//!
//! ```rust
//! use memoir::MemoizedProperty;
//!
//! struct Document {
//!     text: String,
//!     words: MemoizedProperty<usize>,
//! }
//!
//! impl Document {
//!     fn words(&self) -> usize {
//!         *self.words.get_or_compute(|| self.text.split_whitespace().count())
//!     }
//! }
//!
//! let doc = Document { text: "one two three".into(), words: MemoizedProperty::new() };
//! assert_eq!(doc.words(), 3);
//! ```
//!
//! ## Compile-time checks
//!
//! Arguments of a `#[memoized]` function must be hashable. Mutable
//! containers do not implement [`ToKey`], so these fail to compile:
//!
//! ```compile_fail
//! use memoir::memoized;
//!
//! #[memoized]
//! fn total(values: Vec<u8>) -> u8 {
//!     values.iter().sum()
//! }
//! ```
//!
//! ```compile_fail
//! use memoir::memoized;
//! use std::collections::HashMap;
//!
//! #[memoized]
//! fn lookup(table: HashMap<String, u8>, key: String) -> Option<u8> {
//!     table.get(&key).copied()
//! }
//! ```
//!
//! A supplied store decides where entries live, so it cannot be combined
//! with `scope`:
//!
//! ```compile_fail
//! use memoir::{memoized, SharedCache};
//! use once_cell::sync::Lazy;
//!
//! static STORE: Lazy<SharedCache<u8>> = Lazy::new(SharedCache::new);
//!
//! #[memoized(cache = STORE, scope = "thread")]
//! fn identity(x: u8) -> u8 {
//!     x
//! }
//! ```
//!
//! The same function with either option alone compiles:
//!
//! ```rust
//! use memoir::{memoized, SharedCache};
//! use once_cell::sync::Lazy;
//!
//! static STORE: Lazy<SharedCache<u8>> = Lazy::new(SharedCache::new);
//!
//! #[memoized(cache = STORE)]
//! fn identity(x: u8) -> u8 {
//!     x
//! }
//!
//! #[memoized(scope = "thread")]
//! fn per_thread_identity(x: u8) -> u8 {
//!     x
//! }
//!
//! assert_eq!(identity(3), 3);
//! assert_eq!(per_thread_identity(4), 4);
//! ```

pub use memoir_core::*;
pub use memoir_macros::memoized;
