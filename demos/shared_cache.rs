//! Several functions memoizing into one externally owned store.
//!
//! The store can be inspected and cleared from outside, and its hit/miss
//! statistics are available when the `stats` feature is enabled.

use memoir::{args, memoized, memoized_into, Args, CacheStore, SharedCache};
use once_cell::sync::Lazy;

static RENDERED: Lazy<SharedCache<String>> = Lazy::new(SharedCache::new);

#[memoized(cache = RENDERED)]
fn render_title(id: u32) -> String {
    println!("  [MISS] render_title({})", id);
    format!("<h1>Article {}</h1>", id)
}

#[memoized(cache = RENDERED)]
fn render_footer(id: u32) -> String {
    println!("  [MISS] render_footer({})", id);
    format!("<footer>Article {}</footer>", id)
}

fn main() {
    println!("=== Shared Store Demo ===\n");

    println!("Example 1: Two functions, one store");
    render_title(1);
    render_footer(1);
    render_title(1);
    render_footer(1);
    println!("  entries in store: {}", RENDERED.len());
    for signature in RENDERED.signatures() {
        println!("    {:?}", signature);
    }

    println!("\nExample 2: Clearing the store from outside");
    RENDERED.clear();
    render_title(1);
    println!("  entries in store: {}", RENDERED.len());

    println!("\nExample 3: Dynamic callables on a shared handle");
    let cache: SharedCache<String> = SharedCache::new();
    let upper = memoized_into(cache.clone())
        .named("upper")
        .wrap(|a: &Args| {
            let text = a.get(0).and_then(|v| v.as_str()).unwrap_or_default();
            println!("  [MISS] upper({:?})", text);
            text.to_uppercase()
        });
    let repeat = memoized_into(cache.clone())
        .named("repeat")
        .wrap(|a: &Args| {
            let text = a.get(0).and_then(|v| v.as_str()).unwrap_or_default();
            let times = a.keyword("times").and_then(|v| v.as_int()).unwrap_or(1);
            println!("  [MISS] repeat({:?}, times={})", text, times);
            text.repeat(times.max(0) as usize)
        });

    println!("  {}", upper.call(&args!["memo"]).unwrap_or_default());
    println!("  {}", upper.call(&args!["memo"]).unwrap_or_default());
    println!("  {}", repeat.call(&args!["memo"; times = 2]).unwrap_or_default());
    println!("  entries in shared handle: {}", cache.len());

    #[cfg(feature = "stats")]
    {
        let stats = cache.stats();
        println!(
            "  hits: {}, misses: {}, hit rate: {:.0}%",
            stats.hits(),
            stats.misses(),
            stats.hit_rate() * 100.0
        );
    }

    println!("\nExample 4: Unhashable arguments are rejected");
    match upper.call(&args![memoir::Value::list([])]) {
        Ok(_) => println!("  unexpected success"),
        Err(err) => println!("  error: {}", err),
    }
}
