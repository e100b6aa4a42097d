//! Memoizing plain functions, methods and `Result`-returning functions with `#[memoized]`.

use memoir::{memoized, Key, ToKey};
use std::time::Instant;

/// Naive recursion becomes linear once every subproblem is cached
#[memoized]
fn fibonacci(n: u64) -> u64 {
    if n < 2 {
        return n;
    }
    fibonacci(n - 1) + fibonacci(n - 2)
}

/// Simulates a slow lookup; prints on every real computation
#[memoized]
fn fetch_profile(user_id: u32, verbose: bool) -> String {
    println!("  [MISS] loading profile {} (verbose: {})", user_id, verbose);
    std::thread::sleep(std::time::Duration::from_millis(50));
    if verbose {
        format!("User #{} (full profile)", user_id)
    } else {
        format!("User #{}", user_id)
    }
}

/// Only `Ok` values are cached
#[memoized]
fn parse_ratio(input: &str) -> Result<f64, String> {
    println!("  [MISS] parsing {:?}", input);
    let (num, den) = input
        .split_once('/')
        .ok_or_else(|| format!("expected `a/b`, got {:?}", input))?;
    let num: f64 = num.trim().parse().map_err(|e| format!("{}", e))?;
    let den: f64 = den.trim().parse().map_err(|e| format!("{}", e))?;
    Ok(num / den)
}

#[derive(Debug)]
struct TaxTable {
    region: &'static str,
    rate: f64,
}

impl ToKey for TaxTable {
    fn to_key(&self) -> Key {
        Key::Str(self.region.to_string())
    }
}

impl TaxTable {
    #[memoized]
    fn tax_for(&self, cents: u64) -> u64 {
        println!("  [MISS] computing tax in {} for {}", self.region, cents);
        (cents as f64 * self.rate).round() as u64
    }
}

fn main() {
    println!("=== #[memoized] Basics ===\n");

    println!("Example 1: Recursive function");
    let start = Instant::now();
    println!("  fibonacci(90) = {}", fibonacci(90));
    println!("  took {:?}\n", start.elapsed());

    println!("Example 2: Repeated calls with equal arguments");
    println!("  {}", fetch_profile(7, false));
    println!("  {}", fetch_profile(7, false));
    println!("  {}", fetch_profile(7, true));
    println!();

    println!("Example 3: Errors are not cached");
    println!("  {:?}", parse_ratio("3/4"));
    println!("  {:?}", parse_ratio("3/4"));
    println!("  {:?}", parse_ratio("three quarters"));
    println!("  {:?}", parse_ratio("three quarters"));
    println!();

    println!("Example 4: Methods are keyed on the receiver too");
    let north = TaxTable {
        region: "north",
        rate: 0.2,
    };
    let south = TaxTable {
        region: "south",
        rate: 0.1,
    };
    println!("  north: {}", north.tax_for(1000));
    println!("  north: {}", north.tax_for(1000));
    println!("  south: {}", south.tax_for(1000));
}
