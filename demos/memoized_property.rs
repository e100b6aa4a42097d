//! Per-instance lazily computed values with `MemoizedProperty`.

use memoir::MemoizedProperty;

struct Invoice {
    lines: Vec<(String, u32, u64)>,
    subtotal: MemoizedProperty<u64>,
    summary: MemoizedProperty<String>,
}

impl Invoice {
    fn new(lines: Vec<(String, u32, u64)>) -> Self {
        Self {
            lines,
            subtotal: MemoizedProperty::new(),
            summary: MemoizedProperty::new(),
        }
    }

    fn subtotal(&self) -> u64 {
        *self.subtotal.get_or_compute(|| {
            println!("  [COMPUTE] subtotal");
            self.lines
                .iter()
                .map(|(_, qty, price)| u64::from(*qty) * price)
                .sum()
        })
    }

    fn summary(&self) -> &str {
        self.summary.get_or_compute(|| {
            println!("  [COMPUTE] summary");
            format!("{} lines, {} cents", self.lines.len(), self.subtotal())
        })
    }
}

fn main() {
    println!("=== MemoizedProperty Demo ===\n");

    let mut invoice = Invoice::new(vec![
        ("widget".to_string(), 3, 250),
        ("gadget".to_string(), 1, 1200),
    ]);

    println!("First read:");
    println!("  {}", invoice.summary());
    println!("Second read:");
    println!("  {}", invoice.summary());

    println!("\nOverriding the subtotal:");
    invoice.subtotal.set(0);
    println!("  subtotal = {}", invoice.subtotal());
    println!("  summary still holds the old value: {}", invoice.summary());

    println!("\nResetting both:");
    invoice.lines.push(("gizmo".to_string(), 2, 99));
    invoice.subtotal.reset();
    invoice.summary.reset();
    println!("  {}", invoice.summary());
}
