use std::fmt;

use once_cell::sync::OnceCell;

/// A lazily computed, per-instance value.
///
/// Put a `MemoizedProperty<T>` field on a struct and read it through an
/// accessor method. The first read computes the value from the instance;
/// later reads return the stored value. The cell belongs to the instance,
/// so two instances never share a value and no key is needed beyond "which
/// instance".
///
/// Writing is allowed: [`set`](MemoizedProperty::set) replaces whatever is
/// stored, computed or not, and [`reset`](MemoizedProperty::reset) forgets
/// the value so the next read computes again.
///
/// # Examples
///
/// ```
/// use memoir_core::MemoizedProperty;
///
/// struct Circle {
///     radius: f64,
///     area: MemoizedProperty<f64>,
/// }
///
/// impl Circle {
///     fn new(radius: f64) -> Self {
///         Self { radius, area: MemoizedProperty::new() }
///     }
///
///     fn area(&self) -> f64 {
///         *self.area.get_or_compute(|| std::f64::consts::PI * self.radius * self.radius)
///     }
/// }
///
/// let mut c = Circle::new(2.0);
/// assert!((c.area() - 12.566).abs() < 0.001);
///
/// c.area.set(1.0);
/// assert_eq!(c.area(), 1.0);
/// ```
pub struct MemoizedProperty<T> {
    cell: OnceCell<T>,
}

impl<T> MemoizedProperty<T> {
    pub const fn new() -> Self {
        Self {
            cell: OnceCell::new(),
        }
    }

    /// A property that starts out holding `value`.
    pub fn with_value(value: T) -> Self {
        Self {
            cell: OnceCell::with_value(value),
        }
    }

    /// Returns the stored value, computing it with `compute` on first access.
    ///
    /// If several threads race on the first access, `compute` runs once and
    /// the others block until it finishes.
    pub fn get_or_compute<F>(&self, compute: F) -> &T
    where
        F: FnOnce() -> T,
    {
        self.cell.get_or_init(compute)
    }

    /// Fallible variant of [`get_or_compute`](MemoizedProperty::get_or_compute).
    ///
    /// An error is returned as-is and nothing is stored, so the next access
    /// tries again.
    pub fn get_or_try_compute<F, E>(&self, compute: F) -> Result<&T, E>
    where
        F: FnOnce() -> Result<T, E>,
    {
        self.cell.get_or_try_init(compute)
    }

    /// The stored value, if any, without computing.
    pub fn get(&self) -> Option<&T> {
        self.cell.get()
    }

    pub fn is_computed(&self) -> bool {
        self.cell.get().is_some()
    }

    /// Overrides the stored value. Later reads return `value`.
    pub fn set(&mut self, value: T) {
        self.cell = OnceCell::with_value(value);
    }

    /// Forgets the stored value and returns it.
    pub fn reset(&mut self) -> Option<T> {
        self.cell.take()
    }

    pub fn into_inner(self) -> Option<T> {
        self.cell.into_inner()
    }
}

impl<T> Default for MemoizedProperty<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for MemoizedProperty<T> {
    fn clone(&self) -> Self {
        Self {
            cell: self.cell.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for MemoizedProperty<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.cell.get() {
            Some(value) => f.debug_tuple("MemoizedProperty").field(value).finish(),
            None => f.write_str("MemoizedProperty(<not computed>)"),
        }
    }
}

impl<T> From<T> for MemoizedProperty<T> {
    fn from(value: T) -> Self {
        Self::with_value(value)
    }
}
