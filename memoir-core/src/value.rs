use std::rc::Rc;
use std::sync::Arc;

/// A dynamically typed argument value.
///
/// `Value` is what the dynamic memoizer accepts as call arguments. Scalars,
/// strings, bytes and tuples are hashable; `List` and `Dict` are mutable
/// containers and can never be part of a cache key.
///
/// # Examples
///
/// ```
/// use memoir_core::Value;
///
/// assert!(Value::from(3).is_hashable());
/// assert!(Value::tuple([Value::from("a"), Value::from(1.5)]).is_hashable());
/// assert!(!Value::list([Value::from(1)]).is_hashable());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Bytes(Vec<u8>),
    Tuple(Vec<Value>),
    List(Vec<Value>),
    Dict(Vec<(Value, Value)>),
}

impl Value {
    /// Builds a tuple value.
    pub fn tuple<I: IntoIterator<Item = Value>>(items: I) -> Self {
        Value::Tuple(items.into_iter().collect())
    }

    /// Builds a list value (unhashable).
    pub fn list<I: IntoIterator<Item = Value>>(items: I) -> Self {
        Value::List(items.into_iter().collect())
    }

    /// Builds a dict value (unhashable).
    pub fn dict<I: IntoIterator<Item = (Value, Value)>>(pairs: I) -> Self {
        Value::Dict(pairs.into_iter().collect())
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::None => "none",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::Bytes(_) => "bytes",
            Value::Tuple(_) => "tuple",
            Value::List(_) => "list",
            Value::Dict(_) => "dict",
        }
    }

    /// Returns `true` if the value can be used in a cache key.
    ///
    /// A tuple is hashable only if every element is.
    pub fn is_hashable(&self) -> bool {
        self.to_key().is_ok()
    }

    /// Projects the value onto its hashable [`Key`].
    ///
    /// On failure, returns the type name of the first unhashable value found
    /// (which may be nested inside a tuple).
    pub fn to_key(&self) -> Result<Key, &'static str> {
        Ok(match self {
            Value::None => Key::None,
            Value::Bool(b) => Key::Bool(*b),
            Value::Int(i) => Key::Int(i128::from(*i)),
            Value::Float(f) => Key::float(*f),
            Value::Str(s) => Key::Str(s.clone()),
            Value::Bytes(b) => Key::Bytes(b.clone()),
            Value::Tuple(items) => Key::Tuple(
                items
                    .iter()
                    .map(Value::to_key)
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            Value::List(_) | Value::Dict(_) => return Err(self.type_name()),
        })
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }
}

macro_rules! value_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Value::Int(i64::from(v))
                }
            }
        )*
    };
}

value_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(f64::from(v))
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Self {
        Value::Bytes(v.to_vec())
    }
}

/// A `Vec<Value>` is a mutable sequence and becomes a `List`.
impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::List(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => Value::None,
        }
    }
}

/// The hashable projection of an argument.
///
/// Floats are stored by bit pattern with `-0.0` folded into `0.0` and every
/// NaN folded into one canonical NaN, so equal-looking floats share a key.
/// `Some` wraps the key of a present `Option`, keeping `None` and
/// `Some(None)` apart.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    None,
    Some(Box<Key>),
    Bool(bool),
    Int(i128),
    Float(u64),
    Str(String),
    Bytes(Vec<u8>),
    Tuple(Vec<Key>),
}

impl Key {
    pub fn float(f: f64) -> Self {
        let normalized = if f == 0.0 {
            0.0f64
        } else if f.is_nan() {
            f64::NAN
        } else {
            f
        };
        Key::Float(normalized.to_bits())
    }
}

/// Conversion of a typed argument into a cache [`Key`].
///
/// Only immutable, hashable kinds of data implement this trait. `Vec<T>`,
/// `HashMap<K, V>` and other mutable containers deliberately do not, so a
/// `#[memoized]` function taking one of them fails to compile.
///
/// # Examples
///
/// ```
/// use memoir_core::{Key, ToKey};
///
/// #[derive(Debug)]
/// struct UserId(u64);
///
/// impl ToKey for UserId {
///     fn to_key(&self) -> Key {
///         Key::Int(i128::from(self.0))
///     }
/// }
///
/// assert_eq!(UserId(7).to_key(), 7u64.to_key());
/// ```
pub trait ToKey {
    fn to_key(&self) -> Key;
}

macro_rules! to_key_int {
    ($($t:ty),*) => {
        $(
            impl ToKey for $t {
                fn to_key(&self) -> Key {
                    Key::Int(*self as i128)
                }
            }
        )*
    };
}

to_key_int!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, usize);

impl ToKey for bool {
    fn to_key(&self) -> Key {
        Key::Bool(*self)
    }
}

impl ToKey for char {
    fn to_key(&self) -> Key {
        Key::Str(self.to_string())
    }
}

impl ToKey for f64 {
    fn to_key(&self) -> Key {
        Key::float(*self)
    }
}

impl ToKey for f32 {
    fn to_key(&self) -> Key {
        Key::float(f64::from(*self))
    }
}

impl ToKey for str {
    fn to_key(&self) -> Key {
        Key::Str(self.to_string())
    }
}

impl ToKey for String {
    fn to_key(&self) -> Key {
        Key::Str(self.clone())
    }
}

impl ToKey for () {
    fn to_key(&self) -> Key {
        Key::Tuple(Vec::new())
    }
}

impl ToKey for Key {
    fn to_key(&self) -> Key {
        self.clone()
    }
}

impl<T: ToKey> ToKey for Option<T> {
    fn to_key(&self) -> Key {
        match self {
            Some(v) => Key::Some(Box::new(v.to_key())),
            None => Key::None,
        }
    }
}

impl<T: ToKey + ?Sized> ToKey for &T {
    fn to_key(&self) -> Key {
        (**self).to_key()
    }
}

impl<T: ToKey + ?Sized> ToKey for Box<T> {
    fn to_key(&self) -> Key {
        (**self).to_key()
    }
}

impl<T: ToKey + ?Sized> ToKey for Rc<T> {
    fn to_key(&self) -> Key {
        (**self).to_key()
    }
}

impl<T: ToKey + ?Sized> ToKey for Arc<T> {
    fn to_key(&self) -> Key {
        (**self).to_key()
    }
}

macro_rules! to_key_tuple {
    ($($name:ident),+) => {
        impl<$($name: ToKey),+> ToKey for ($($name,)+) {
            #[allow(non_snake_case)]
            fn to_key(&self) -> Key {
                let ($($name,)+) = self;
                Key::Tuple(vec![$($name.to_key()),+])
            }
        }
    };
}

to_key_tuple!(A);
to_key_tuple!(A, B);
to_key_tuple!(A, B, C);
to_key_tuple!(A, B, C, D);
to_key_tuple!(A, B, C, D, E);
to_key_tuple!(A, B, C, D, E, F);
