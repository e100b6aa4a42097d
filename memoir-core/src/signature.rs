use std::borrow::Cow;
use std::collections::BTreeMap;

use crate::error::{ArgPosition, MemoError, MemoResult};
use crate::value::{Key, Value};

/// Arguments of a single dynamic call.
///
/// Positional values keep their order; keyword values keep their insertion
/// order here, but that order is dropped when a [`CallSignature`] is built.
///
/// # Examples
///
/// ```
/// use memoir_core::Args;
///
/// let args = Args::new().arg(2).arg(3).kwarg("scale", 10);
/// assert_eq!(args.get(0).and_then(|v| v.as_int()), Some(2));
/// assert_eq!(args.keyword("scale").and_then(|v| v.as_int()), Some(10));
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Args {
    positional: Vec<Value>,
    keywords: Vec<(String, Value)>,
}

impl Args {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a positional argument.
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.push(value);
        self
    }

    /// Appends a keyword argument.
    pub fn kwarg(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.push_kwarg(name, value);
        self
    }

    pub fn push(&mut self, value: impl Into<Value>) {
        self.positional.push(value.into());
    }

    pub fn push_kwarg(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.keywords.push((name.into(), value.into()));
    }

    /// Positional argument at `index`.
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.positional.get(index)
    }

    /// Keyword argument named `name` (the first one, if repeated).
    pub fn keyword(&self, name: &str) -> Option<&Value> {
        self.keywords
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v)
    }

    pub fn positional(&self) -> &[Value] {
        &self.positional
    }

    pub fn keywords(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.keywords.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Total number of arguments, positional and keyword.
    pub fn len(&self) -> usize {
        self.positional.len() + self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FromIterator<Value> for Args {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self {
            positional: iter.into_iter().collect(),
            keywords: Vec::new(),
        }
    }
}

/// Builds an [`Args`] value.
///
/// Positional arguments come first; keyword arguments follow a `;`.
///
/// ```
/// use memoir_core::args;
///
/// let a = args![1, "two"; scale = 3.0, verbose = true];
/// assert_eq!(a.len(), 4);
///
/// let only_keywords = args![; b = 2, a = 1];
/// assert_eq!(only_keywords.positional().len(), 0);
/// ```
#[macro_export]
macro_rules! args {
    () => {
        $crate::Args::new()
    };
    ($($arg:expr),* $(,)? $(; $($name:ident = $kw:expr),* $(,)?)?) => {{
        let __args = $crate::Args::new();
        $(let __args = __args.arg($arg);)*
        $($(let __args = __args.kwarg(stringify!($name), $kw);)*)?
        __args
    }};
}

/// Canonical cache key of one invocation.
///
/// Keyword arguments are held in a `BTreeMap`, so two calls passing the
/// same keyword pairs in a different order produce equal signatures. The
/// optional namespace keeps the entries of different callables apart when
/// they share one store.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CallSignature {
    namespace: Option<Cow<'static, str>>,
    positional: Vec<Key>,
    keywords: BTreeMap<String, Key>,
}

impl CallSignature {
    /// Builds the signature of a dynamic call.
    ///
    /// # Errors
    ///
    /// * [`MemoError::Unhashable`] if any argument is, or contains, a list
    ///   or dict. Positional arguments are checked before keywords.
    /// * [`MemoError::DuplicateKeyword`] if a keyword name repeats.
    pub fn from_args(args: &Args) -> MemoResult<Self> {
        let positional = args
            .positional
            .iter()
            .enumerate()
            .map(|(index, value)| {
                value.to_key().map_err(|type_name| MemoError::Unhashable {
                    position: ArgPosition::Positional(index),
                    type_name,
                })
            })
            .collect::<MemoResult<Vec<_>>>()?;

        let mut keywords = BTreeMap::new();
        for (name, value) in &args.keywords {
            let key = value.to_key().map_err(|type_name| MemoError::Unhashable {
                position: ArgPosition::Keyword(name.clone()),
                type_name,
            })?;
            if keywords.insert(name.clone(), key).is_some() {
                return Err(MemoError::DuplicateKeyword(name.clone()));
            }
        }

        Ok(Self {
            namespace: None,
            positional,
            keywords,
        })
    }

    /// Builds a signature from already hashable positional keys.
    pub fn from_keys(positional: Vec<Key>) -> Self {
        Self {
            namespace: None,
            positional,
            keywords: BTreeMap::new(),
        }
    }

    pub fn with_namespace(mut self, namespace: impl Into<Cow<'static, str>>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn positional(&self) -> &[Key] {
        &self.positional
    }

    pub fn keywords(&self) -> &BTreeMap<String, Key> {
        &self.keywords
    }

    pub fn arity(&self) -> usize {
        self.positional.len() + self.keywords.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    fn hash_of(sig: &CallSignature) -> u64 {
        let mut h = DefaultHasher::new();
        sig.hash(&mut h);
        h.finish()
    }

    #[test]
    fn test_keyword_order_does_not_matter() {
        let a = CallSignature::from_args(&args![1; x = 1, y = "two", z = 3.0]).unwrap();
        let b = CallSignature::from_args(&args![1; z = 3.0, x = 1, y = "two"]).unwrap();
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
    }

    #[test]
    fn test_positional_order_matters() {
        let a = CallSignature::from_args(&args![1, 2]).unwrap();
        let b = CallSignature::from_args(&args![2, 1]).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_positional_and_keyword_are_distinct() {
        let a = CallSignature::from_args(&args![1]).unwrap();
        let b = CallSignature::from_args(&args![; a = 1]).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_unhashable_positional_reports_index() {
        let err = CallSignature::from_args(&args![1, Value::list([])]).unwrap_err();
        assert_eq!(
            err,
            MemoError::Unhashable {
                position: ArgPosition::Positional(1),
                type_name: "list",
            }
        );
    }

    #[test]
    fn test_unhashable_keyword_reports_name() {
        let err = CallSignature::from_args(&args![; opts = Value::dict([])]).unwrap_err();
        assert_eq!(
            err,
            MemoError::Unhashable {
                position: ArgPosition::Keyword("opts".to_string()),
                type_name: "dict",
            }
        );
    }

    #[test]
    fn test_duplicate_keyword_rejected() {
        let err = CallSignature::from_args(&args![; a = 1, a = 2]).unwrap_err();
        assert_eq!(err, MemoError::DuplicateKeyword("a".to_string()));
    }

    #[test]
    fn test_namespace_separates_signatures() {
        let base = CallSignature::from_keys(vec![Key::Int(1)]);
        let f = base.clone().with_namespace("f");
        let g = base.clone().with_namespace("g");
        assert_ne!(f, g);
        assert_ne!(f, base);
        assert_eq!(f.namespace(), Some("f"));
        assert_eq!(base.namespace(), None);
    }

    #[test]
    fn test_from_keys_matches_from_args() {
        let dynamic = CallSignature::from_args(&args![7, "x"]).unwrap();
        let typed = CallSignature::from_keys(vec![Key::Int(7), Key::Str("x".to_string())]);
        assert_eq!(dynamic, typed);
        assert_eq!(typed.arity(), 2);
    }

    #[test]
    fn test_args_accessors() {
        let a = args![1, 2; b = 3];
        assert_eq!(a.len(), 3);
        assert!(!a.is_empty());
        assert_eq!(a.keyword("b"), Some(&Value::Int(3)));
        assert_eq!(a.keyword("c"), None);
        assert_eq!(a.keywords().count(), 1);
        assert!(args![].is_empty());

        let collected: Args = vec![Value::from(1), Value::from(2)].into_iter().collect();
        assert_eq!(collected, args![1, 2]);
    }
}
