use serde::Serialize;
use serde_json::{Map, Value};

/// Named values attached to a single record.
///
/// Keys are unique: inserting an existing key replaces its value, so when a
/// caller supplies the same key twice the last value wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fields(Map<String, Value>);

impl Fields {
    /// An empty set of fields.
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Inserts `value` under `key`, replacing any previous value.
    ///
    /// Values that cannot be represented as JSON (for example a map with
    /// non-string keys) are stored as the serializer's error text.
    pub fn insert<K, V>(&mut self, key: K, value: V) -> &mut Self
    where
        K: Into<String>,
        V: Serialize,
    {
        let value = serde_json::to_value(value)
            .unwrap_or_else(|e| Value::String(format!("!unserializable: {e}")));
        self.0.insert(key.into(), value);
        self
    }

    /// Builder form of [`Fields::insert`].
    pub fn with<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Serialize,
    {
        self.insert(key, value);
        self
    }

    /// The value stored under `key`, if any.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no field has been set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Fields {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        let mut fields = Fields::new();
        for (k, v) in iter {
            fields.0.insert(k.into(), v);
        }
        fields
    }
}

impl<K: Into<String>> Extend<(K, Value)> for Fields {
    fn extend<I: IntoIterator<Item = (K, Value)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.0.insert(k.into(), v);
        }
    }
}

impl From<Map<String, Value>> for Fields {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl IntoIterator for Fields {
    type Item = (String, Value);
    type IntoIter = serde_json::map::IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Builds [`Fields`] from `key => value` pairs of any serializable values.
///
/// ```
/// let fields = logutils::fields! { "user" => "abc", "attempt" => 3, "ok" => false };
/// assert_eq!(fields.len(), 3);
/// ```
#[macro_export]
macro_rules! fields {
    () => {
        $crate::Fields::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut fields = $crate::Fields::new();
        $( fields.insert($key, $value); )+
        fields
    }};
}
