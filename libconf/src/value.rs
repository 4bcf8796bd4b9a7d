//! In-memory representation of parsed configuration data.

use std::fmt;
use std::ops::Index;

use indexmap::IndexMap;

/// A parsed configuration value.
///
/// The root of every parsed document is a [`Group`]. Arrays hold scalars of
/// a nominally uniform kind (not enforced at parse time); lists hold
/// arbitrary values. 64-bit integers carry the "long" tag of the source
/// literal; the serializer re-derives the `L` suffix from the value's range.
#[derive(Clone, PartialEq)]
pub enum Value {
    /// Escape-decoded string.
    Str(String),
    /// Boolean.
    Bool(bool),
    /// 32-bit integer.
    Int(i32),
    /// 64-bit ("long") integer.
    Int64(i64),
    /// Floating-point number.
    Float(f64),
    /// Bracketed sequence of scalars.
    Array(Vec<Value>),
    /// Parenthesized sequence of arbitrary values.
    List(Vec<Value>),
    /// Nested group of named settings.
    Group(Group),
}

impl Value {
    /// Short name of this value's kind, for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Str(_) => "string",
            Value::Bool(_) => "boolean",
            Value::Int(_) => "integer",
            Value::Int64(_) => "integer64",
            Value::Float(_) => "float",
            Value::Array(_) => "array",
            Value::List(_) => "list",
            Value::Group(_) => "group",
        }
    }

    /// Returns the string if this is a `Str`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the boolean if this is a `Bool`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the value if this is an `Int`.
    pub fn as_int(&self) -> Option<i32> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the numeric value of an `Int` or `Int64`.
    pub fn as_int64(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(i64::from(*n)),
            Value::Int64(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the float if this is a `Float`.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Returns the elements if this is an `Array`.
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(values) => Some(values),
            _ => None,
        }
    }

    /// Returns the elements if this is a `List`.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(values) => Some(values),
            _ => None,
        }
    }

    /// Returns the group if this is a `Group`.
    pub fn as_group(&self) -> Option<&Group> {
        match self {
            Value::Group(group) => Some(group),
            _ => None,
        }
    }

    /// Field lookup on a nested group, `None` for other kinds.
    ///
    /// Equivalent to `as_group().and_then(|g| g.get_field(name))`.
    pub fn get_field(&self, name: &str) -> Option<&Value> {
        self.as_group().and_then(|group| group.get_field(name))
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => write!(f, "{s:?}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Int64(n) => write!(f, "{n}L"),
            Value::Float(n) => write!(f, "{n}"),
            Value::Array(values) => f.debug_list().entries(values).finish(),
            Value::List(values) => {
                write!(f, "(")?;
                for (i, v) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{v:?}")?;
                }
                write!(f, ")")
            }
            Value::Group(group) => group.fmt(f),
        }
    }
}

/// Index into a group value by field name.
///
/// Panics if the value is not a group or the field is missing; use
/// [`Value::get_field`] for the non-panicking form.
impl Index<&str> for Value {
    type Output = Value;

    fn index(&self, name: &str) -> &Value {
        match self {
            Value::Group(group) => &group[name],
            other => panic!("cannot index into a {}", other.kind_name()),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int64(n)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<Group> for Value {
    fn from(group: Group) -> Self {
        Value::Group(group)
    }
}

/// An ordered mapping from field name to [`Value`].
///
/// Insertion order is preserved and is semantically meaningful: iterating a
/// parsed group visits settings in document order, and the serializer emits
/// them in that order. Fields can be read either by indexing
/// (`group["port"]`) or through the accessor [`Group::get_field`]; the two
/// resolve identically.
///
/// Inserting a duplicate key replaces the value but keeps the key at its
/// first-seen position (`IndexMap` semantics).
#[derive(Clone, Default, PartialEq)]
pub struct Group {
    fields: IndexMap<String, Value>,
}

impl Group {
    /// Create an empty group.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a field, returning the previous value for a duplicate name.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(name.into(), value.into())
    }

    /// Look up a field by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Accessor-style field lookup; resolves identically to [`Group::get`].
    pub fn get_field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Whether a field with this name exists.
    pub fn contains_key(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the group has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate fields in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterate field names in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}

/// Index by field name; panics if the field is missing.
impl Index<&str> for Group {
    type Output = Value;

    fn index(&self, name: &str) -> &Value {
        self.fields
            .get(name)
            .unwrap_or_else(|| panic!("no field {name:?} in group"))
    }
}

impl fmt::Debug for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.fields.iter()).finish()
    }
}

impl<'a> IntoIterator for &'a Group {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

impl FromIterator<(String, Value)> for Group {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Group {
            fields: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insertion_order_preserved() {
        let mut group = Group::new();
        group.insert("c", 1);
        group.insert("a", 2);
        group.insert("b", 3);
        let keys: Vec<&str> = group.keys().collect();
        assert_eq!(keys, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_duplicate_keeps_first_position() {
        let mut group = Group::new();
        group.insert("a", 1);
        group.insert("b", 2);
        let old = group.insert("a", 3);
        assert_eq!(old, Some(Value::Int(1)));
        let keys: Vec<&str> = group.keys().collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(group["a"], Value::Int(3));
    }

    #[test]
    fn test_index_and_get_field_agree() {
        let mut group = Group::new();
        group.insert("name", "demo");
        assert_eq!(group.get_field("name"), Some(&group["name"]));
    }

    #[test]
    #[should_panic(expected = "no field")]
    fn test_index_missing_panics() {
        let group = Group::new();
        let _ = &group["absent"];
    }

    #[test]
    fn test_nested_index_through_value() {
        let mut inner = Group::new();
        inner.insert("w", 800);
        let mut root = Group::new();
        root.insert("size", inner);
        assert_eq!(root["size"]["w"], Value::Int(800));
        assert_eq!(
            root.get_field("size").and_then(|v| v.get_field("w")),
            Some(&Value::Int(800))
        );
    }
}
