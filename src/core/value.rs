use std::fmt;

use serde::ser::{Serialize, SerializeMap, Serializer};

use super::types::TypeTag;

/// A runtime value captured from the failing program, as shown on the page.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    /// Ordered key → value pairs. Lists use their positions as keys.
    Array(Vec<(String, Value)>),
    Object(Object),
}

/// An object instance: its class, the interfaces it implements and its
/// properties in declaration order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Object {
    pub class: String,
    pub interfaces: Vec<String>,
    pub properties: Vec<(String, Value)>,
}

impl Object {
    pub fn new(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            ..Self::default()
        }
    }

    pub fn implementing(mut self, interface: impl Into<String>) -> Self {
        self.interfaces.push(interface.into());
        self
    }

    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.push((name.into(), value.into()));
        self
    }

    /// Interface lookup is exact and excludes the class itself, so a class
    /// is never considered a subclass of itself.
    pub fn implements(&self, interface: &str) -> bool {
        self.interfaces.iter().any(|i| i == interface)
    }
}

impl Value {
    pub fn type_tag(&self) -> TypeTag {
        match self {
            Self::Null => TypeTag::Null,
            Self::Boolean(_) => TypeTag::Boolean,
            Self::Integer(_) => TypeTag::Integer,
            Self::Float(_) => TypeTag::Double,
            Self::Text(_) => TypeTag::String,
            Self::Array(_) => TypeTag::Array,
            Self::Object(_) => TypeTag::Object,
        }
    }

    /// Build an array from a list, keyed by position.
    pub fn list<I, V>(items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::Array(
            items
                .into_iter()
                .enumerate()
                .map(|(i, v)| (i.to_string(), v.into()))
                .collect(),
        )
    }

    /// Build an array from key/value pairs, keeping their order.
    pub fn map<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Self::Array(pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Self::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "NULL"),
            Self::Boolean(b) => write!(f, "{}", b),
            Self::Integer(i) => write!(f, "{}", i),
            Self::Float(fl) => write!(f, "{}", fl),
            Self::Text(s) => write!(f, "{}", s),
            Self::Array(items) => write!(f, "Array({})", items.len()),
            Self::Object(o) => write!(f, "Object({})", o.class),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Boolean(b) => serializer.serialize_bool(*b),
            Self::Integer(i) => serializer.serialize_i64(*i),
            Self::Float(f) => serializer.serialize_f64(*f),
            Self::Text(s) => serializer.serialize_str(s),
            Self::Array(items) => {
                let mut map = serializer.serialize_map(Some(items.len()))?;
                for (k, v) in items {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
            Self::Object(o) => {
                let mut map = serializer.serialize_map(Some(o.properties.len() + 1))?;
                map.serialize_entry("__class", &o.class)?;
                for (k, v) in &o.properties {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
        }
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<u32> for Value {
    fn from(i: u32) -> Self {
        Self::Integer(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<Object> for Value {
    fn from(o: Object) -> Self {
        Self::Object(o)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_tags() {
        assert_eq!(Value::Null.type_tag(), TypeTag::Null);
        assert_eq!(Value::from(1i64).type_tag(), TypeTag::Integer);
        assert_eq!(Value::from(1.5).type_tag(), TypeTag::Double);
        assert_eq!(Value::from("x").type_tag(), TypeTag::String);
        assert_eq!(Value::list([1i64, 2]).type_tag(), TypeTag::Array);
        assert_eq!(Value::from(Object::new("Foo")).type_tag(), TypeTag::Object);
    }

    #[test]
    fn test_list_keys_by_position() {
        let Value::Array(items) = Value::list(["a", "b"]) else {
            panic!("expected array");
        };
        assert_eq!(items[0].0, "0");
        assert_eq!(items[1], ("1".to_string(), Value::from("b")));
    }

    #[test]
    fn test_object_serializes_class_first() {
        let obj = Object::new("App\\User").with_property("id", 7i64);
        let json = serde_json::to_string(&Value::from(obj)).unwrap();
        assert_eq!(json, r#"{"__class":"App\\User","id":7}"#);
    }

    #[test]
    fn test_implements_is_exact() {
        let obj = Object::new("Handler").implementing("HandlerInterface");
        assert!(obj.implements("HandlerInterface"));
        assert!(!obj.implements("Handler"));
    }
}
