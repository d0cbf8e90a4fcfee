use std::{fmt, rc::Rc};

use serde_json::Value as JsonValue;

/// Field and function access on an externally owned object.
///
/// This is the only way the engine looks inside opaque state: a dotted binding
/// path is resolved one segment at a time against whatever the previous
/// segment produced.
pub trait Source {
    /// Value of a named field, or `None` if the object has no such field.
    fn field(&self, name: &str) -> Option<Value>;

    /// Result of calling a named zero-argument function. Path segments written
    /// as `name()` resolve through here.
    fn call(&self, name: &str) -> Option<Value> {
        let _ = name;
        None
    }
}

/// A value produced by resolving a binding path.
#[derive(Clone, Default)]
pub enum Value {
    /// Absent or explicitly null.
    #[default]
    Null,
    /// A boolean.
    Bool(bool),
    /// A number.
    Number(f64),
    /// A string.
    Text(String),
    /// Structured data. Objects are accessed by key and arrays by index.
    Data(JsonValue),
    /// An opaque external object.
    Object(Rc<dyn Source>),
}

impl Value {
    /// Wrap an external object.
    pub fn object(source: impl Source + 'static) -> Self {
        Self::Object(Rc::new(source))
    }

    /// True for `Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// True for values that support sub-access.
    pub fn is_complex(&self) -> bool {
        matches!(self, Self::Data(_) | Self::Object(_))
    }

    /// The boolean, if this is one.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The number, if this is one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// The string, if this is one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Access a field of a complex value.
    pub fn field(&self, name: &str) -> Option<Self> {
        match self {
            Self::Data(JsonValue::Object(map)) => map.get(name).cloned().map(Self::from),
            Self::Data(JsonValue::Array(items)) => name
                .parse::<usize>()
                .ok()
                .and_then(|i| items.get(i))
                .cloned()
                .map(Self::from),
            Self::Object(src) => src.field(name),
            _ => None,
        }
    }

    /// Call a zero-argument function. `len` is built in for strings and
    /// structured data; everything else is delegated to the object.
    pub fn call(&self, name: &str) -> Option<Self> {
        match (self, name) {
            (Self::Text(s), "len") => Some(Self::Number(s.chars().count() as f64)),
            (Self::Data(JsonValue::Array(a)), "len") => Some(Self::Number(a.len() as f64)),
            (Self::Data(JsonValue::Object(m)), "len") => Some(Self::Number(m.len() as f64)),
            (Self::Object(src), _) => src.call(name),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::Data(a), Self::Data(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("Null"),
            Self::Bool(b) => write!(f, "Bool({b})"),
            Self::Number(n) => write!(f, "Number({n})"),
            Self::Text(s) => write!(f, "Text({s:?})"),
            Self::Data(d) => write!(f, "Data({d})"),
            Self::Object(o) => write!(f, "Object({:p})", Rc::as_ptr(o)),
        }
    }
}

impl From<JsonValue> for Value {
    fn from(v: JsonValue) -> Self {
        match v {
            JsonValue::Null => Self::Null,
            JsonValue::Bool(b) => Self::Bool(b),
            JsonValue::Number(n) => n.as_f64().map_or(Self::Null, Self::Number),
            JsonValue::String(s) => Self::Text(s),
            other => Self::Data(other),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Self::Number(f64::from(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Number(v as f64)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Number(f64::from(v))
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

/// Conversion from a resolved [`Value`] into a property's concrete type.
///
/// Returning `None` signals a type mismatch, which the bindable logs and then
/// ignores.
pub trait FromValue: Sized {
    /// Convert, or `None` if the value has the wrong shape.
    fn from_value(v: &Value) -> Option<Self>;
}

impl FromValue for Value {
    fn from_value(v: &Value) -> Option<Self> {
        Some(v.clone())
    }
}

impl FromValue for bool {
    fn from_value(v: &Value) -> Option<Self> {
        v.as_bool()
    }
}

impl FromValue for f64 {
    fn from_value(v: &Value) -> Option<Self> {
        v.as_f64()
    }
}

impl FromValue for f32 {
    fn from_value(v: &Value) -> Option<Self> {
        v.as_f64().map(|n| n as Self)
    }
}

impl FromValue for i64 {
    fn from_value(v: &Value) -> Option<Self> {
        v.as_f64().filter(|n| n.fract() == 0.0).map(|n| n as Self)
    }
}

impl FromValue for String {
    fn from_value(v: &Value) -> Option<Self> {
        match v {
            Value::Text(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    struct Player {
        hp: f64,
    }

    impl Source for Player {
        fn field(&self, name: &str) -> Option<Value> {
            match name {
                "hp" => Some(self.hp.into()),
                _ => None,
            }
        }

        fn call(&self, name: &str) -> Option<Value> {
            match name {
                "is_dead" => Some((self.hp <= 0.0).into()),
                _ => None,
            }
        }
    }

    #[test]
    fn json_normalizes_scalars() {
        assert_eq!(Value::from(json!(3)), Value::Number(3.0));
        assert_eq!(Value::from(json!("a")), Value::Text("a".into()));
        assert!(Value::from(json!({"a": 1})).is_complex());
    }

    #[test]
    fn data_field_access() {
        let v = Value::from(json!({"items": [{"name": "sword"}]}));
        let name = v
            .field("items")
            .and_then(|i| i.field("0"))
            .and_then(|i| i.field("name"));
        assert_eq!(name, Some(Value::from("sword")));
        assert_eq!(v.field("missing"), None);
        assert_eq!(v.field("items").and_then(|i| i.call("len")), Some(1.0.into()));
    }

    #[test]
    fn object_access() {
        let v = Value::object(Player { hp: 0.0 });
        assert_eq!(v.field("hp"), Some(Value::Number(0.0)));
        assert_eq!(v.call("is_dead"), Some(Value::Bool(true)));
        assert_eq!(v.call("nope"), None);
    }

    #[test]
    fn object_equality_is_identity() {
        let a = Value::object(Player { hp: 1.0 });
        let b = a.clone();
        let c = Value::object(Player { hp: 1.0 });
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn conversions() {
        assert_eq!(i64::from_value(&Value::Number(2.0)), Some(2));
        assert_eq!(i64::from_value(&Value::Number(2.5)), None);
        assert_eq!(String::from_value(&Value::Number(7.0)), Some("7".into()));
        assert_eq!(bool::from_value(&Value::Text("true".into())), None);
    }
}
