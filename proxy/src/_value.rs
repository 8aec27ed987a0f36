use crate::context::DataType;
use crate::{ArrayProxy, LanguageSetProxy, SubjectProxy};
use ldo_term::ns::{rdf, xsd};
use ldo_term::{Literal, Term, TermError};
use serde_json::Value as JsonValue;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

/// A value read from, or written to, a view.
///
/// Views ([`Subject`](Value::Subject), [`Array`](Value::Array), [`LanguageSet`](Value::LanguageSet))
/// are live: they always reflect the current state of the dataset.
/// Two views are equal if they are the same cached view.
#[derive(Clone, Debug)]
pub enum Value {
    /// No value; writing it deletes the property
    Null,
    /// A boolean
    Boolean(bool),
    /// A number
    Number(f64),
    /// A string
    String(String),
    /// A view on another subject
    Subject(SubjectProxy),
    /// A plain object, to be materialized as a new (or existing) subject
    Object(ObjectLiteral),
    /// A view on a collection
    Array(ArrayProxy),
    /// A view on the strings of a language
    LanguageSet(LanguageSetProxy),
    /// A plain list of values
    List(Vec<Value>),
    /// A raw JSON value
    Json(JsonValue),
}

impl Value {
    /// Whether this is [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// This value as a string slice, if it is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// This value as a number, if it is one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// This value as a boolean, if it is one.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// This value as a subject view, if it is one.
    pub fn as_subject(&self) -> Option<&SubjectProxy> {
        match self {
            Value::Subject(s) => Some(s),
            _ => None,
        }
    }

    /// This value as a collection view, if it is one.
    pub fn as_array(&self) -> Option<&ArrayProxy> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    /// This value as a language set view, if it is one.
    pub fn as_language_set(&self) -> Option<&LanguageSetProxy> {
        match self {
            Value::LanguageSet(l) => Some(l),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Subject(a), Value::Subject(b)) => a.ptr_eq(b),
            (Value::Object(a), Value::Object(b)) => a.ptr_eq(b),
            (Value::Array(a), Value::Array(b)) => a.ptr_eq(b),
            (Value::LanguageSet(a), Value::LanguageSet(b)) => a.ptr_eq(b),
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Json(a), Value::Json(b)) => a == b,
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n.into())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<SubjectProxy> for Value {
    fn from(s: SubjectProxy) -> Self {
        Value::Subject(s)
    }
}

impl From<ObjectLiteral> for Value {
    fn from(o: ObjectLiteral) -> Self {
        Value::Object(o)
    }
}

impl From<ArrayProxy> for Value {
    fn from(a: ArrayProxy) -> Self {
        Value::Array(a)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

/// JSON objects become [`ObjectLiteral`]s and arrays become lists.
impl From<JsonValue> for Value {
    fn from(json: JsonValue) -> Self {
        match json {
            JsonValue::Null => Value::Null,
            JsonValue::Bool(b) => Value::Boolean(b),
            JsonValue::Number(n) => n.as_f64().map(Value::Number).unwrap_or(Value::Null),
            JsonValue::String(s) => Value::String(s),
            JsonValue::Array(items) => Value::List(items.into_iter().map(Value::from).collect()),
            JsonValue::Object(map) => Value::Object(
                map.into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect(),
            ),
        }
    }
}

/// A plain, mutable object, describing a subject to write.
///
/// Clones share the same entries,
/// so object literals may reference each other (even cyclically).
#[derive(Clone, Default)]
pub struct ObjectLiteral(Rc<RefCell<BTreeMap<String, Value>>>);

impl ObjectLiteral {
    /// An empty object.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key` to `value`, and return this object.
    pub fn with<V: Into<Value>>(self, key: &str, value: V) -> Self {
        self.set(key, value);
        self
    }

    /// Set `key` to `value`.
    pub fn set<V: Into<Value>>(&self, key: &str, value: V) {
        self.0.borrow_mut().insert(key.to_string(), value.into());
    }

    /// The value of `key`, if any.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.0.borrow().get(key).cloned()
    }

    /// Remove `key`, returning its value.
    pub fn remove(&self, key: &str) -> Option<Value> {
        self.0.borrow_mut().remove(key)
    }

    /// The keys of this object, sorted.
    pub fn keys(&self) -> Vec<String> {
        self.0.borrow().keys().cloned().collect()
    }

    /// A snapshot of the entries of this object.
    pub fn entries(&self) -> Vec<(String, Value)> {
        self.0
            .borrow()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Whether `self` and `other` share the same entries.
    pub fn ptr_eq(&self, other: &ObjectLiteral) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn addr(&self) -> *const () {
        Rc::as_ptr(&self.0) as *const ()
    }
}

impl FromIterator<(String, Value)> for ObjectLiteral {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        ObjectLiteral(Rc::new(RefCell::new(iter.into_iter().collect())))
    }
}

// Only keys are shown, since values may refer back to this object.
impl fmt::Debug for ObjectLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectLiteral{:?}", self.keys())
    }
}

/// The native value of a literal.
///
/// Booleans and numeric XSD types are converted when their lexical form is valid;
/// every other literal reads as its lexical form.
pub fn literal_to_value(literal: &Literal) -> Value {
    let datatype = literal.datatype();
    let lexical = literal.value();
    if datatype == xsd::boolean {
        match lexical {
            "true" | "1" => return Value::Boolean(true),
            "false" | "0" => return Value::Boolean(false),
            _ => {}
        }
    } else if xsd::is_numeric(datatype) {
        if let Ok(n) = lexical.trim().parse::<f64>() {
            return Value::Number(n);
        }
    }
    Value::String(lexical.to_string())
}

/// The literal for a scalar `value`, or `None` if `value` is not a scalar.
///
/// A declared literal datatype is used as is;
/// otherwise it is inferred from the value.
pub(crate) fn value_to_literal(
    value: &Value,
    datatype: Option<&DataType>,
) -> Result<Option<Term>, TermError> {
    let lexical = match value {
        Value::Boolean(b) => b.to_string(),
        Value::Number(n) => number_lexical(*n),
        Value::String(s) => s.clone(),
        _ => return Ok(None),
    };
    let literal = match (datatype, value) {
        (Some(DataType::Literal(dt)), _) if dt != rdf::langString => {
            Term::typed_literal(lexical, dt)?
        }
        (_, Value::Boolean(_)) => Term::typed_literal(lexical, xsd::boolean)?,
        (_, Value::Number(n)) if is_integral(*n) => Term::typed_literal(lexical, xsd::integer)?,
        (_, Value::Number(_)) => Term::typed_literal(lexical, xsd::double)?,
        _ => Term::literal(lexical),
    };
    Ok(Some(literal))
}

/// The JSON form of a scalar value (`null` for anything else).
pub(crate) fn scalar_to_json(value: &Value) -> JsonValue {
    match value {
        Value::Boolean(b) => JsonValue::Bool(*b),
        Value::Number(n) if is_integral(*n) => JsonValue::from(*n as i64),
        Value::Number(n) => serde_json::Number::from_f64(*n)
            .map(JsonValue::Number)
            .unwrap_or(JsonValue::Null),
        Value::String(s) => JsonValue::String(s.clone()),
        _ => JsonValue::Null,
    }
}

fn is_integral(n: f64) -> bool {
    n.is_finite() && n.fract() == 0.0 && n.abs() < 9.0e15
}

fn number_lexical(n: f64) -> String {
    if is_integral(n) {
        (n as i64).to_string()
    } else {
        n.to_string()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;
    use test_case::test_case;

    #[test_case("true", xsd::boolean => Value::Boolean(true); "boolean true")]
    #[test_case("0", xsd::boolean => Value::Boolean(false); "boolean zero")]
    #[test_case("maybe", xsd::boolean => Value::String("maybe".into()); "invalid boolean")]
    #[test_case("42", xsd::integer => Value::Number(42.0); "integer")]
    #[test_case("1.5", xsd::decimal => Value::Number(1.5); "decimal")]
    #[test_case("abc", xsd::double => Value::String("abc".into()); "invalid double")]
    #[test_case("2024-01-01", xsd::date => Value::String("2024-01-01".into()); "date")]
    fn reading_literals(lexical: &str, datatype: &str) -> Value {
        let term = Term::typed_literal(lexical, datatype).unwrap();
        literal_to_value(term.as_literal().unwrap())
    }

    #[test_case(Value::Boolean(true), None => Some(("true".to_string(), xsd::boolean)); "inferred boolean")]
    #[test_case(Value::Number(3.0), None => Some(("3".to_string(), xsd::integer)); "inferred integer")]
    #[test_case(Value::Number(0.5), None => Some(("0.5".to_string(), xsd::double)); "inferred double")]
    #[test_case(Value::String("x".into()), None => Some(("x".to_string(), xsd::string)); "inferred string")]
    #[test_case(Value::Number(3.0), Some(DataType::Literal(xsd::decimal.into())) => Some(("3".to_string(), xsd::decimal)); "declared")]
    #[test_case(Value::Null, None => None; "not a scalar")]
    fn writing_literals(value: Value, datatype: Option<DataType>) -> Option<(String, &'static str)> {
        let term = value_to_literal(&value, datatype.as_ref()).unwrap()?;
        let dt = [xsd::boolean, xsd::integer, xsd::double, xsd::string, xsd::decimal]
            .into_iter()
            .find(|dt| term.datatype() == Some(*dt))
            .unwrap();
        Some((term.value().to_string(), dt))
    }

    #[test]
    fn json_conversion() {
        let value = Value::from(json!({"name": "Alice", "age": 30, "tags": ["a", "b"]}));
        let Value::Object(obj) = value else {
            panic!("expected an object")
        };
        assert_eq!(obj.keys(), vec!["age", "name", "tags"]);
        assert_eq!(obj.get("age"), Some(Value::Number(30.0)));
        assert_eq!(
            obj.get("tags"),
            Some(Value::List(vec!["a".into(), "b".into()]))
        );
        assert_eq!(scalar_to_json(&Value::Number(30.0)), json!(30));
        assert_eq!(scalar_to_json(&Value::Number(0.25)), json!(0.25));
    }

    #[test]
    fn object_literals_share_entries() {
        let a = ObjectLiteral::new().with("name", "A");
        let b = ObjectLiteral::new().with("friend", a.clone());
        a.set("friend", b.clone());
        assert!(a.clone().ptr_eq(&a));
        assert!(!a.ptr_eq(&b));
        assert_eq!(format!("{a:?}"), r#"ObjectLiteral["friend", "name"]"#);
        assert_eq!(b.get("friend"), Some(Value::Object(a)));
    }
}
