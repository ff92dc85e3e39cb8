use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Declared value type of a policy or object property.
///
/// Known variants keep serialization consistent; `Other` preserves forward
/// compatibility with schema files that introduce new type strings. An
/// unknown type never blocks validation (`matches` is permissive for it).
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ValueType {
    Boolean,
    Integer,
    Number,
    String,
    Array,
    Object,
    Other(String),
}

impl ValueType {
    pub fn as_str(&self) -> &str {
        match self {
            ValueType::Boolean => "boolean",
            ValueType::Integer => "integer",
            ValueType::Number => "number",
            ValueType::String => "string",
            ValueType::Array => "array",
            ValueType::Object => "object",
            ValueType::Other(value) => value.as_str(),
        }
    }

    fn from_str(value: &str) -> Self {
        match value {
            "boolean" => ValueType::Boolean,
            "integer" => ValueType::Integer,
            "number" => ValueType::Number,
            "string" => ValueType::String,
            "array" => ValueType::Array,
            "object" => ValueType::Object,
            other => ValueType::Other(other.to_string()),
        }
    }

    /// Check a decoded JSON value against this declared type.
    ///
    /// The mapping consults the static tag of the decoded value: a boolean is
    /// never an integer or a number, integers are numbers whose JSON token
    /// carried no fraction or exponent, and unknown declared types match
    /// anything.
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            ValueType::Boolean => value.is_boolean(),
            ValueType::Integer => value.is_i64() || value.is_u64(),
            ValueType::Number => value.is_number(),
            ValueType::String => value.is_string(),
            ValueType::Array => value.is_array(),
            ValueType::Object => value.is_object(),
            ValueType::Other(_) => true,
        }
    }
}

/// Name of a decoded JSON value's runtime type, as used in issue messages.
pub fn runtime_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(number) => {
            if number.is_i64() || number.is_u64() {
                "integer"
            } else {
                "number"
            }
        }
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl Serialize for ValueType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ValueType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(Self::from_str(&value))
    }
}
