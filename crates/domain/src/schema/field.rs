//! Field descriptors: the nodes of a schema tree.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

/// Semantic type of a field and, for containers, the shape of its children.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    /// Plain text
    String,
    /// Numeric value
    Number,
    /// True/false flag
    Boolean,
    /// Roll formula stored as a string
    Formula {
        /// Formula must not contain dice terms
        deterministic: bool,
    },
    /// Rich text stored as a string
    Html,
    /// Ordered list of elements
    Array(Box<FieldDescriptor>),
    /// Ordered list without duplicates
    Set(Box<FieldDescriptor>),
    /// Open string-keyed map of uniformly typed values
    Mapping {
        value: Box<FieldDescriptor>,
        initial_keys: Vec<String>,
    },
    /// Nested object with a fixed field map
    Object(SchemaFields),
    /// Opaque object accepted as-is
    Any,
}

impl FieldKind {
    /// Name used in violation messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldKind::String => "string",
            FieldKind::Number => "number",
            FieldKind::Boolean => "boolean",
            FieldKind::Formula { .. } => "formula",
            FieldKind::Html => "html",
            FieldKind::Array(_) => "array",
            FieldKind::Set(_) => "set",
            FieldKind::Mapping { .. } => "mapping",
            FieldKind::Object(_) => "object",
            FieldKind::Any => "object",
        }
    }

    /// String-backed kinds share blank handling and casting rules.
    pub fn is_textual(&self) -> bool {
        matches!(
            self,
            FieldKind::String | FieldKind::Formula { .. } | FieldKind::Html
        )
    }
}

/// A single node in a schema tree.
///
/// Built with the chained constructors below, e.g.
/// `FieldDescriptor::number().required().integer().min(0.0).initial(1)`.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    pub kind: FieldKind,
    pub required: bool,
    pub nullable: bool,
    /// Whether an empty string is acceptable (textual kinds only)
    pub blank: bool,
    pub integer: bool,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub choices: Vec<String>,
    pub initial: Option<Value>,
    /// Display label, never interpreted by the engine
    pub label: Option<&'static str>,
}

impl FieldDescriptor {
    fn of(kind: FieldKind) -> Self {
        Self {
            kind,
            required: false,
            nullable: false,
            blank: true,
            integer: false,
            min: None,
            max: None,
            choices: Vec::new(),
            initial: None,
            label: None,
        }
    }

    pub fn string() -> Self {
        Self::of(FieldKind::String)
    }

    pub fn number() -> Self {
        Self::of(FieldKind::Number)
    }

    pub fn boolean() -> Self {
        Self::of(FieldKind::Boolean)
    }

    pub fn formula() -> Self {
        Self::of(FieldKind::Formula {
            deterministic: false,
        })
    }

    pub fn deterministic_formula() -> Self {
        Self::of(FieldKind::Formula {
            deterministic: true,
        })
    }

    pub fn html() -> Self {
        Self::of(FieldKind::Html)
    }

    pub fn array(element: FieldDescriptor) -> Self {
        Self::of(FieldKind::Array(Box::new(element)))
    }

    pub fn set(element: FieldDescriptor) -> Self {
        Self::of(FieldKind::Set(Box::new(element)))
    }

    pub fn mapping(value: FieldDescriptor) -> Self {
        Self::of(FieldKind::Mapping {
            value: Box::new(value),
            initial_keys: Vec::new(),
        })
    }

    pub fn object(fields: impl Into<SchemaFields>) -> Self {
        Self::of(FieldKind::Object(fields.into()))
    }

    pub fn any() -> Self {
        Self::of(FieldKind::Any)
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn not_blank(mut self) -> Self {
        self.blank = false;
        self
    }

    pub fn integer(mut self) -> Self {
        self.integer = true;
        self
    }

    pub fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    pub fn choices<I, S>(mut self, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.choices = choices.into_iter().map(Into::into).collect();
        self
    }

    pub fn initial(mut self, initial: impl Into<Value>) -> Self {
        self.initial = Some(initial.into());
        self
    }

    pub fn label(mut self, label: &'static str) -> Self {
        self.label = Some(label);
        self
    }

    /// Keys pre-populated when a mapping is constructed from nothing.
    pub fn initial_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if let FieldKind::Mapping { initial_keys, .. } = &mut self.kind {
            *initial_keys = keys.into_iter().map(Into::into).collect();
        }
        self
    }

    /// Value used when the source omits this field.
    ///
    /// `None` means the field has no default: it is omitted when optional and a
    /// violation when required.
    pub fn default_value(&self) -> Option<Value> {
        if let Some(initial) = &self.initial {
            return Some(initial.clone());
        }
        match &self.kind {
            kind if kind.is_textual() => {
                if self.blank {
                    Some(Value::String(String::new()))
                } else if self.nullable {
                    Some(Value::Null)
                } else {
                    None
                }
            }
            FieldKind::Boolean => Some(Value::Bool(false)),
            FieldKind::Array(_) | FieldKind::Set(_) => Some(Value::Array(Vec::new())),
            FieldKind::Mapping {
                value,
                initial_keys,
            } => {
                let mut map = Map::new();
                for key in initial_keys {
                    map.insert(key.clone(), value.default_value().unwrap_or(Value::Null));
                }
                Some(Value::Object(map))
            }
            // Nested objects are built field by field from an empty source.
            FieldKind::Object(_) | FieldKind::Any => Some(Value::Object(Map::new())),
            _ if self.nullable => Some(Value::Null),
            _ => None,
        }
    }

    /// The "empty" value substituted for `null` on a non-nullable field.
    pub fn empty_value(&self) -> Value {
        match self.default_value() {
            Some(value) if !value.is_null() => value,
            _ => match &self.kind {
                FieldKind::Number => Value::from(0),
                FieldKind::Boolean => Value::Bool(false),
                FieldKind::Array(_) | FieldKind::Set(_) => Value::Array(Vec::new()),
                FieldKind::Mapping { .. } | FieldKind::Object(_) | FieldKind::Any => {
                    Value::Object(Map::new())
                }
                _ => Value::String(String::new()),
            },
        }
    }
}

/// A named field map: the body of a template, an object field, or a whole subtype.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaFields(BTreeMap<String, FieldDescriptor>);

impl SchemaFields {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn get(&self, name: &str) -> Option<&FieldDescriptor> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Insert a field, returning the descriptor it replaced.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        field: FieldDescriptor,
    ) -> Option<FieldDescriptor> {
        self.0.insert(name.into(), field)
    }

    /// Merge another field map on top of this one.
    pub fn extend(&mut self, other: SchemaFields) {
        self.0.extend(other.0);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldDescriptor)> {
        self.0.iter().map(|(name, field)| (name.as_str(), field))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Resolve a dotted path such as `price.denomination` through nested objects.
    pub fn lookup(&self, path: &str) -> Option<&FieldDescriptor> {
        let mut segments = path.split('.');
        let mut field = self.get(segments.next()?)?;
        for segment in segments {
            field = match &field.kind {
                FieldKind::Object(fields) => fields.get(segment)?,
                _ => return None,
            };
        }
        Some(field)
    }
}

impl<const N: usize> From<[(&str, FieldDescriptor); N]> for SchemaFields {
    fn from(fields: [(&str, FieldDescriptor); N]) -> Self {
        fields.into_iter().collect()
    }
}

impl<'a> FromIterator<(&'a str, FieldDescriptor)> for SchemaFields {
    fn from_iter<T: IntoIterator<Item = (&'a str, FieldDescriptor)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(name, field)| (name.to_string(), field))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn builder_defaults_are_permissive() {
        let field = FieldDescriptor::string();
        assert!(!field.required);
        assert!(!field.nullable);
        assert!(field.blank);
        assert_eq!(field.default_value(), Some(json!("")));
    }

    #[test]
    fn explicit_initial_wins() {
        let field = FieldDescriptor::number().required().integer().initial(1);
        assert_eq!(field.default_value(), Some(json!(1)));
    }

    #[test]
    fn number_without_initial_has_no_default_unless_nullable() {
        assert_eq!(FieldDescriptor::number().default_value(), None);
        assert_eq!(
            FieldDescriptor::number().nullable().default_value(),
            Some(Value::Null)
        );
    }

    #[test]
    fn non_blank_string_without_initial_has_no_default() {
        assert_eq!(FieldDescriptor::string().not_blank().default_value(), None);
    }

    #[test]
    fn mapping_default_uses_initial_keys() {
        let field = FieldDescriptor::mapping(FieldDescriptor::boolean()).initial_keys(["fin", "lgt"]);
        assert_eq!(field.default_value(), Some(json!({"fin": false, "lgt": false})));
    }

    #[test]
    fn empty_value_falls_back_to_kind_zero() {
        assert_eq!(FieldDescriptor::number().empty_value(), json!(0));
        assert_eq!(FieldDescriptor::number().initial(30).empty_value(), json!(30));
        assert_eq!(FieldDescriptor::formula().empty_value(), json!(""));
    }

    #[test]
    fn lookup_walks_nested_objects() {
        let fields = SchemaFields::from([(
            "price",
            FieldDescriptor::object([
                ("value", FieldDescriptor::number().initial(0)),
                ("denomination", FieldDescriptor::string().initial("gp")),
            ]),
        )]);
        assert!(fields.lookup("price.denomination").is_some());
        assert!(fields.lookup("price.missing").is_none());
        assert!(fields.lookup("price.value.deeper").is_none());
    }
}
