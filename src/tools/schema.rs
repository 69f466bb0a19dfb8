//! Structural input schemas — typed field descriptors, mechanical validation.
//!
//! Every tool declares its arguments as data: name, type, bounds, required
//! flag. Validation walks the declaration before any handler runs, so a bad
//! invocation is rejected without side effects, and `to_json_schema` renders
//! the same declaration for tool listings. The two can never disagree.

use serde_json::{json, Map, Value};

// =============================================================================
// Field types
// =============================================================================

/// Argument type for tool inputs.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldType {
    String,
    /// Integer with optional inclusive bounds.
    Integer { min: Option<i64>, max: Option<i64> },
    Number,
    Boolean,
    /// Closed string set.
    Enum(Vec<String>),
}

impl FieldType {
    /// Unbounded integer shorthand.
    pub fn integer() -> Self {
        FieldType::Integer {
            min: None,
            max: None,
        }
    }

    /// Integer restricted to `min..=max`.
    pub fn integer_in(min: i64, max: i64) -> Self {
        FieldType::Integer {
            min: Some(min),
            max: Some(max),
        }
    }

    /// Integer within the unsigned 32-bit range.
    pub fn unsigned() -> Self {
        Self::integer_in(0, i64::from(u32::MAX))
    }

    /// Enum from string literals.
    pub fn one_of(variants: &[&str]) -> Self {
        FieldType::Enum(variants.iter().map(|v| (*v).to_string()).collect())
    }

    /// Validate a JSON value against this type.
    pub fn validate(&self, value: &Value) -> Result<(), String> {
        match self {
            FieldType::String => {
                if value.is_string() {
                    Ok(())
                } else {
                    Err(format!("expected string, got {}", value_type_name(value)))
                }
            }
            FieldType::Integer { min, max } => match value.as_i64() {
                Some(n) => {
                    if let Some(min) = min {
                        if n < *min {
                            return Err(format!("must be at least {}, got {}", min, n));
                        }
                    }
                    if let Some(max) = max {
                        if n > *max {
                            return Err(format!("must be at most {}, got {}", max, n));
                        }
                    }
                    Ok(())
                }
                None => Err(format!("expected integer, got {}", value_type_name(value))),
            },
            FieldType::Number => {
                if value.is_number() {
                    Ok(())
                } else {
                    Err(format!("expected number, got {}", value_type_name(value)))
                }
            }
            FieldType::Boolean => {
                if value.is_boolean() {
                    Ok(())
                } else {
                    Err(format!("expected boolean, got {}", value_type_name(value)))
                }
            }
            FieldType::Enum(variants) => {
                if let Some(s) = value.as_str() {
                    if variants.iter().any(|v| v == s) {
                        Ok(())
                    } else {
                        Err(format!(
                            "invalid value {:?}, expected one of: {}",
                            s,
                            variants.join(", ")
                        ))
                    }
                } else {
                    Err(format!(
                        "expected string for enum, got {}",
                        value_type_name(value)
                    ))
                }
            }
        }
    }

    /// JSON Schema fragment for this type.
    fn json_schema(&self, description: &str) -> Value {
        let mut fragment = match self {
            FieldType::String => json!({"type": "string"}),
            FieldType::Integer { min, max } => {
                let mut obj = json!({"type": "integer"});
                if let Some(min) = min {
                    obj["minimum"] = json!(min);
                }
                if let Some(max) = max {
                    obj["maximum"] = json!(max);
                }
                obj
            }
            FieldType::Number => json!({"type": "number"}),
            FieldType::Boolean => json!({"type": "boolean"}),
            FieldType::Enum(variants) => json!({"type": "string", "enum": variants}),
        };
        if !description.is_empty() {
            fragment["description"] = json!(description);
        }
        fragment
    }
}

fn value_type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// =============================================================================
// Field and schema definitions
// =============================================================================

/// A single declared argument.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDef {
    pub name: String,
    pub field_type: FieldType,
    pub description: String,
    pub required: bool,
}

/// Ordered argument declaration for one tool.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InputSchema {
    fields: Vec<FieldDef>,
}

impl InputSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a required argument.
    pub fn required(
        mut self,
        name: &str,
        field_type: FieldType,
        description: &str,
    ) -> Self {
        self.fields.push(FieldDef {
            name: name.to_string(),
            field_type,
            description: description.to_string(),
            required: true,
        });
        self
    }

    /// Add an optional argument.
    pub fn optional(
        mut self,
        name: &str,
        field_type: FieldType,
        description: &str,
    ) -> Self {
        self.fields.push(FieldDef {
            name: name.to_string(),
            field_type,
            description: description.to_string(),
            required: false,
        });
        self
    }

    /// Declared fields in declaration order.
    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    /// Validate arguments against the declaration.
    ///
    /// Returns every violation by argument name (empty = valid). Unknown
    /// arguments are violations; `null` for an optional argument is allowed
    /// and treated as absent.
    pub fn validate(&self, args: &Value) -> Vec<String> {
        let Some(map) = args.as_object() else {
            return vec!["arguments must be a JSON object".to_string()];
        };

        let mut errors = Vec::new();

        for field in &self.fields {
            match map.get(&field.name) {
                None | Some(Value::Null) => {
                    if field.required {
                        errors.push(format!("missing required argument: {}", field.name));
                    }
                }
                Some(value) => {
                    if let Err(e) = field.field_type.validate(value) {
                        errors.push(format!("argument {:?}: {}", field.name, e));
                    }
                }
            }
        }

        for key in map.keys() {
            if !self.fields.iter().any(|f| &f.name == key) {
                errors.push(format!("unknown argument: {}", key));
            }
        }

        errors
    }

    /// Render the declaration as a JSON Schema object for tool listings.
    pub fn to_json_schema(&self) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();
        for field in &self.fields {
            properties.insert(
                field.name.clone(),
                field.field_type.json_schema(&field.description),
            );
            if field.required {
                required.push(json!(field.name));
            }
        }
        json!({
            "type": "object",
            "properties": properties,
            "required": required,
            "additionalProperties": false,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
