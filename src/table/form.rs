//! Field schemas behind the create/edit modals.
//!
//! A schema validates raw form values (the HTML `required`/`min`/`max`
//! rules plus format checks) and turns them into a JSON body that the
//! resource's typed payload is decoded from.

use serde::Serialize;
use serde_json::{Map, Number, Value};

use crate::error::ClientError;
use crate::models::validate;
use crate::models::wire_date;

/// Raw values keyed by field name, as collected from a form.
pub type FormValues = Map<String, Value>;

#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    Text,
    TextArea,
    Email,
    Password,
    Number,
    Date,
    Time,
    Select(Vec<&'static str>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormField {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub min: Option<f64>,
    pub max: Option<f64>,
    /// Number must be strictly above zero.
    pub positive: bool,
}

impl FormField {
    pub fn new(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            kind,
            required: false,
            min: None,
            max: None,
            positive: false,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
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

    pub fn positive(mut self) -> Self {
        self.positive = true;
        self
    }

    /// Select over every wire value of a status enum.
    pub fn select(name: &'static str, label: &'static str, options: impl IntoIterator<Item = &'static str>) -> Self {
        Self::new(name, label, FieldKind::Select(options.into_iter().collect()))
    }

    fn check(&self, value: Option<&Value>) -> Result<(), ClientError> {
        let text = value.and_then(as_text);
        let Some(text) = text.as_deref().filter(|t| !t.trim().is_empty()) else {
            return if self.required {
                Err(ClientError::validation(self.name, "is required"))
            } else {
                Ok(())
            };
        };

        match &self.kind {
            FieldKind::Email => validate::require_email(self.name, text),
            FieldKind::Time => validate::require_time_of_day(self.name, text),
            // Optional dates that do not parse are dropped from the payload instead.
            FieldKind::Date if self.required && wire_date::parse(text).is_none() => {
                Err(ClientError::validation(self.name, "must be a valid date"))
            }
            FieldKind::Number => {
                let n = text
                    .trim()
                    .parse::<f64>()
                    .ok()
                    .filter(|n| n.is_finite())
                    .ok_or_else(|| ClientError::validation(self.name, "must be a number"))?;
                if self.positive {
                    validate::require_positive(self.name, n)?;
                }
                if let Some(min) = self.min.filter(|min| n < *min) {
                    return Err(ClientError::validation(self.name, format!("must be at least {min}")));
                }
                if let Some(max) = self.max.filter(|max| n > *max) {
                    return Err(ClientError::validation(self.name, format!("must be at most {max}")));
                }
                Ok(())
            }
            FieldKind::Select(options) if !options.contains(&text.trim()) => Err(ClientError::validation(
                self.name,
                format!("must be one of: {}", options.join(", ")),
            )),
            _ => Ok(()),
        }
    }

    /// Wire value for a checked field, `None` when it should be omitted.
    fn to_wire(&self, value: &Value) -> Option<Value> {
        let text = as_text(value)?;
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        match self.kind {
            FieldKind::Number => number(text),
            FieldKind::Date => match wire_date::parse(text) {
                Some(date) => Some(Value::String(date.format("%Y-%m-%d").to_string())),
                None => {
                    tracing::warn!(field = self.name, value = text, "Dropping unparseable date");
                    None
                }
            },
            FieldKind::Password => Some(Value::String(value.as_str().unwrap_or(text).to_string())),
            _ => Some(Value::String(text.to_string())),
        }
    }
}

fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Whole numbers stay integers so they decode into unsigned fields.
fn number(text: &str) -> Option<Value> {
    if let Ok(n) = text.parse::<i64>() {
        return Some(Value::Number(n.into()));
    }
    let f: f64 = text.parse().ok()?;
    if f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
        return Some(Value::Number((f as i64).into()));
    }
    Number::from_f64(f).map(Value::Number)
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormSchema {
    pub fields: Vec<FormField>,
}

impl FormSchema {
    pub fn new(fields: Vec<FormField>) -> Self {
        Self { fields }
    }

    pub fn field(&self, name: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// First failing field, in schema order.
    pub fn validate(&self, values: &FormValues) -> Result<(), ClientError> {
        self.fields
            .iter()
            .try_for_each(|field| field.check(values.get(field.name)))
    }

    /// JSON body built from schema fields only. Blank optional values are
    /// omitted.
    pub fn to_payload(&self, values: &FormValues) -> Value {
        let body: Map<String, Value> = self
            .fields
            .iter()
            .filter_map(|field| {
                let wire = field.to_wire(values.get(field.name)?)?;
                Some((field.name.to_string(), wire))
            })
            .collect();
        Value::Object(body)
    }

    /// Edit-modal values taken from an existing row. Password fields are
    /// never pre-filled.
    pub fn prefill<T: Serialize>(&self, row: &T) -> FormValues {
        let Ok(Value::Object(source)) = serde_json::to_value(row) else {
            return FormValues::new();
        };
        self.fields
            .iter()
            .filter(|f| f.kind != FieldKind::Password)
            .filter_map(|f| match source.get(f.name) {
                None | Some(Value::Null) => None,
                Some(v) => Some((f.name.to_string(), v.clone())),
            })
            .collect()
    }
}
