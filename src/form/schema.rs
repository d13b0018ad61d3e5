use serde_json::{Map, Value};

use crate::error::ClientError;
use crate::models::ResourceKind;

/// How a field is filled from a loaded record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldSource {
    /// Copied from the server field of the same name
    Server,
    /// Never prefilled (passwords)
    Blank,
    /// Array of objects reduced to their `id`s
    Ids,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    /// Value on a fresh create form
    pub initial: Value,
    /// Value when the loaded record lacks the field or has it null
    pub fallback: Value,
    pub source: FieldSource,
}

impl FieldSpec {
    pub fn text(name: &'static str) -> Self {
        Self {
            name,
            initial: Value::from(""),
            fallback: Value::from(""),
            source: FieldSource::Server,
        }
    }

    pub fn blank(name: &'static str) -> Self {
        Self {
            source: FieldSource::Blank,
            ..Self::text(name)
        }
    }

    pub fn ids(name: &'static str) -> Self {
        Self {
            name,
            initial: Value::Array(Vec::new()),
            fallback: Value::Array(Vec::new()),
            source: FieldSource::Ids,
        }
    }

    pub fn with_initial(mut self, value: impl Into<Value>) -> Self {
        self.initial = value.into();
        self
    }

    pub fn with_fallback(mut self, value: impl Into<Value>) -> Self {
        self.fallback = value.into();
        self
    }

    fn from_record(&self, record: &Map<String, Value>) -> Value {
        match self.source {
            FieldSource::Blank => self.initial.clone(),
            FieldSource::Server => match record.get(self.name) {
                None | Some(Value::Null) => self.fallback.clone(),
                Some(value) => value.clone(),
            },
            FieldSource::Ids => match record.get(self.name) {
                Some(Value::Array(items)) => Value::Array(
                    items
                        .iter()
                        .filter_map(|item| match item {
                            Value::Object(obj) => obj.get("id").cloned(),
                            Value::Number(_) => Some(item.clone()),
                            _ => None,
                        })
                        .collect(),
                ),
                _ => self.fallback.clone(),
            },
        }
    }
}

/// Pair of fields that must match before a submit is sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordConfirmation {
    pub password: &'static str,
    pub confirmation: &'static str,
    /// When false an empty password skips the check (keep current password)
    pub required: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormSchema {
    pub kind: ResourceKind,
    pub fields: Vec<FieldSpec>,
    pub confirmation: Option<PasswordConfirmation>,
}

impl FormSchema {
    pub fn for_kind(kind: ResourceKind) -> Self {
        let fields = match kind {
            ResourceKind::Users => vec![
                FieldSpec::text("name"),
                FieldSpec::text("email"),
                FieldSpec::blank("password"),
                FieldSpec::text("role").with_initial("staff").with_fallback("staff"),
            ],
            ResourceKind::Roles => vec![
                FieldSpec::text("label"),
                FieldSpec::text("description"),
                FieldSpec::ids("permissions"),
            ],
            ResourceKind::Permissions => vec![
                FieldSpec::text("module"),
                FieldSpec::text("label"),
                FieldSpec::text("description"),
            ],
            ResourceKind::MasterData => vec![
                FieldSpec::text("type"),
                FieldSpec::text("name"),
                FieldSpec::text("code"),
                FieldSpec::text("parent_id"),
                FieldSpec::text("description"),
                FieldSpec::text("status").with_initial(1),
            ],
        };
        Self {
            kind,
            fields,
            confirmation: None,
        }
    }

    pub fn with_confirmation(mut self, confirmation: PasswordConfirmation) -> Self {
        if !self.fields.iter().any(|f| f.name == confirmation.confirmation) {
            self.fields.push(FieldSpec::blank(confirmation.confirmation));
        }
        self.confirmation = Some(confirmation);
        self
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn initial_values(&self) -> Map<String, Value> {
        self.fields
            .iter()
            .map(|f| (f.name.to_string(), f.initial.clone()))
            .collect()
    }

    /// Map a loaded record onto the form's fields
    pub fn values_from(&self, record: &Value) -> Map<String, Value> {
        let empty = Map::new();
        let record = record.as_object().unwrap_or(&empty);
        self.fields
            .iter()
            .map(|f| (f.name.to_string(), f.from_record(record)))
            .collect()
    }
}

/// Blocks with `PasswordMismatch` unless both entries agree
///
/// With `required == false` an empty password passes untouched.
pub fn check_password_confirmation(password: &str, confirmation: &str, required: bool) -> Result<(), ClientError> {
    if !required && password.is_empty() {
        return Ok(());
    }
    if password != confirmation {
        return Err(ClientError::PasswordMismatch);
    }
    Ok(())
}
