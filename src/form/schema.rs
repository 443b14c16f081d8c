use std::collections::HashSet;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    ShortText,
    LongText,
    SingleChoice,
    MultiChoice,
    Media,
}

impl FieldKind {
    pub fn is_choice(self) -> bool {
        matches!(self, FieldKind::SingleChoice | FieldKind::MultiChoice)
    }

    pub fn is_list(self) -> bool {
        self == FieldKind::MultiChoice
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub id: String,
    pub label: String,
    pub section: String,
    pub kind: FieldKind,
    pub required: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

impl FieldDescriptor {
    pub fn new(id: &str, label: &str, section: &str, kind: FieldKind) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            section: section.to_string(),
            kind,
            required: false,
            options: Vec::new(),
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }

    pub fn offers(&self, value: &str) -> bool {
        self.options.iter().any(|o| o == value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("field id `{0}` is declared more than once")]
    DuplicateId(String),

    #[error("choice field `{0}` has no options")]
    MissingOptions(String),

    #[error("field `{0}` is not a choice field but declares options")]
    UnexpectedOptions(String),

    #[error("field `{field}` lists option `{option}` more than once")]
    DuplicateOption { field: String, option: String },

    #[error("field `{0}` has an empty id")]
    EmptyId(String),
}

/// Ordered field declarations for one form. Checked for internal
/// consistency once, at construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormSchema {
    fields: Vec<FieldDescriptor>,
}

impl FormSchema {
    pub fn new(fields: Vec<FieldDescriptor>) -> Result<Self, SchemaError> {
        let mut seen = HashSet::new();
        for field in &fields {
            if field.id.trim().is_empty() {
                return Err(SchemaError::EmptyId(field.label.clone()));
            }
            if !seen.insert(field.id.as_str()) {
                return Err(SchemaError::DuplicateId(field.id.clone()));
            }
            if field.kind.is_choice() {
                if field.options.is_empty() {
                    return Err(SchemaError::MissingOptions(field.id.clone()));
                }
                let mut opts = HashSet::new();
                for option in &field.options {
                    if !opts.insert(option.as_str()) {
                        return Err(SchemaError::DuplicateOption {
                            field: field.id.clone(),
                            option: option.clone(),
                        });
                    }
                }
            } else if !field.options.is_empty() {
                return Err(SchemaError::UnexpectedOptions(field.id.clone()));
            }
        }
        Ok(Self { fields })
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn field(&self, id: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.id == id)
    }

    pub fn required_ids(&self) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|f| f.required)
            .map(|f| f.id.as_str())
            .collect()
    }

    pub fn media_field(&self) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.kind == FieldKind::Media)
    }

    pub fn is_list_field(&self, id: &str) -> bool {
        self.field(id).map(|f| f.kind.is_list()).unwrap_or(false)
    }

    pub fn sections(&self) -> Vec<&str> {
        let mut sections: Vec<&str> = Vec::new();
        for field in &self.fields {
            if !sections.contains(&field.section.as_str()) {
                sections.push(field.section.as_str());
            }
        }
        sections
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(id: &str) -> FieldDescriptor {
        FieldDescriptor::new(id, id, "Basics", FieldKind::ShortText)
    }

    #[test]
    fn rejects_duplicate_ids() {
        let err = FormSchema::new(vec![text("email"), text("email")]).unwrap_err();
        assert_eq!(err, SchemaError::DuplicateId("email".into()));
    }

    #[test]
    fn choice_fields_need_options() {
        let field = FieldDescriptor::new("gender", "Gender", "Basics", FieldKind::SingleChoice);
        let err = FormSchema::new(vec![field]).unwrap_err();
        assert_eq!(err, SchemaError::MissingOptions("gender".into()));
    }

    #[test]
    fn text_fields_cannot_carry_options() {
        let field = text("age").with_options(["1", "2"]);
        let err = FormSchema::new(vec![field]).unwrap_err();
        assert_eq!(err, SchemaError::UnexpectedOptions("age".into()));
    }

    #[test]
    fn duplicate_options_are_rejected() {
        let field = FieldDescriptor::new("slots", "Slots", "Availability", FieldKind::MultiChoice)
            .with_options(["Morning", "Morning"]);
        assert!(matches!(
            FormSchema::new(vec![field]),
            Err(SchemaError::DuplicateOption { .. })
        ));
    }

    #[test]
    fn required_ids_follow_declaration_order() {
        let schema = FormSchema::new(vec![
            text("fullName").required(),
            text("gender"),
            text("email").required(),
        ])
        .unwrap();
        assert_eq!(schema.required_ids(), vec!["fullName", "email"]);
        assert_eq!(schema.sections(), vec!["Basics"]);
    }
}
