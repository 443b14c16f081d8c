use std::collections::BTreeMap;

use super::schema::{FieldKind, FormSchema};
use super::state::{FieldValue, FormState};

pub const REQUIRED_MESSAGE: &str = "This field is required";

pub type ErrorMap = BTreeMap<String, String>;

/// Reports every required id whose value is missing or blank. Pure: the
/// same input always yields the same map.
pub fn validate<I, S>(state: &FormState, required_ids: I) -> ErrorMap
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut errors = ErrorMap::new();
    for id in required_ids {
        let id = id.as_ref();
        let missing = state.get(id).map(FieldValue::is_blank).unwrap_or(true);
        if missing {
            errors.insert(id.to_string(), REQUIRED_MESSAGE.to_string());
        }
    }
    errors
}

/// Required-field check plus option-set membership for choice fields.
pub fn validate_form(schema: &FormSchema, state: &FormState) -> ErrorMap {
    let mut errors = validate(state, schema.required_ids());

    for field in schema.fields() {
        if errors.contains_key(&field.id) {
            continue;
        }
        let Some(value) = state.get(&field.id) else {
            continue;
        };
        let problem = match (field.kind, value) {
            (FieldKind::MultiChoice, FieldValue::List(items)) => {
                let mut seen: Vec<&str> = Vec::with_capacity(items.len());
                let mut problem = None;
                for item in items {
                    if !field.offers(item) {
                        problem = Some(format!("`{}` is not one of the offered options", item));
                        break;
                    }
                    if seen.contains(&item.as_str()) {
                        problem = Some(format!("`{}` is selected more than once", item));
                        break;
                    }
                    seen.push(item.as_str());
                }
                problem
            }
            (FieldKind::SingleChoice, FieldValue::Text(s)) => {
                let s = s.trim();
                if !s.is_empty() && !field.offers(s) {
                    Some(format!("`{}` is not one of the offered options", s))
                } else {
                    None
                }
            }
            (FieldKind::MultiChoice, _) => Some("Expected a list of options".to_string()),
            (FieldKind::Media, FieldValue::Media(_)) => None,
            (FieldKind::Media, _) => Some("Expected a recorded video".to_string()),
            (_, FieldValue::Text(_)) => None,
            (_, _) => Some("Expected a text answer".to_string()),
        };
        if let Some(message) = problem {
            errors.insert(field.id.clone(), message);
        }
    }

    errors
}
