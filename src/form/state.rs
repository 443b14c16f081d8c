use std::collections::BTreeMap;

use crate::capture::MediaObject;

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
    Media(MediaObject),
}

impl FieldValue {
    /// Whitespace-only text, an empty selection and a zero-length recording
    /// all count as "not answered".
    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Text(s) => s.trim().is_empty(),
            FieldValue::List(items) => items.is_empty(),
            FieldValue::Media(media) => media.is_empty(),
        }
    }
}

/// The applicant's answers, one entry per question id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormState {
    values: BTreeMap<String, FieldValue>,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_text(&mut self, id: &str, value: impl Into<String>) {
        self.values
            .insert(id.to_string(), FieldValue::Text(value.into()));
    }

    /// Stores a selection, dropping repeated entries but keeping the order in
    /// which options were first picked.
    pub fn set_list<I, S>(&mut self, id: &str, items: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut list: Vec<String> = Vec::new();
        for item in items {
            let item = item.into();
            if !list.contains(&item) {
                list.push(item);
            }
        }
        self.values.insert(id.to_string(), FieldValue::List(list));
    }

    pub fn toggle_option(&mut self, id: &str, option: &str, checked: bool) {
        let entry = self
            .values
            .entry(id.to_string())
            .or_insert_with(|| FieldValue::List(Vec::new()));
        if !matches!(entry, FieldValue::List(_)) {
            *entry = FieldValue::List(Vec::new());
        }
        if let FieldValue::List(list) = entry {
            let present = list.iter().any(|s| s == option);
            if checked && !present {
                list.push(option.to_string());
            } else if !checked {
                list.retain(|s| s != option);
            }
        }
    }

    pub fn set_media(&mut self, id: &str, media: MediaObject) {
        self.values.insert(id.to_string(), FieldValue::Media(media));
    }

    pub fn clear(&mut self, id: &str) -> Option<FieldValue> {
        self.values.remove(id)
    }

    pub fn get(&self, id: &str) -> Option<&FieldValue> {
        self.values.get(id)
    }

    pub fn text(&self, id: &str) -> Option<&str> {
        match self.values.get(id) {
            Some(FieldValue::Text(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn list(&self, id: &str) -> Option<&[String]> {
        match self.values.get(id) {
            Some(FieldValue::List(items)) => Some(items.as_slice()),
            _ => None,
        }
    }

    pub fn media(&self, id: &str) -> Option<&MediaObject> {
        match self.values.get(id) {
            Some(FieldValue::Media(m)) => Some(m),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
