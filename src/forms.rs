//! Form definitions for the add and edit pages.
//!
//! Each form lists its fields as [`FieldRule`]s; [`check_fields`] applies the
//! presence and length rules, and the form adds whatever parsing it needs on top.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::models::REVIEW_MAX_LEN;

#[derive(Clone, Copy, Debug)]
pub struct FieldRule {
    pub name: &'static str,
    pub label: &'static str,
    pub required: bool,
    pub max_len: Option<usize>,
}

/// Field name to the message shown under that field.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    pub fn insert(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

pub fn check_fields<'a>(
    rules: &[FieldRule],
    value_of: impl Fn(&str) -> &'a str,
) -> FieldErrors {
    let mut errors = FieldErrors::default();
    for rule in rules {
        let value = value_of(rule.name).trim();
        if rule.required && value.is_empty() {
            errors.insert(rule.name, "This field is required.");
            continue;
        }
        if let Some(max) = rule.max_len.filter(|&max| value.chars().count() > max) {
            errors.insert(rule.name, format!("Must be at most {max} characters."));
        }
    }
    errors
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct AddForm {
    #[serde(default)]
    pub new_movie: String,
}

impl AddForm {
    pub const FIELDS: &'static [FieldRule] =
        &[FieldRule { name: "new_movie", label: "Movie Title", required: true, max_len: None }];
    pub const SUBMIT: &'static str = "Add Movie";

    /// The trimmed search query.
    pub fn validate(&self) -> Result<String, FieldErrors> {
        let errors = check_fields(Self::FIELDS, |_| self.new_movie.as_str());
        if errors.is_empty() { Ok(self.new_movie.trim().to_string()) } else { Err(errors) }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct EditForm {
    #[serde(default)]
    pub rating: String,
    #[serde(default)]
    pub review: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ValidEdit {
    pub rating: f64,
    pub review: String,
}

impl EditForm {
    pub const FIELDS: &'static [FieldRule] = &[
        FieldRule {
            name: "rating",
            label: "Your Rating Out of 10 e.g. 7.5",
            required: true,
            max_len: None,
        },
        FieldRule {
            name: "review",
            label: "Your Review",
            required: true,
            max_len: Some(REVIEW_MAX_LEN),
        },
    ];
    pub const SUBMIT: &'static str = "Done";

    pub fn value(&self, field: &str) -> &str {
        match field {
            "rating" => &self.rating,
            "review" => &self.review,
            _ => "",
        }
    }

    /// Rating has to read as a number; its range is left to the user.
    pub fn validate(&self) -> Result<ValidEdit, FieldErrors> {
        let mut errors = check_fields(Self::FIELDS, |field| self.value(field));

        let rating = self.rating.trim().parse::<f64>().ok().filter(|r| r.is_finite());
        if rating.is_none() {
            errors.insert("rating", "Enter a number, e.g. 7.5.");
        }

        match rating {
            Some(rating) if errors.is_empty() => {
                Ok(ValidEdit { rating, review: self.review.trim().to_string() })
            },
            _ => Err(errors),
        }
    }
}
