use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::forms::IntakeForm;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9_'+\-.]*[A-Za-z0-9_+\-]@([A-Za-z0-9][A-Za-z0-9\-]*\.)+[A-Za-z]{2,}$")
        .expect("email pattern compiles")
});

// Digits with an optional leading '+', spaces, parentheses and hyphens.
static PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\+?[\s()\-]*[0-9][0-9\s()\-]*$").expect("phone pattern compiles")
});

/// The rule a single field must satisfy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    /// Non-empty after trimming, at least `min_len` characters.
    Required { min_len: usize, message: &'static str },
    Email { message: &'static str },
    /// Empty, or shaped like a phone number.
    Phone { message: &'static str },
    /// Empty, or an absolute URL.
    Url { message: &'static str },
    /// A closed set of options. The field's type already guarantees membership.
    OneOf,
    Unconstrained,
}

/// What a form exposes for one of its fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    Selected,
}

impl Constraint {
    pub fn check(&self, value: FieldValue<'_>) -> Result<(), &'static str> {
        let text = match value {
            FieldValue::Text(text) => text,
            FieldValue::Selected => return Ok(()),
        };

        match *self {
            Constraint::Required { min_len, message } => {
                if text.trim().chars().count() >= min_len.max(1) {
                    Ok(())
                } else {
                    Err(message)
                }
            }
            Constraint::Email { message } => {
                if is_email(text) {
                    Ok(())
                } else {
                    Err(message)
                }
            }
            Constraint::Phone { message } => {
                if text.is_empty() || PHONE_RE.is_match(text) {
                    Ok(())
                } else {
                    Err(message)
                }
            }
            Constraint::Url { message } => {
                if text.is_empty() || url::Url::parse(text).is_ok() {
                    Ok(())
                } else {
                    Err(message)
                }
            }
            Constraint::OneOf | Constraint::Unconstrained => Ok(()),
        }
    }
}

fn is_email(text: &str) -> bool {
    if !EMAIL_RE.is_match(text) {
        return false;
    }
    let local = text.split('@').next().unwrap_or_default();
    !local.starts_with('.') && !text.contains("..")
}

/// Validation messages keyed by field. Empty means every checked field passed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors<F: Ord>(BTreeMap<F, &'static str>);

impl<F: Ord + Copy> FieldErrors<F> {
    pub fn new() -> Self {
        FieldErrors(BTreeMap::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: F) -> Option<&'static str> {
        self.0.get(&field).copied()
    }

    pub fn insert(&mut self, field: F, message: &'static str) {
        self.0.insert(field, message);
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Drops the entries for `fields`, keeping messages from other steps.
    pub fn clear_fields(&mut self, fields: &[F]) {
        for field in fields {
            self.0.remove(field);
        }
    }

    pub fn merge(&mut self, other: FieldErrors<F>) {
        self.0.extend(other.0);
    }

    pub fn iter(&self) -> impl Iterator<Item = (F, &'static str)> + '_ {
        self.0.iter().map(|(field, message)| (*field, *message))
    }
}

impl<F: Ord + Copy> Default for FieldErrors<F> {
    fn default() -> Self {
        Self::new()
    }
}

/// Validates only `fields`; anything else on the record is ignored.
pub fn validate_fields<T: IntakeForm>(record: &T, fields: &[T::Field]) -> FieldErrors<T::Field> {
    let mut errors = FieldErrors::new();
    for &field in fields {
        if let Err(message) = T::constraint(field).check(record.value(field)) {
            errors.insert(field, message);
        }
    }
    errors
}

pub fn validate_all<T: IntakeForm>(record: &T) -> FieldErrors<T::Field> {
    validate_fields(record, T::FIELDS)
}

#[cfg(test)]
mod tests {
    use super::*;

    const REQUIRED: Constraint = Constraint::Required {
        min_len: 2,
        message: "Name is required",
    };
    const EMAIL: Constraint = Constraint::Email {
        message: "Please enter a valid email",
    };
    const PHONE: Constraint = Constraint::Phone {
        message: "Invalid phone number",
    };
    const URL: Constraint = Constraint::Url {
        message: "Please enter a valid URL",
    };

    #[test]
    fn required_rejects_blank_and_short_values() {
        assert_eq!(REQUIRED.check(FieldValue::Text("")), Err("Name is required"));
        assert_eq!(REQUIRED.check(FieldValue::Text("   ")), Err("Name is required"));
        assert_eq!(REQUIRED.check(FieldValue::Text(" J ")), Err("Name is required"));
        assert_eq!(REQUIRED.check(FieldValue::Text("Jo")), Ok(()));
    }

    #[test]
    fn required_counts_characters_not_bytes() {
        assert_eq!(REQUIRED.check(FieldValue::Text("Ö")), Err("Name is required"));
        assert_eq!(REQUIRED.check(FieldValue::Text("Öz")), Ok(()));
    }

    #[test]
    fn email_shapes() {
        for good in ["jo@x.com", "first.last+tag@sub.example.org", "o'neil@pub.ie"] {
            assert_eq!(EMAIL.check(FieldValue::Text(good)), Ok(()), "{good}");
        }
        for bad in [
            "",
            "not-an-email",
            "jo@x",
            "@x.com",
            ".jo@x.com",
            "jo..b@x.com",
            "jo@-x.com",
            "jo@x.c",
        ] {
            assert!(EMAIL.check(FieldValue::Text(bad)).is_err(), "{bad}");
        }
    }

    #[test]
    fn phone_is_optional_but_shaped() {
        assert_eq!(PHONE.check(FieldValue::Text("")), Ok(()));
        assert_eq!(PHONE.check(FieldValue::Text("+1 (555) 000-0000")), Ok(()));
        assert_eq!(PHONE.check(FieldValue::Text("0401234567")), Ok(()));
        assert_eq!(PHONE.check(FieldValue::Text("call me")), Err("Invalid phone number"));
        assert_eq!(PHONE.check(FieldValue::Text("555-abc")), Err("Invalid phone number"));
        assert_eq!(PHONE.check(FieldValue::Text("+")), Err("Invalid phone number"));
    }

    #[test]
    fn url_is_optional_but_absolute() {
        assert_eq!(URL.check(FieldValue::Text("")), Ok(()));
        assert_eq!(URL.check(FieldValue::Text("https://g.page/doe")), Ok(()));
        assert_eq!(
            URL.check(FieldValue::Text("yourbusiness.com")),
            Err("Please enter a valid URL")
        );
        assert_eq!(URL.check(FieldValue::Text(" ")), Err("Please enter a valid URL"));
    }

    #[test]
    fn selections_always_pass() {
        assert_eq!(Constraint::OneOf.check(FieldValue::Selected), Ok(()));
        assert_eq!(REQUIRED.check(FieldValue::Selected), Ok(()));
        assert_eq!(Constraint::Unconstrained.check(FieldValue::Text("")), Ok(()));
    }

    #[test]
    fn clear_fields_keeps_other_entries() {
        let mut errors = FieldErrors::new();
        errors.insert(1u8, "one");
        errors.insert(2u8, "two");
        errors.clear_fields(&[1]);
        assert_eq!(errors.get(1), None);
        assert_eq!(errors.get(2), Some("two"));
        assert_eq!(errors.len(), 1);
    }
}
