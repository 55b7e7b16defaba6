//! Incoming feedback form and its validation table.
//!
//! # Responsibility
//! - Hold raw form values as received from an untrusted caller.
//! - Normalize values and run the static field validation table.
//!
//! # Invariants
//! - Validation never short-circuits: every failing row contributes one
//!   message, in table order.
//! - A successful validation always yields a `NewEntry` that passes
//!   `NewEntry::validate()`.

use crate::model::entry::NewEntry;
use crate::model::sanitize::{
    is_valid_email, sanitize_email, sanitize_message, sanitize_text_field,
};
use serde::{Deserialize, Serialize};

/// Raw feedback form values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

/// Form field identity with wire name and user-facing label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    FirstName,
    LastName,
    Email,
    Subject,
    Message,
}

impl FormField {
    /// Every field in form order.
    pub const ALL: [FormField; 5] = [
        Self::FirstName,
        Self::LastName,
        Self::Email,
        Self::Subject,
        Self::Message,
    ];

    /// Stable wire/request field name.
    pub fn name(self) -> &'static str {
        match self {
            Self::FirstName => "first_name",
            Self::LastName => "last_name",
            Self::Email => "email",
            Self::Subject => "subject",
            Self::Message => "message",
        }
    }

    /// User-facing label.
    pub fn label(self) -> &'static str {
        match self {
            Self::FirstName => "First name",
            Self::LastName => "Last name",
            Self::Email => "Email",
            Self::Subject => "Subject",
            Self::Message => "Message",
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum FieldRule {
    Required {
        missing: &'static str,
    },
    Email {
        missing: &'static str,
        malformed: &'static str,
    },
}

#[derive(Debug, Clone, Copy)]
struct FieldCheck {
    field: FormField,
    rule: FieldRule,
}

const FIELD_CHECKS: &[FieldCheck] = &[
    FieldCheck {
        field: FormField::FirstName,
        rule: FieldRule::Required {
            missing: "The First name field is required.",
        },
    },
    FieldCheck {
        field: FormField::LastName,
        rule: FieldRule::Required {
            missing: "The Last name field is required.",
        },
    },
    FieldCheck {
        field: FormField::Subject,
        rule: FieldRule::Required {
            missing: "The Subject field is required.",
        },
    },
    FieldCheck {
        field: FormField::Message,
        rule: FieldRule::Required {
            missing: "The Message field is required.",
        },
    },
    FieldCheck {
        field: FormField::Email,
        rule: FieldRule::Email {
            missing: "The Email field is invalid.",
            malformed: "The Email field is invalid: the address format is not valid.",
        },
    },
];

impl FieldRule {
    fn check(self, value: &str) -> Option<&'static str> {
        match self {
            Self::Required { missing } => value.is_empty().then_some(missing),
            Self::Email { missing, malformed } => {
                if value.is_empty() {
                    Some(missing)
                } else if !is_valid_email(value) {
                    Some(malformed)
                } else {
                    None
                }
            }
        }
    }
}

impl SubmissionForm {
    /// Returns the raw value for one field.
    pub fn value(&self, field: FormField) -> &str {
        match field {
            FormField::FirstName => &self.first_name,
            FormField::LastName => &self.last_name,
            FormField::Email => &self.email,
            FormField::Subject => &self.subject,
            FormField::Message => &self.message,
        }
    }

    /// Returns a mutable handle to one field value.
    pub fn value_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::FirstName => &mut self.first_name,
            FormField::LastName => &mut self.last_name,
            FormField::Email => &mut self.email,
            FormField::Subject => &mut self.subject,
            FormField::Message => &mut self.message,
        }
    }

    /// Applies per-field sanitizers.
    pub fn normalized(&self) -> SubmissionForm {
        SubmissionForm {
            first_name: sanitize_text_field(&self.first_name),
            last_name: sanitize_text_field(&self.last_name),
            email: sanitize_email(&self.email),
            subject: sanitize_text_field(&self.subject),
            message: sanitize_message(&self.message),
        }
    }

    /// Normalizes and validates the form.
    ///
    /// Returns every validation message in table order on failure.
    pub fn validate(&self) -> Result<NewEntry, Vec<String>> {
        let normalized = self.normalized();
        let errors = FIELD_CHECKS
            .iter()
            .filter_map(|check| check.rule.check(normalized.value(check.field)))
            .map(str::to_string)
            .collect::<Vec<_>>();

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(NewEntry {
            first_name: normalized.first_name,
            last_name: normalized.last_name,
            email: normalized.email,
            subject: normalized.subject,
            message: normalized.message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{FormField, SubmissionForm, FIELD_CHECKS};

    fn filled_form() -> SubmissionForm {
        SubmissionForm {
            first_name: " Ada ".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            subject: "Engines".to_string(),
            message: "Hello <em>there</em>".to_string(),
        }
    }

    #[test]
    fn every_field_has_exactly_one_check() {
        for field in FormField::ALL {
            let count = FIELD_CHECKS
                .iter()
                .filter(|check| check.field == field)
                .count();
            assert_eq!(count, 1, "field {} must be checked once", field.name());
        }
    }

    #[test]
    fn valid_form_yields_trimmed_entry() {
        let entry = filled_form().validate().expect("form should be valid");
        assert_eq!(entry.first_name, "Ada");
        assert_eq!(entry.message, "Hello <em>there</em>");
        assert_eq!(entry.validate(), Ok(()));
    }

    #[test]
    fn empty_form_collects_all_errors_in_table_order() {
        let errors = SubmissionForm::default()
            .validate()
            .expect_err("empty form must fail");
        assert_eq!(
            errors,
            vec![
                "The First name field is required.",
                "The Last name field is required.",
                "The Subject field is required.",
                "The Message field is required.",
                "The Email field is invalid.",
            ]
        );
    }

    #[test]
    fn whitespace_and_markup_only_values_count_as_missing() {
        let mut form = filled_form();
        form.subject = "  <b> </b> ".to_string();
        let errors = form.validate().expect_err("blank subject must fail");
        assert_eq!(errors, vec!["The Subject field is required."]);
    }

    #[test]
    fn malformed_email_gets_distinct_message() {
        let mut form = filled_form();
        form.email = "not-an-address".to_string();
        form.last_name = String::new();
        let errors = form.validate().expect_err("must fail");
        assert_eq!(
            errors,
            vec![
                "The Last name field is required.",
                "The Email field is invalid: the address format is not valid.",
            ]
        );
    }

    #[test]
    fn value_mut_targets_the_named_field() {
        let mut form = SubmissionForm::default();
        form.value_mut(FormField::Subject).push_str("Hi");
        assert_eq!(form.value(FormField::Subject), "Hi");
        assert!(form.value(FormField::Message).is_empty());
    }
}
