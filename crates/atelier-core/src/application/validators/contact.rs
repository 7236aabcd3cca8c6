//! Contact form validation
//!
//! Validates the contact-form fields as a unit: every failing field is
//! reported, and nothing is persisted until the whole form passes.

use crate::application::errors::FieldErrors;
use serde::{Deserialize, Serialize};

const NAME_MAX: usize = 100;
const EMAIL_MAX: usize = 254;
const PHONE_MAX: usize = 20;
const COMPANY_MAX: usize = 100;
const SUBJECT_MAX: usize = 200;

/// Raw contact-form input, exactly as submitted
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    /// ID of an existing service, if the visitor picked one
    pub service: Option<String>,
    pub subject: String,
    pub message: String,
    pub budget: Option<String>,
}

/// Normalized contact submission ready for persistence
#[derive(Debug, Clone, PartialEq)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub service_id: Option<String>,
    pub subject: String,
    pub message: String,
    pub budget: Option<f64>,
}

/// Validator for contact-form submissions
pub struct ContactValidator;

impl ContactValidator {
    /// Validate a raw form. Returns the normalized field set on success,
    /// or every field-level error on failure.
    ///
    /// The service reference is normalized here but checked against the
    /// record store by the submission workflow.
    pub fn validate(form: &ContactForm) -> Result<ContactSubmission, FieldErrors> {
        let mut errors = FieldErrors::new();

        let name = form.name.trim();
        if name.is_empty() {
            errors.add("name", "This field is required.");
        } else if name.len() > NAME_MAX {
            errors.add("name", format!("Ensure this value has at most {NAME_MAX} characters."));
        }

        let email = form.email.trim();
        if email.is_empty() {
            errors.add("email", "This field is required.");
        } else if email.len() > EMAIL_MAX || !is_valid_email(email) {
            errors.add("email", "Enter a valid email address.");
        }

        let subject = form.subject.trim();
        if subject.is_empty() {
            errors.add("subject", "This field is required.");
        } else if subject.len() > SUBJECT_MAX {
            errors.add(
                "subject",
                format!("Ensure this value has at most {SUBJECT_MAX} characters."),
            );
        }

        let message = form.message.trim();
        if message.is_empty() {
            errors.add("message", "This field is required.");
        }

        let phone = normalize_optional(&form.phone);
        if let Some(phone) = &phone {
            if phone.len() > PHONE_MAX {
                errors.add(
                    "phone",
                    format!("Ensure this value has at most {PHONE_MAX} characters."),
                );
            }
        }

        let company = normalize_optional(&form.company);
        if let Some(company) = &company {
            if company.len() > COMPANY_MAX {
                errors.add(
                    "company",
                    format!("Ensure this value has at most {COMPANY_MAX} characters."),
                );
            }
        }

        let budget = match normalize_optional(&form.budget) {
            Some(raw) => match raw.parse::<f64>() {
                Ok(value) if value.is_finite() && value >= 0.0 => Some(value),
                _ => {
                    errors.add("budget", "Enter a number.");
                    None
                }
            },
            None => None,
        };

        let service_id = normalize_optional(&form.service);

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(ContactSubmission {
            name: name.to_string(),
            email: email.to_string(),
            phone,
            company,
            service_id,
            subject: subject.to_string(),
            message: message.to_string(),
            budget,
        })
    }
}

/// Trim an optional field; blank input counts as absent
fn normalize_optional(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Structural email check: one '@', a non-empty local part, and a dotted
/// domain without whitespace
fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    if local.is_empty() || domain.contains('@') {
        return false;
    }

    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> ContactForm {
        ContactForm {
            name: "Juma Kessy".to_string(),
            email: "juma@example.com".to_string(),
            phone: Some("+255 700 000 000".to_string()),
            company: Some("Kessy Traders".to_string()),
            service: None,
            subject: "Website quote".to_string(),
            message: "I need a site for my shop.".to_string(),
            budget: Some("2500000".to_string()),
        }
    }

    #[test]
    fn test_valid_form_is_normalized() {
        let mut form = valid_form();
        form.name = "  Juma Kessy  ".to_string();
        form.budget = Some(" 2500000 ".to_string());

        let submission = ContactValidator::validate(&form).expect("form should pass");
        assert_eq!(submission.name, "Juma Kessy");
        assert_eq!(submission.budget, Some(2_500_000.0));
        assert_eq!(submission.phone, Some("+255 700 000 000".to_string()));
    }

    #[test]
    fn test_empty_name_rejected() {
        let mut form = valid_form();
        form.name = "   ".to_string();

        let errors = ContactValidator::validate(&form).unwrap_err();
        assert_eq!(errors.get("name"), Some("This field is required."));
    }

    #[test]
    fn test_empty_subject_rejected() {
        let mut form = valid_form();
        form.subject = String::new();

        let errors = ContactValidator::validate(&form).unwrap_err();
        assert!(errors.get("subject").is_some());
    }

    #[test]
    fn test_empty_message_rejected() {
        let mut form = valid_form();
        form.message = String::new();

        let errors = ContactValidator::validate(&form).unwrap_err();
        assert!(errors.get("message").is_some());
    }

    #[test]
    fn test_malformed_email_rejected() {
        for bad in ["plainaddress", "no@dot", "two@@example.com", "with space@example.com", "@example.com"] {
            let mut form = valid_form();
            form.email = bad.to_string();

            let errors = ContactValidator::validate(&form).unwrap_err();
            assert_eq!(
                errors.get("email"),
                Some("Enter a valid email address."),
                "'{bad}' should be rejected"
            );
        }
    }

    #[test]
    fn test_all_errors_reported_at_once() {
        let form = ContactForm::default();

        let errors = ContactValidator::validate(&form).unwrap_err();
        assert_eq!(errors.len(), 4);
        for field in ["name", "email", "subject", "message"] {
            assert!(errors.get(field).is_some(), "missing error for '{field}'");
        }
    }

    #[test]
    fn test_blank_optionals_are_absent() {
        let mut form = valid_form();
        form.phone = Some("   ".to_string());
        form.company = Some(String::new());
        form.budget = None;

        let submission = ContactValidator::validate(&form).unwrap();
        assert_eq!(submission.phone, None);
        assert_eq!(submission.company, None);
        assert_eq!(submission.budget, None);
    }

    #[test]
    fn test_unparseable_budget_rejected() {
        for bad in ["a lot", "1,000", "-50", "NaN"] {
            let mut form = valid_form();
            form.budget = Some(bad.to_string());

            let errors = ContactValidator::validate(&form).unwrap_err();
            assert_eq!(errors.get("budget"), Some("Enter a number."), "'{bad}'");
        }
    }

    #[test]
    fn test_over_length_fields_rejected() {
        let mut form = valid_form();
        form.name = "n".repeat(101);
        form.subject = "s".repeat(201);
        form.phone = Some("1".repeat(21));
        form.company = Some("c".repeat(101));

        let errors = ContactValidator::validate(&form).unwrap_err();
        assert_eq!(errors.len(), 4);
    }

    #[test]
    fn test_is_valid_email() {
        assert!(is_valid_email("a@b.co"));
        assert!(is_valid_email("first.last+tag@sub.example.com"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a b@c.com"));
        assert!(!is_valid_email("a@.com"));
        assert!(!is_valid_email("a@b."));
    }
}
