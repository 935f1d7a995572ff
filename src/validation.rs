use serde::Serialize;
use std::collections::BTreeMap;

use crate::models::ApplicationForm;

const BRACKETS: [char; 6] = ['(', ')', '[', ']', '{', '}'];

// field name (client spelling) -> messages
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<&'static str, Vec<String>>);

impl FieldErrors {
    fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.keys().copied()
    }
}

pub fn validate(form: &ApplicationForm) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::default();

    min_chars(&mut errors, "fullName", &form.full_name, 2);
    if !is_email(&form.email) {
        errors.add("email", "Invalid email");
    }
    if form.phone_number.len() != 10 || !form.phone_number.bytes().all(|b| b.is_ascii_digit()) {
        errors.add("phoneNumber", "Phone number must be exactly 10 digits");
    }
    if !matches!(form.year.as_str(), "1" | "2" | "3" | "4") {
        errors.add("year", "Year must be one of 1, 2, 3, 4");
    }
    min_chars(&mut errors, "branch", &form.branch, 2);
    min_chars(&mut errors, "firstChoice", &form.first_choice, 1);
    min_chars(&mut errors, "secondChoice", &form.second_choice, 1);
    min_chars(&mut errors, "motivation", &form.motivation, 20);
    no_brackets(&mut errors, "motivation", &form.motivation);
    min_chars(&mut errors, "contribution", &form.contribution, 20);
    no_brackets(&mut errors, "contribution", &form.contribution);
    if let Some(info) = &form.additional_info {
        no_brackets(&mut errors, "additionalInfo", info);
    }
    min_chars(&mut errors, "recaptchaToken", &form.recaptcha_token, 1);

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

fn min_chars(errors: &mut FieldErrors, field: &'static str, value: &str, min: usize) {
    if value.chars().count() < min {
        errors.add(field, format!("Must contain at least {} character(s)", min));
    }
}

fn no_brackets(errors: &mut FieldErrors, field: &'static str, value: &str) {
    if value.contains(BRACKETS) {
        errors.add(field, "Brackets are not allowed");
    }
}

// local@domain.tld, no whitespace
fn is_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !value.chars().any(char::is_whitespace)
        && domain.split('.').count() >= 2
        && domain.split('.').all(|label| !label.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> ApplicationForm {
        ApplicationForm {
            full_name: "Ada Lovelace".into(),
            email: "ada@example.com".into(),
            phone_number: "9876543210".into(),
            year: "2".into(),
            branch: "Computer Science".into(),
            first_choice: "Web".into(),
            second_choice: "Design".into(),
            motivation: "I want to build things with people.".into(),
            contribution: "Workshops, code reviews and mentoring.".into(),
            additional_info: None,
            recaptcha_token: "token".into(),
        }
    }

    #[test]
    fn accepts_valid_form() {
        assert_eq!(validate(&valid_form()), Ok(()));
    }

    #[test]
    fn empty_form_reports_every_required_field() {
        let errors = validate(&ApplicationForm::default()).unwrap_err();
        let fields: Vec<_> = errors.fields().collect();
        for field in [
            "fullName",
            "email",
            "phoneNumber",
            "year",
            "branch",
            "firstChoice",
            "secondChoice",
            "motivation",
            "contribution",
            "recaptchaToken",
        ] {
            assert!(fields.contains(&field), "missing {field}");
        }
        assert!(errors.get("additionalInfo").is_none());
    }

    #[test]
    fn phone_must_be_ten_digits() {
        for bad in ["12345", "98765432101", "98765a3210", "+987654321"] {
            let form = ApplicationForm { phone_number: bad.into(), ..valid_form() };
            let errors = validate(&form).unwrap_err();
            assert!(errors.get("phoneNumber").is_some(), "{bad}");
        }
    }

    #[test]
    fn year_out_of_range() {
        let form = ApplicationForm { year: "5".into(), ..valid_form() };
        assert!(validate(&form).unwrap_err().get("year").is_some());
    }

    #[test]
    fn brackets_rejected_in_free_text() {
        let form = ApplicationForm {
            motivation: "I like {templates} and more text here".into(),
            additional_info: Some("see [link]".into()),
            ..valid_form()
        };
        let errors = validate(&form).unwrap_err();
        assert_eq!(errors.get("motivation").unwrap(), ["Brackets are not allowed"]);
        assert!(errors.get("additionalInfo").is_some());
        assert!(errors.get("contribution").is_none());
    }

    #[test]
    fn email_shapes() {
        assert!(is_email("a@b.co"));
        assert!(is_email("first.last+tag@mail.example.org"));
        assert!(!is_email("plain"));
        assert!(!is_email("@b.co"));
        assert!(!is_email("a@b"));
        assert!(!is_email("a@b..co"));
        assert!(!is_email("a@@b.co"));
        assert!(!is_email("a b@c.co"));
    }

    #[test]
    fn details_serialize_as_field_map() {
        let form = ApplicationForm { year: "9".into(), ..valid_form() };
        let errors = validate(&form).unwrap_err();
        let json = serde_json::to_value(&errors).unwrap();
        assert!(json["year"].is_array());
    }
}
