use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// Join form as posted by the client. Missing strings deserialize empty so
// validation can report every field at once.
#[derive(Deserialize, Serialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ApplicationForm {
    pub full_name: String,
    pub email: String,
    pub phone_number: String,
    pub year: String,
    pub branch: String,
    pub first_choice: String,
    pub second_choice: String,
    pub motivation: String,
    pub contribution: String,
    pub additional_info: Option<String>,
    pub recaptcha_token: String,
}

// Stored application - the form minus the bot token
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRecord {
    pub full_name: String,
    pub email: String,
    pub phone_number: String,
    pub year: String,
    pub branch: String,
    pub first_choice: String,
    pub second_choice: String,
    pub motivation: String,
    pub contribution: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_info: Option<String>,
    pub submitted_at: DateTime<Utc>,
    pub user_email: String,
}

impl SubmissionRecord {
    pub fn from_form(form: ApplicationForm, user_email: &str) -> Self {
        Self {
            full_name: form.full_name,
            email: form.email,
            phone_number: form.phone_number,
            year: form.year,
            branch: form.branch,
            first_choice: form.first_choice,
            second_choice: form.second_choice,
            motivation: form.motivation,
            contribution: form.contribution,
            additional_info: form.additional_info,
            submitted_at: Utc::now(),
            user_email: user_email.to_owned(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct SubmitResponse {
    pub message: String,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionStatus {
    pub has_submitted: bool,
    pub registrations_open: bool,
}
