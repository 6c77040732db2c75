//! Contact form: field state, submit control and the backend insert.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::FolioResult;
use crate::model::ContactSubmission;
use crate::store::{RecordStore, CONTACT_TABLE};

pub const FIELDS: [&str; 4] = ["name", "email", "phone", "message"];
pub const DEFAULT_SUBMIT_LABEL: &str = "Verstuur Bericht";
pub const SENDING_LABEL: &str = "Verzenden...";
pub const SUCCESS_MESSAGE: &str =
    "Bedankt voor je bericht! We nemen zo snel mogelijk contact met je op.";
pub const FAILURE_MESSAGE: &str =
    "Er is een fout opgetreden bij het verzenden. Probeer het later opnieuw.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitControl {
    pub label: String,
    pub disabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactForm {
    fields: BTreeMap<&'static str, String>,
    submit: SubmitControl,
    restore_label: Option<String>,
}

impl Default for ContactForm {
    fn default() -> Self {
        Self::new(DEFAULT_SUBMIT_LABEL)
    }
}

impl ContactForm {
    pub fn new(submit_label: &str) -> Self {
        Self {
            fields: FIELDS.iter().map(|f| (*f, String::new())).collect(),
            submit: SubmitControl {
                label: submit_label.to_string(),
                disabled: false,
            },
            restore_label: None,
        }
    }

    /// Set a named field. Unknown names are ignored; returns whether the field exists.
    pub fn set(&mut self, field: &str, value: impl Into<String>) -> bool {
        match self.fields.get_mut(field) {
            Some(slot) => {
                *slot = value.into();
                true
            }
            None => false,
        }
    }

    pub fn value(&self, field: &str) -> &str {
        self.fields.get(field).map(String::as_str).unwrap_or("")
    }

    pub fn submit_control(&self) -> &SubmitControl {
        &self.submit
    }

    pub fn is_sending(&self) -> bool {
        self.restore_label.is_some()
    }

    pub fn reset(&mut self) {
        for value in self.fields.values_mut() {
            value.clear();
        }
    }

    /// Lock the form for sending and serialise its fields. `None` while a send is in flight.
    pub fn begin_submit(&mut self) -> Option<ContactSubmission> {
        if self.is_sending() {
            return None;
        }
        self.restore_label = Some(std::mem::replace(
            &mut self.submit.label,
            SENDING_LABEL.to_string(),
        ));
        self.submit.disabled = true;

        let phone = self.value("phone").trim();
        Some(ContactSubmission {
            name: self.value("name").trim().to_string(),
            email: self.value("email").trim().to_string(),
            phone: (!phone.is_empty()).then(|| phone.to_string()),
            message: self.value("message").trim().to_string(),
        })
    }

    /// Clear the fields on success; re-enable the control and restore its label always.
    pub fn finish_submit(&mut self, outcome: &FolioResult<()>) {
        if outcome.is_ok() {
            self.reset();
        }
        if let Some(label) = self.restore_label.take() {
            self.submit.label = label;
        }
        self.submit.disabled = false;
    }
}

/// Sends one submission as a new `contact_submissions` row.
pub struct ContactSender {
    store: Arc<dyn RecordStore>,
}

impl ContactSender {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    pub async fn send(&self, submission: &ContactSubmission) -> FolioResult<()> {
        let rows = serde_json::json!([submission]);
        match self.store.insert(CONTACT_TABLE, rows).await {
            Ok(()) => {
                tracing::info!("[CONTACT] submission stored for {}", submission.email);
                Ok(())
            }
            Err(e) => {
                tracing::error!("[CONTACT] error submitting form: {}", e);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FolioError;

    fn filled() -> ContactForm {
        let mut form = ContactForm::default();
        form.set("name", "Sanne");
        form.set("email", "sanne@example.nl");
        form.set("phone", "  ");
        form.set("message", "Offerte graag");
        form
    }

    #[test]
    fn begin_submit_locks_control_and_serialises_fields() {
        let mut form = filled();
        let submission = form.begin_submit().unwrap();
        assert_eq!(submission.name, "Sanne");
        assert_eq!(submission.phone, None);
        assert_eq!(form.submit_control().label, SENDING_LABEL);
        assert!(form.submit_control().disabled);
        assert!(form.begin_submit().is_none());
    }

    #[test]
    fn finish_restores_control_in_both_outcomes() {
        let mut form = filled();
        form.begin_submit();
        form.finish_submit(&Err(FolioError::DataUnavailable("down".into())));
        assert_eq!(form.submit_control().label, DEFAULT_SUBMIT_LABEL);
        assert!(!form.submit_control().disabled);
        assert_eq!(form.value("name"), "Sanne");

        form.begin_submit();
        form.finish_submit(&Ok(()));
        assert_eq!(form.submit_control().label, DEFAULT_SUBMIT_LABEL);
        assert_eq!(form.value("name"), "");
        assert_eq!(form.value("message"), "");
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let mut form = ContactForm::default();
        assert!(!form.set("company", "ACME"));
        assert_eq!(form.value("company"), "");
    }
}
