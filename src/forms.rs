//! Generic form-dialog state machine
//!
//! Owns open/closed state, field values, and submit/error/loading state for
//! any create-or-edit form. The payload is an untyped JSON map so one dialog
//! type serves every resource; domain validation stays with the caller, which
//! short-circuits before submitting (e.g. password confirmation equality).

use serde_json::{Map, Value};
use std::future::Future;

use crate::error::Error;

const FALLBACK_ERROR: &str = "An error occurred";

/// Dialog state for a single create/edit form
pub struct FormDialog {
    initial: Map<String, Value>,
    is_open: bool,
    form_data: Map<String, Value>,
    is_submitting: bool,
    error: Option<String>,
}

impl FormDialog {
    /// Create a closed dialog around an initial payload
    pub fn new(initial: Map<String, Value>) -> Self {
        Self {
            form_data: initial.clone(),
            initial,
            is_open: false,
            is_submitting: false,
            error: None,
        }
    }

    /// Create a dialog with an empty payload
    pub fn empty() -> Self {
        Self::new(Map::new())
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn is_submitting(&self) -> bool {
        self.is_submitting
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn form_data(&self) -> &Map<String, Value> {
        &self.form_data
    }

    /// Open the dialog with the initial payload
    pub fn open(&mut self) {
        self.is_open = true;
        self.error = None;
    }

    /// Open the dialog pre-filled for editing an existing entity
    pub fn open_with(&mut self, data: Map<String, Value>) {
        self.form_data = data;
        self.is_open = true;
        self.error = None;
    }

    /// Close the dialog and reset to the initial payload
    pub fn close(&mut self) {
        self.is_open = false;
        self.form_data = self.initial.clone();
        self.error = None;
    }

    /// Apply a single named-field update
    pub fn set_field(&mut self, name: &str, value: Value) {
        self.form_data.insert(name.to_string(), value);
    }

    /// Submit the current payload through a caller-supplied operation.
    ///
    /// On success all state resets to initial and the dialog closes. On
    /// failure the dialog stays open, `error` records the message (with a
    /// generic fallback for empty messages), and the error propagates.
    pub async fn handle_submit<F, Fut, T>(&mut self, op: F) -> Result<T, Error>
    where
        F: FnOnce(Map<String, Value>) -> Fut,
        Fut: Future<Output = Result<T, Error>>,
    {
        self.is_submitting = true;
        self.error = None;

        let result = op(self.form_data.clone()).await;
        self.is_submitting = false;

        match result {
            Ok(value) => {
                self.form_data = self.initial.clone();
                self.is_open = false;
                Ok(value)
            }
            Err(err) => {
                let message = err.to_string();
                self.error = Some(if message.is_empty() {
                    FALLBACK_ERROR.to_string()
                } else {
                    message
                });
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn initial() -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("name".to_string(), json!(""));
        map
    }

    #[tokio::test]
    async fn successful_submit_resets_and_closes() {
        let mut dialog = FormDialog::new(initial());
        dialog.open();
        dialog.set_field("name", json!("Acme"));
        assert_eq!(dialog.form_data()["name"], json!("Acme"));

        let result = dialog
            .handle_submit(|data| async move {
                assert_eq!(data["name"], json!("Acme"));
                Ok(())
            })
            .await;

        assert!(result.is_ok());
        assert!(!dialog.is_open());
        assert!(!dialog.is_submitting());
        assert_eq!(dialog.form_data()["name"], json!(""));
        assert!(dialog.error().is_none());
    }

    #[tokio::test]
    async fn failed_submit_keeps_dialog_open_with_error() {
        let mut dialog = FormDialog::new(initial());
        dialog.open();
        dialog.set_field("name", json!("Acme"));

        let result: Result<(), Error> = dialog
            .handle_submit(|_| async { Err(Error::api_failure("name already taken")) })
            .await;

        assert!(result.is_err());
        assert!(dialog.is_open());
        assert!(!dialog.is_submitting());
        assert_eq!(dialog.error(), Some("name already taken"));
        // field values survive the failure
        assert_eq!(dialog.form_data()["name"], json!("Acme"));
    }

    #[tokio::test]
    async fn empty_error_message_gets_a_fallback() {
        let mut dialog = FormDialog::empty();
        dialog.open();

        let result: Result<(), Error> = dialog
            .handle_submit(|_| async { Err(Error::general("")) })
            .await;

        assert!(result.is_err());
        assert_eq!(dialog.error(), Some("An error occurred"));
    }

    #[test]
    fn close_resets_edits() {
        let mut dialog = FormDialog::new(initial());
        dialog.open_with({
            let mut map = Map::new();
            map.insert("name".to_string(), json!("Existing"));
            map
        });
        assert!(dialog.is_open());
        dialog.close();
        assert_eq!(dialog.form_data()["name"], json!(""));
    }
}
