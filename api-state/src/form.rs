//! Form values, per-field errors and submission against the API.

use crate::store::{Reducer, Store};
use futures::FutureExt;
use futures::future::LocalBoxFuture;
use payloads::{
    ClientError, Envelope, ErrorDetails, FieldErrors, Subscription,
};
use std::collections::BTreeMap;
use std::future::Future;
use std::rc::Rc;

/// Field name to its current input.
pub type FormValues = BTreeMap<String, String>;

/// Key under which errors not tied to a field are kept.
pub const GENERAL_ERROR: &str = "general";

type SubmitFuture<T> =
    LocalBoxFuture<'static, Result<Envelope<T>, ClientError>>;
type Submitter<T> = Rc<dyn Fn(FormValues) -> SubmitFuture<T>>;

pub type SuccessCallback<T> = Rc<dyn Fn(&Envelope<T>)>;
pub type ErrorCallback = Rc<dyn Fn(&ClientError, &ErrorDetails)>;

pub struct FormOptions<T> {
    pub initial_values: FormValues,
    /// Return to the initial values after a successful submit.
    pub reset_on_success: bool,
    pub on_success: Option<SuccessCallback<T>>,
    pub on_error: Option<ErrorCallback>,
}

impl<T> Default for FormOptions<T> {
    fn default() -> Self {
        Self {
            initial_values: FormValues::new(),
            reset_on_success: false,
            on_success: None,
            on_error: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitResult<T> {
    Success {
        data: T,
        message: Option<String>,
    },
    Failure {
        error: String,
        errors: Option<Vec<String>>,
    },
}

impl<T> SubmitResult<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormState<T> {
    pub values: FormValues,
    pub errors: FieldErrors,
    pub submitting: bool,
    pub submit_count: u32,
    pub last_submit_result: Option<SubmitResult<T>>,
    initial_values: FormValues,
}

impl<T> FormState<T> {
    fn new(initial_values: FormValues) -> Self {
        Self {
            values: initial_values.clone(),
            errors: FieldErrors::new(),
            submitting: false,
            submit_count: 0,
            last_submit_result: None,
            initial_values,
        }
    }

    fn reset(&mut self) {
        self.values = self.initial_values.clone();
        self.errors.clear();
        self.last_submit_result = None;
        self.submit_count = 0;
    }
}

#[derive(Debug)]
pub enum FormAction<T> {
    SetValue { field: String, value: String },
    SetError { field: String, error: Option<String> },
    ClearErrors,
    Reset,
    SubmitStarted,
    SubmitSucceeded {
        data: T,
        message: Option<String>,
        reset: bool,
    },
    SubmitFailed {
        errors: FieldErrors,
        details: ErrorDetails,
    },
}

impl<T> Reducer for FormState<T> {
    type Action = FormAction<T>;

    fn reduce(&mut self, action: FormAction<T>) {
        match action {
            FormAction::SetValue { field, value } => {
                self.errors.remove(&field);
                self.values.insert(field, value);
            }
            FormAction::SetError { field, error } => match error {
                Some(message) => {
                    self.errors.insert(field, message);
                }
                None => {
                    self.errors.remove(&field);
                }
            },
            FormAction::ClearErrors => self.errors.clear(),
            FormAction::Reset => self.reset(),
            FormAction::SubmitStarted => {
                self.submitting = true;
                self.errors.clear();
                self.submit_count += 1;
            }
            FormAction::SubmitSucceeded {
                data,
                message,
                reset,
            } => {
                self.submitting = false;
                self.last_submit_result =
                    Some(SubmitResult::Success { data, message });
                if reset {
                    self.reset();
                }
            }
            FormAction::SubmitFailed { errors, details } => {
                self.submitting = false;
                self.errors = errors;
                self.last_submit_result = Some(SubmitResult::Failure {
                    error: details.message,
                    errors: details.errors,
                });
            }
        }
    }
}

/// Split server error strings of the form `"<field>: <message>"` into
/// per-field messages.
///
/// The field must be a single word of ASCII letters, digits and underscores.
/// Anything else becomes the general error, the last one winning. Without an
/// error list the failure message is the general error.
pub fn parse_field_errors(details: &ErrorDetails) -> FieldErrors {
    let mut parsed = FieldErrors::new();
    let Some(errors) = &details.errors else {
        parsed.insert(GENERAL_ERROR.to_string(), details.message.clone());
        return parsed;
    };

    for error in errors {
        match split_field_error(error) {
            Some((field, message)) => {
                parsed.insert(field.to_string(), message.to_string())
            }
            None => parsed.insert(GENERAL_ERROR.to_string(), error.clone()),
        };
    }
    parsed
}

fn split_field_error(error: &str) -> Option<(&str, &str)> {
    let (field, message) = error.split_once(':')?;
    let is_word = !field.is_empty()
        && field.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    let message = message.trim_start();
    (is_word && !message.is_empty()).then_some((field, message))
}

/// A form whose submission is an API operation.
pub struct ApiForm<T> {
    submitter: Submitter<T>,
    reset_on_success: bool,
    on_success: Option<SuccessCallback<T>>,
    on_error: Option<ErrorCallback>,
    store: Rc<Store<FormState<T>>>,
}

impl<T> Clone for ApiForm<T> {
    fn clone(&self) -> Self {
        Self {
            submitter: self.submitter.clone(),
            reset_on_success: self.reset_on_success,
            on_success: self.on_success.clone(),
            on_error: self.on_error.clone(),
            store: self.store.clone(),
        }
    }
}

impl<T: Clone + 'static> ApiForm<T> {
    pub fn new<F, Fut>(submitter: F, options: FormOptions<T>) -> Self
    where
        F: Fn(FormValues) -> Fut + 'static,
        Fut: Future<Output = Result<Envelope<T>, ClientError>> + 'static,
    {
        Self {
            submitter: Rc::new(move |values| submitter(values).boxed_local()),
            reset_on_success: options.reset_on_success,
            on_success: options.on_success,
            on_error: options.on_error,
            store: Store::new(FormState::new(options.initial_values)),
        }
    }

    /// Set a field's value, clearing any error shown for it.
    pub fn set_value(
        &self,
        field: impl Into<String>,
        value: impl Into<String>,
    ) {
        self.store.dispatch(FormAction::SetValue {
            field: field.into(),
            value: value.into(),
        });
    }

    /// Set or, with `None`, remove a field's error.
    pub fn set_error(&self, field: impl Into<String>, error: Option<String>) {
        self.store.dispatch(FormAction::SetError {
            field: field.into(),
            error,
        });
    }

    pub fn clear_errors(&self) {
        self.store.dispatch(FormAction::ClearErrors);
    }

    pub fn reset(&self) {
        self.store.dispatch(FormAction::Reset);
    }

    /// Submit the current values with `overrides` merged on top.
    ///
    /// The overrides are sent but not stored in the form.
    pub async fn submit(
        &self,
        overrides: FormValues,
    ) -> Result<T, ClientError> {
        let mut values = self.store.state().values.clone();
        values.extend(overrides);
        self.store.dispatch(FormAction::SubmitStarted);

        match (self.submitter)(values).await {
            Ok(envelope) => {
                let applied = self.store.dispatch(FormAction::SubmitSucceeded {
                    data: envelope.data.clone(),
                    message: envelope.message.clone(),
                    reset: self.reset_on_success,
                });
                if applied {
                    if let Some(on_success) = &self.on_success {
                        on_success(&envelope);
                    }
                }
                Ok(envelope.into_inner())
            }
            Err(e) => {
                let details = ErrorDetails::from(&e);
                tracing::debug!(error = %details.message, "form submit failed");
                let applied = self.store.dispatch(FormAction::SubmitFailed {
                    errors: parse_field_errors(&details),
                    details: details.clone(),
                });
                if applied {
                    if let Some(on_error) = &self.on_error {
                        on_error(&e, &details);
                    }
                }
                Err(e)
            }
        }
    }

    pub fn state(&self) -> FormState<T> {
        self.store.state().clone()
    }

    pub fn values(&self) -> FormValues {
        self.store.state().values.clone()
    }

    /// Current value of a field, empty when unset.
    pub fn value(&self, field: &str) -> String {
        self.store
            .state()
            .values
            .get(field)
            .cloned()
            .unwrap_or_default()
    }

    pub fn errors(&self) -> FieldErrors {
        self.store.state().errors.clone()
    }

    pub fn field_error(&self, field: &str) -> Option<String> {
        self.store.state().errors.get(field).cloned()
    }

    pub fn submitting(&self) -> bool {
        self.store.state().submitting
    }

    pub fn submit_count(&self) -> u32 {
        self.store.state().submit_count
    }

    pub fn last_submit_result(&self) -> Option<SubmitResult<T>> {
        self.store.state().last_submit_result.clone()
    }

    pub fn has_errors(&self) -> bool {
        !self.store.state().errors.is_empty()
    }

    pub fn is_valid(&self) -> bool {
        self.store.state().errors.is_empty()
    }

    pub fn general_error(&self) -> Option<String> {
        self.field_error(GENERAL_ERROR)
    }

    pub fn can_submit(&self) -> bool {
        let state = self.store.state();
        !state.submitting && state.errors.is_empty()
    }

    pub fn unmount(&self) {
        self.store.unmount();
    }

    pub fn subscribe(&self, listener: impl Fn() + 'static) -> Subscription {
        self.store.subscribe(listener)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details(message: &str, errors: Option<&[&str]>) -> ErrorDetails {
        ErrorDetails {
            message: message.to_string(),
            errors: errors.map(|e| e.iter().map(|s| s.to_string()).collect()),
            status: Some(400),
        }
    }

    #[test]
    fn field_errors_split_from_general_ones() {
        let parsed = parse_field_errors(&details(
            "Validation failed",
            Some(&["email: must be unique", "bad format"]),
        ));
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed["email"], "must be unique");
        assert_eq!(parsed[GENERAL_ERROR], "bad format");
    }

    #[test]
    fn only_single_word_fields_are_recognised() {
        let parsed = parse_field_errors(&details(
            "",
            Some(&[
                "first name: too long",
                "end_date:before start",
                "title:",
                "later general",
            ]),
        ));
        assert_eq!(parsed["end_date"], "before start");
        assert_eq!(parsed[GENERAL_ERROR], "later general");
        assert!(!parsed.contains_key("first name"));
        assert!(!parsed.contains_key("title"));
    }

    #[test]
    fn message_is_general_without_an_error_list() {
        let parsed = parse_field_errors(&details("Server error: 502", None));
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[GENERAL_ERROR], "Server error: 502");
    }

    #[test]
    fn editing_a_field_clears_only_its_error() {
        let mut state: FormState<()> = FormState::new(FormValues::new());
        state.reduce(FormAction::SetError {
            field: "email".into(),
            error: Some("must be unique".into()),
        });
        state.reduce(FormAction::SetError {
            field: "name".into(),
            error: Some("Name is required".into()),
        });
        state.reduce(FormAction::SetValue {
            field: "email".into(),
            value: "ada@example.com".into(),
        });
        assert!(!state.errors.contains_key("email"));
        assert!(state.errors.contains_key("name"));

        state.reduce(FormAction::SetError {
            field: "name".into(),
            error: None,
        });
        assert!(state.errors.is_empty());
    }

    #[test]
    fn reset_on_success_returns_to_initial_values() {
        let initial = FormValues::from([("email".to_string(), String::new())]);
        let mut state: FormState<u8> = FormState::new(initial.clone());
        state.reduce(FormAction::SetValue {
            field: "email".into(),
            value: "ada@example.com".into(),
        });
        state.reduce(FormAction::SubmitStarted);
        assert!(state.submitting);
        assert_eq!(state.submit_count, 1);

        state.reduce(FormAction::SubmitSucceeded {
            data: 1,
            message: None,
            reset: true,
        });
        assert!(!state.submitting);
        assert_eq!(state.values, initial);
        assert_eq!(state.submit_count, 0);
        assert!(state.last_submit_result.is_none());
    }
}
