pub mod forgot_password;
pub mod login;
pub mod not_found;
pub mod reset_password;
pub mod surveys;

pub use forgot_password::ForgotPasswordPage;
pub use login::LoginPage;
pub use not_found::NotFoundPage;
pub use reset_password::ResetPasswordPage;
pub use surveys::SurveysPage;

use api_state::FormValues;

pub(crate) const INPUT_CLASS: &str = "w-full px-3 py-2 border border-neutral-300 \
    dark:border-neutral-600 rounded-md bg-white dark:bg-neutral-900 \
    text-neutral-900 dark:text-white focus:outline-none focus:ring-2 \
    focus:ring-neutral-500";

pub(crate) const PRIMARY_BUTTON_CLASS: &str = "w-full inline-block text-center \
    bg-neutral-900 dark:bg-white text-white dark:text-neutral-900 px-4 py-2 \
    rounded-md hover:bg-neutral-800 dark:hover:bg-neutral-100 \
    disabled:opacity-50 disabled:cursor-not-allowed font-medium";

/// A form value, or empty when the field was never set.
pub(crate) fn field_value(values: &FormValues, field: &str) -> String {
    values.get(field).cloned().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_read_as_empty() {
        let values = FormValues::from([("email".to_string(), "ada@example.com".to_string())]);
        assert_eq!(field_value(&values, "email"), "ada@example.com");
        assert_eq!(field_value(&values, "password"), "");
    }
}
