use yew::prelude::*;

const APP_NAME: &str = "Survey Admin";

/// Sets the document title to "{page} | Survey Admin". Each page sets its
/// own, so nothing is restored on unmount.
#[hook]
pub fn use_title(page: &str) {
    let title = format!("{page} | {APP_NAME}");
    use_effect_with(title, |title| {
        if let Some(doc) = web_sys::window().and_then(|w| w.document()) {
            doc.set_title(title);
        }
    });
}
