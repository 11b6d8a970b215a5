//! The handful of blocking browser primitives the app still leans on.

use leptos::window;

/// Blocking notification, used where a mutation fails and the view has
/// no inline error slot.
pub fn notify(message: &str) {
    let _ = window().alert_with_message(message);
}

/// Blocking yes/no prompt. Reads as "no" if the dialog cannot be shown.
pub fn confirm(message: &str) -> bool {
    window().confirm_with_message(message).unwrap_or(false)
}

/// Full page reload, for the one flow that changes org membership.
pub fn reload() {
    let _ = window().location().reload();
}
