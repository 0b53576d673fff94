//! # Login View
//!
//! Username and password authentication.

use dioxus::prelude::*;

use crate::router::Route;
use crate::state::AppState;

/// Login view component.
///
/// On success the session is stored and the operator lands on the
/// dashboard; any failure shows "Invalid credentials".
#[component]
pub fn Login() -> Element {
    let state = use_context::<AppState>();
    let nav = use_navigator();

    let mut username = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut loading = use_signal(|| false);
    let mut error = use_signal(|| Option::<String>::None);

    let on_submit = move |evt: Event<FormData>| {
        evt.prevent_default();

        let username_val = username.read().trim().to_string();
        let password_val = password.read().clone();
        if username_val.is_empty() || password_val.is_empty() {
            error.set(Some("Username and password are required".to_string()));
            return;
        }

        loading.set(true);
        error.set(None);

        spawn(async move {
            match state.login(&username_val, &password_val).await {
                Ok(()) => {
                    nav.replace(Route::Dashboard {});
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Login failed");
                    error.set(Some("Invalid credentials".to_string()));
                }
            }
            loading.set(false);
        });
    };

    rsx! {
        div { class: "login-view",
            div { class: "login-card glass-panel",
                div { class: "login-header",
                    h1 { "Varta CRM" }
                    p { class: "text-secondary", "Sign in to your account" }
                }

                form {
                    class: "login-form",
                    onsubmit: on_submit,

                    div { class: "form-group",
                        label { r#for: "username", "Username" }
                        input {
                            id: "username",
                            r#type: "text",
                            placeholder: "Enter your username",
                            value: "{username}",
                            disabled: *loading.read(),
                            autofocus: true,
                            oninput: move |evt| username.set(evt.value()),
                        }
                    }

                    div { class: "form-group",
                        label { r#for: "password", "Password" }
                        input {
                            id: "password",
                            r#type: "password",
                            placeholder: "Enter your password",
                            value: "{password}",
                            disabled: *loading.read(),
                            oninput: move |evt| password.set(evt.value()),
                        }
                    }

                    if let Some(err) = error.read().as_ref() {
                        div { class: "alert alert-error", "{err}" }
                    } else if let Some(err) = state.last_error.read().as_ref() {
                        div { class: "alert alert-error", "{err}" }
                    }

                    button {
                        class: "btn-primary btn-lg btn-block",
                        r#type: "submit",
                        disabled: *loading.read(),
                        if *loading.read() { "Signing in..." } else { "Sign in" }
                    }
                }
            }
        }
    }
}
