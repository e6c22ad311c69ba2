//! Two-step password reset: request a code, then submit it with a new password.

#[cfg(test)]
#[path = "forgot_password_test.rs"]
mod forgot_password_test;

use leptos::prelude::*;
use session::CodeDelivery;

#[cfg(feature = "hydrate")]
use crate::state::auth::use_session;

pub(crate) fn validate_reset_request(email: &str) -> Result<String, &'static str> {
    let email = email.trim();
    if email.is_empty() {
        return Err("Enter the email you signed up with.");
    }
    Ok(email.to_owned())
}

pub(crate) fn validate_reset_confirm(code: &str, password: &str, confirm: &str) -> Result<(String, String), &'static str> {
    let code = code.trim();
    if code.is_empty() {
        return Err("Enter the code we sent you.");
    }
    if password.is_empty() {
        return Err("Enter a new password.");
    }
    if password != confirm {
        return Err("Passwords do not match.");
    }
    Ok((code.to_owned(), password.to_owned()))
}

/// Human wording for where the reset code went.
pub(crate) fn delivery_message(delivery: &CodeDelivery) -> String {
    match (delivery.medium.as_deref(), delivery.destination.as_deref()) {
        (Some(medium), Some(dest)) => format!("We sent a code by {} to {dest}.", medium.to_lowercase()),
        (None, Some(dest)) => format!("We sent a code to {dest}."),
        _ => "We sent you a code.".to_owned(),
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Step {
    Request,
    Confirm,
    Done,
}

#[component]
pub fn ForgotPasswordPage() -> impl IntoView {
    #[cfg(feature = "hydrate")]
    let session = use_session();
    let email = RwSignal::new(String::new());
    let code = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let confirm = RwSignal::new(String::new());
    let info = RwSignal::new(String::new());
    let busy = RwSignal::new(false);
    let step = RwSignal::new(Step::Request);

    let on_request = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let email_value = match validate_reset_request(&email.get()) {
            Ok(value) => value,
            Err(msg) => {
                info.set(msg.to_owned());
                return;
            }
        };
        busy.set(true);
        info.set("Sending code...".to_owned());

        #[cfg(feature = "hydrate")]
        {
            let store = session.store();
            leptos::task::spawn_local(async move {
                // The store already alerted the user on failure.
                match store.forgot_password(&email_value).await {
                    Ok(delivery) => {
                        info.set(delivery_message(&delivery));
                        step.set(Step::Confirm);
                    }
                    Err(_) => info.set(String::new()),
                }
                busy.set(false);
            });
        }
        #[cfg(not(feature = "hydrate"))]
        let _ = email_value;
    };

    let on_confirm = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let (code_value, password_value) = match validate_reset_confirm(&code.get(), &password.get(), &confirm.get()) {
            Ok(values) => values,
            Err(msg) => {
                info.set(msg.to_owned());
                return;
            }
        };
        let email_value = email.get().trim().to_owned();
        busy.set(true);
        info.set("Resetting password...".to_owned());

        #[cfg(feature = "hydrate")]
        {
            let store = session.store();
            leptos::task::spawn_local(async move {
                match store.reset_password(&email_value, &code_value, &password_value).await {
                    Ok(()) => {
                        info.set("Password updated. You can sign in now.".to_owned());
                        step.set(Step::Done);
                    }
                    Err(e) => info.set(format!("Reset failed: {e}")),
                }
                busy.set(false);
            });
        }
        #[cfg(not(feature = "hydrate"))]
        let _ = (email_value, code_value, password_value);
    };

    view! {
        <div class="login-page">
            <div class="login-card">
                <h1>"Reset password"</h1>
                <Show when=move || step.get() == Step::Request>
                    <form class="login-form" on:submit=on_request>
                        <input
                            class="login-input"
                            type="email"
                            placeholder="you@example.com"
                            prop:value=move || email.get()
                            on:input=move |ev| email.set(event_target_value(&ev))
                        />
                        <button class="login-button" type="submit" disabled=move || busy.get()>
                            "Send code"
                        </button>
                    </form>
                </Show>
                <Show when=move || step.get() == Step::Confirm>
                    <form class="login-form" on:submit=on_confirm>
                        <input
                            class="login-input"
                            type="text"
                            inputmode="numeric"
                            placeholder="Verification code"
                            prop:value=move || code.get()
                            on:input=move |ev| code.set(event_target_value(&ev))
                        />
                        <input
                            class="login-input"
                            type="password"
                            placeholder="New password"
                            prop:value=move || password.get()
                            on:input=move |ev| password.set(event_target_value(&ev))
                        />
                        <input
                            class="login-input"
                            type="password"
                            placeholder="Confirm new password"
                            prop:value=move || confirm.get()
                            on:input=move |ev| confirm.set(event_target_value(&ev))
                        />
                        <button class="login-button" type="submit" disabled=move || busy.get()>
                            "Reset password"
                        </button>
                    </form>
                </Show>
                <Show when=move || !info.get().is_empty()>
                    <p class="login-message">{move || info.get()}</p>
                </Show>
                <a href="/login" class="login-link">"Back to sign in"</a>
            </div>
        </div>
    }
}
