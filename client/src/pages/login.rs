//! Login page: email + password, with the forced new-password step.
//!
//! A sign-in that comes back with `NewPasswordRequired` is not a login; the
//! page switches to a second form and only navigates once the new password
//! has been accepted.

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;
use session::Challenge;

use crate::state::auth::use_session;

/// Where a successful sign-in lands.
pub const AFTER_LOGIN_PATH: &str = "/profile";

pub(crate) fn validate_login_input(email: &str, password: &str) -> Result<(String, String), &'static str> {
    let email = email.trim();
    if email.is_empty() || password.is_empty() {
        return Err("Enter your email and password.");
    }
    Ok((email.to_owned(), password.to_owned()))
}

pub(crate) fn validate_new_password(password: &str, confirm: &str) -> Result<String, &'static str> {
    if password.is_empty() {
        return Err("Enter a new password.");
    }
    if password != confirm {
        return Err("Passwords do not match.");
    }
    Ok(password.to_owned())
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let session = use_session();
    let navigate_home = use_navigate();

    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let new_password = RwSignal::new(String::new());
    let confirm_password = RwSignal::new(String::new());
    let info = RwSignal::new(String::new());
    let busy = RwSignal::new(false);
    let challenge = RwSignal::new(None::<Challenge>);

    // Already signed in: nothing to do here.
    Effect::new(move || {
        if session.auth.get().is_authenticated() {
            navigate_home(AFTER_LOGIN_PATH, NavigateOptions::default());
        }
    });

    let on_sign_in = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let (email_value, password_value) = match validate_login_input(&email.get(), &password.get()) {
            Ok(values) => values,
            Err(msg) => {
                info.set(msg.to_owned());
                return;
            }
        };
        busy.set(true);
        info.set("Signing in...".to_owned());

        #[cfg(feature = "hydrate")]
        {
            let store = session.store();
            leptos::task::spawn_local(async move {
                match store.authenticate(&email_value, &password_value).await {
                    Ok(session::SignIn::Authenticated(_)) => info.set(String::new()),
                    Ok(session::SignIn::NewPasswordRequired(next)) => {
                        challenge.set(Some(next));
                        info.set("Choose a new password to finish signing in.".to_owned());
                    }
                    Err(e) => info.set(format!("Sign-in failed: {e}")),
                }
                busy.set(false);
            });
        }
        #[cfg(not(feature = "hydrate"))]
        let _ = (email_value, password_value);
    };

    let on_new_password = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let Some(pending) = challenge.get() else {
            return;
        };
        let secret = match validate_new_password(&new_password.get(), &confirm_password.get()) {
            Ok(secret) => secret,
            Err(msg) => {
                info.set(msg.to_owned());
                return;
            }
        };
        let email_value = email.get().trim().to_owned();
        busy.set(true);
        info.set("Updating password...".to_owned());

        #[cfg(feature = "hydrate")]
        {
            let store = session.store();
            leptos::task::spawn_local(async move {
                match store.complete_new_password(&email_value, &pending, &secret).await {
                    Ok(_) => {
                        challenge.set(None);
                        info.set(String::new());
                    }
                    Err(e) => info.set(format!("Password update failed: {e}")),
                }
                busy.set(false);
            });
        }
        #[cfg(not(feature = "hydrate"))]
        let _ = (pending, secret, email_value);
    };

    view! {
        <div class="login-page">
            <div class="login-card">
                <h1>"Sign in"</h1>
                <Show
                    when=move || challenge.get().is_some()
                    fallback=move || {
                        view! {
                            <form class="login-form" on:submit=on_sign_in>
                                <input
                                    class="login-input"
                                    type="email"
                                    placeholder="you@example.com"
                                    prop:value=move || email.get()
                                    on:input=move |ev| email.set(event_target_value(&ev))
                                />
                                <input
                                    class="login-input"
                                    type="password"
                                    placeholder="Password"
                                    prop:value=move || password.get()
                                    on:input=move |ev| password.set(event_target_value(&ev))
                                />
                                <button class="login-button" type="submit" disabled=move || busy.get()>
                                    "Sign in"
                                </button>
                            </form>
                        }
                    }
                >
                    <form class="login-form" on:submit=on_new_password>
                        <input
                            class="login-input"
                            type="password"
                            placeholder="New password"
                            prop:value=move || new_password.get()
                            on:input=move |ev| new_password.set(event_target_value(&ev))
                        />
                        <input
                            class="login-input"
                            type="password"
                            placeholder="Confirm new password"
                            prop:value=move || confirm_password.get()
                            on:input=move |ev| confirm_password.set(event_target_value(&ev))
                        />
                        <button class="login-button" type="submit" disabled=move || busy.get()>
                            "Set password"
                        </button>
                    </form>
                </Show>
                <Show when=move || !info.get().is_empty()>
                    <p class="login-message">{move || info.get()}</p>
                </Show>
                <a href="/forgot-password" class="login-link">"Forgot your password?"</a>
            </div>
        </div>
    }
}
