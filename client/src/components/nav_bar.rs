//! Top navigation bar with the auth-aware sign in / sign out link.

use leptos::prelude::*;

use crate::state::auth::{nav_label, use_session};

#[component]
pub fn NavBar() -> impl IntoView {
    let session = use_session();
    let auth = session.auth;

    let on_sign_out = move |ev: leptos::ev::MouseEvent| {
        ev.prevent_default();
        #[cfg(feature = "hydrate")]
        {
            let store = session.store();
            leptos::task::spawn_local(async move {
                store.logout().await;
            });
        }
    };

    view! {
        <nav class="nav-bar">
            <a href="/" class="nav-bar__brand">"Card Odds"</a>
            <Show
                when=move || auth.get().is_authenticated()
                fallback=move || {
                    view! {
                        <Show when=move || nav_label(auth.get()).is_some()>
                            <a href="/login" class="nav-bar__link">
                                {move || nav_label(auth.get()).unwrap_or_default()}
                            </a>
                        </Show>
                    }
                }
            >
                <a href="/profile" class="nav-bar__link">"Profile"</a>
                <a href="/" class="nav-bar__link" on:click=on_sign_out>
                    {move || nav_label(auth.get()).unwrap_or_default()}
                </a>
            </Show>
        </nav>
    }
}
