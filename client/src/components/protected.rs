//! Wrapper for views that require a signed-in user.

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;
use session::{Access, guard};

use crate::state::auth::use_session;
use crate::util::auth::install_unauth_redirect;

/// Render `children` only for an authenticated session.
///
/// While the stored session is still being hydrated a placeholder is shown
/// instead of redirecting; once auth resolves without a session the visitor
/// is sent to the login view.
#[component]
pub fn Protected(children: ChildrenFn) -> impl IntoView {
    let auth = use_session().auth;
    install_unauth_redirect(auth, use_navigate());

    move || match guard::check(auth.get(), ()) {
        Access::Render(()) => children().into_any(),
        Access::Pending => view! { <p class="guard-pending">"Checking your session..."</p> }.into_any(),
        Access::Redirect(_) => ().into_any(),
    }
}
