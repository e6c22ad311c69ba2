//! Signed-in member area: profile, reported applications, referral links.
//!
//! DATA FLOW
//! =========
//! Every request needs a bearer token, so the view first asks the store for
//! the current session (`session` refreshes expired tokens without touching
//! auth state) and then issues the three reads. Writes fetch the session the
//! same way and append to the local lists on success instead of refetching.

#[cfg(test)]
#[path = "profile_test.rs"]
mod profile_test;

use leptos::prelude::*;

use crate::components::protected::Protected;
use crate::config::ClientConfig;
use crate::net::types::{NewRecord, NewReferral, Profile, Referral, UserRecord};
use crate::state::auth::use_session;

const MIN_CREDIT_SCORE: u32 = 300;
const MAX_CREDIT_SCORE: u32 = 850;

pub(crate) fn validate_referral(card_name: &str, link: &str) -> Result<NewReferral, &'static str> {
    let card_name = card_name.trim();
    let link = link.trim();
    if card_name.is_empty() {
        return Err("Pick the card this link is for.");
    }
    if !(link.starts_with("https://") || link.starts_with("http://")) {
        return Err("Referral links must start with http:// or https://.");
    }
    Ok(NewReferral { card_name: card_name.to_owned(), link: link.to_owned() })
}

pub(crate) fn validate_record(card_name: &str, credit_score: &str, approved: bool) -> Result<NewRecord, &'static str> {
    let card_name = card_name.trim();
    if card_name.is_empty() {
        return Err("Enter the card you applied for.");
    }
    let credit_score = match credit_score.trim() {
        "" => None,
        raw => {
            let score = raw.parse::<u32>().map_err(|_| "Credit score must be a number.")?;
            if !(MIN_CREDIT_SCORE..=MAX_CREDIT_SCORE).contains(&score) {
                return Err("Credit score must be between 300 and 850.");
            }
            Some(score)
        }
    };
    Ok(NewRecord { card_name: card_name.to_owned(), credit_score, income: None, approved, applied_on: None })
}

pub(crate) fn outcome_label(record: &UserRecord) -> &'static str {
    if record.approved { "Approved" } else { "Denied" }
}

pub(crate) fn greeting(profile: &Profile) -> String {
    match profile.name.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => format!("Hi, {name}"),
        _ => format!("Hi, {}", profile.email),
    }
}

#[component]
pub fn ProfilePage() -> impl IntoView {
    view! {
        <Protected>
            <ProfileView/>
        </Protected>
    }
}

#[component]
fn ProfileView() -> impl IntoView {
    let session = use_session();
    let config = expect_context::<ClientConfig>();
    #[cfg(not(feature = "hydrate"))]
    let _ = session;

    let profile = RwSignal::new(None::<Profile>);
    let records = RwSignal::new(Vec::<UserRecord>::new());
    let referrals = RwSignal::new(Vec::<Referral>::new());
    let error = RwSignal::new(None::<String>);
    let busy = RwSignal::new(false);

    let record_card = RwSignal::new(String::new());
    let record_score = RwSignal::new(String::new());
    let record_approved = RwSignal::new(true);
    let referral_card = RwSignal::new(String::new());
    let referral_link = RwSignal::new(String::new());

    #[cfg(feature = "hydrate")]
    {
        let store = session.store();
        let base = config.api_base_url.clone();
        leptos::task::spawn_local(async move {
            let token = match store.session().await {
                Ok(active) => active.id_token,
                Err(e) => {
                    log::debug!("profile: no session: {e}");
                    error.set(Some(e.to_string()));
                    return;
                }
            };
            match crate::net::api::fetch_profile(&base, &token).await {
                Ok(p) => profile.set(Some(p)),
                Err(e) => error.set(Some(e)),
            }
            match crate::net::api::fetch_records(&base, &token).await {
                Ok(list) => records.set(list),
                Err(e) => error.set(Some(e)),
            }
            match crate::net::api::fetch_referrals(&base, &token).await {
                Ok(list) => referrals.set(list),
                Err(e) => error.set(Some(e)),
            }
        });
    }

    let base = StoredValue::new(config.api_base_url.clone());

    let on_add_record = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let record = match validate_record(&record_card.get(), &record_score.get(), record_approved.get()) {
            Ok(record) => record,
            Err(msg) => {
                error.set(Some(msg.to_owned()));
                return;
            }
        };
        busy.set(true);
        error.set(None);

        #[cfg(feature = "hydrate")]
        {
            let store = session.store();
            let base = base.get_value();
            leptos::task::spawn_local(async move {
                let result = match store.session().await {
                    Ok(active) => crate::net::api::create_record(&base, &active.id_token, &record).await,
                    Err(e) => Err(e.to_string()),
                };
                match result {
                    Ok(created) => {
                        records.update(|list| list.push(created));
                        record_card.set(String::new());
                        record_score.set(String::new());
                    }
                    Err(e) => error.set(Some(e)),
                }
                busy.set(false);
            });
        }
        #[cfg(not(feature = "hydrate"))]
        let _ = (record, base);
    };

    let on_add_referral = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let referral = match validate_referral(&referral_card.get(), &referral_link.get()) {
            Ok(referral) => referral,
            Err(msg) => {
                error.set(Some(msg.to_owned()));
                return;
            }
        };
        busy.set(true);
        error.set(None);

        #[cfg(feature = "hydrate")]
        {
            let store = session.store();
            let base = base.get_value();
            leptos::task::spawn_local(async move {
                let result = match store.session().await {
                    Ok(active) => crate::net::api::create_referral(&base, &active.id_token, &referral).await,
                    Err(e) => Err(e.to_string()),
                };
                match result {
                    Ok(created) => {
                        referrals.update(|list| list.push(created));
                        referral_card.set(String::new());
                        referral_link.set(String::new());
                    }
                    Err(e) => error.set(Some(e)),
                }
                busy.set(false);
            });
        }
        #[cfg(not(feature = "hydrate"))]
        let _ = (referral, base);
    };

    let on_sign_out = move |_: leptos::ev::MouseEvent| {
        #[cfg(feature = "hydrate")]
        {
            let store = session.store();
            leptos::task::spawn_local(async move {
                store.logout().await;
            });
        }
    };

    view! {
        <section class="profile">
            <header class="profile__header">
                <h1>{move || profile.get().map(|p| greeting(&p)).unwrap_or_else(|| "Your profile".to_owned())}</h1>
                <Show when=move || profile.get().and_then(|p| p.member_since).is_some()>
                    <p class="profile__since">
                        "Member since "
                        {move || profile.get().and_then(|p| p.member_since).unwrap_or_default()}
                    </p>
                </Show>
                <button class="profile__sign-out" on:click=on_sign_out>"Sign out"</button>
            </header>

            <Show when=move || error.get().is_some()>
                <p class="profile__error">{move || error.get().unwrap_or_default()}</p>
            </Show>

            <h2>"Your applications"</h2>
            <ul class="profile__records">
                <For
                    each=move || records.get().into_iter().enumerate()
                    key=|(i, record)| (*i, record.id.clone())
                    let:item
                >
                    <li class="profile__record">
                        <span class="profile__record-card">{item.1.card_name.clone()}</span>
                        <span class="profile__record-outcome">{outcome_label(&item.1)}</span>
                        <span class="profile__record-score">
                            {item.1.credit_score.map(|s| s.to_string()).unwrap_or_default()}
                        </span>
                    </li>
                </For>
            </ul>
            <form class="profile__form" on:submit=on_add_record>
                <input
                    type="text"
                    placeholder="Card name"
                    prop:value=move || record_card.get()
                    on:input=move |ev| record_card.set(event_target_value(&ev))
                />
                <input
                    type="text"
                    inputmode="numeric"
                    placeholder="Credit score"
                    prop:value=move || record_score.get()
                    on:input=move |ev| record_score.set(event_target_value(&ev))
                />
                <label>
                    <input
                        type="checkbox"
                        prop:checked=move || record_approved.get()
                        on:change=move |ev| record_approved.set(event_target_checked(&ev))
                    />
                    "Approved"
                </label>
                <button type="submit" disabled=move || busy.get()>"Report"</button>
            </form>

            <h2>"Referral links"</h2>
            <ul class="profile__referrals">
                <For
                    each=move || referrals.get().into_iter().enumerate()
                    key=|(i, referral)| (*i, referral.link.clone())
                    let:item
                >
                    <li class="profile__referral">
                        <span>{item.1.card_name.clone()}</span>
                        <a href=item.1.link.clone() target="_blank" rel="noopener">{item.1.link.clone()}</a>
                    </li>
                </For>
            </ul>
            <form class="profile__form" on:submit=on_add_referral>
                <input
                    type="text"
                    placeholder="Card name"
                    prop:value=move || referral_card.get()
                    on:input=move |ev| referral_card.set(event_target_value(&ev))
                />
                <input
                    type="url"
                    placeholder="https://..."
                    prop:value=move || referral_link.get()
                    on:input=move |ev| referral_link.set(event_target_value(&ev))
                />
                <button type="submit" disabled=move || busy.get()>"Add link"</button>
            </form>
        </section>
    }
}
