//! Landing page listing cards with their reported approval odds.

use leptos::prelude::*;

use crate::components::card_row::CardRow;
use crate::config::ClientConfig;
use crate::net::types::Card;

#[component]
pub fn HomePage() -> impl IntoView {
    let config = expect_context::<ClientConfig>();
    let cards = RwSignal::new(Vec::<Card>::new());
    let error = RwSignal::new(None::<String>);

    #[cfg(feature = "hydrate")]
    {
        let base = config.api_base_url.clone();
        leptos::task::spawn_local(async move {
            match crate::net::api::fetch_cards(&base).await {
                Ok(list) => cards.set(list),
                Err(e) => error.set(Some(e)),
            }
        });
    }
    #[cfg(not(feature = "hydrate"))]
    let _ = config;

    view! {
        <section class="home">
            <h1>"Approval odds by card"</h1>
            <Show when=move || error.get().is_some()>
                <p class="home__error">{move || error.get().unwrap_or_default()}</p>
            </Show>
            <ul class="card-list">
                <For each=move || cards.get() key=|card| card.name.clone() let:card>
                    <CardRow card=card/>
                </For>
            </ul>
        </section>
    }
}
