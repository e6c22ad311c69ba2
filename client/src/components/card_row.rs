//! One row of the card listing.

use leptos::prelude::*;

use crate::net::api::card_path;
use crate::net::types::Card;

#[cfg(test)]
#[path = "card_row_test.rs"]
mod card_row_test;

/// Human-readable approval summary, e.g. `75% approved (3 of 4)`.
pub fn approval_summary(card: &Card) -> String {
    match card.approval_rate() {
        Some(rate) => format!(
            "{:.0}% approved ({} of {})",
            rate * 100.0,
            card.approved,
            card.approved + card.denied
        ),
        None => "No reports yet".to_owned(),
    }
}

#[component]
pub fn CardRow(card: Card) -> impl IntoView {
    let href = card_path(&card.name);
    let summary = approval_summary(&card);
    let issuer = card.issuer.clone().unwrap_or_default();

    view! {
        <li class="card-row">
            <a href=href class="card-row__name">{card.name}</a>
            <span class="card-row__issuer">{issuer}</span>
            <span class="card-row__odds">{summary}</span>
        </li>
    }
}
