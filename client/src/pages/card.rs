//! Card detail page: aggregate odds plus a score breakdown of reported outcomes.

#[cfg(test)]
#[path = "card_test.rs"]
mod card_test;

use leptos::prelude::*;
use leptos_router::hooks::use_params_map;

use crate::components::card_row::approval_summary;
use crate::config::ClientConfig;
use crate::net::types::{Card, GraphData};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct ScoreBreakdown {
    pub approved: usize,
    pub denied: usize,
    pub lowest_approved: Option<u32>,
    pub highest_denied: Option<u32>,
}

pub(crate) fn score_breakdown(graph: &GraphData) -> ScoreBreakdown {
    graph.points.iter().fold(ScoreBreakdown::default(), |mut acc, point| {
        if point.approved {
            acc.approved += 1;
            acc.lowest_approved = Some(acc.lowest_approved.map_or(point.credit_score, |s| s.min(point.credit_score)));
        } else {
            acc.denied += 1;
            acc.highest_denied = Some(acc.highest_denied.map_or(point.credit_score, |s| s.max(point.credit_score)));
        }
        acc
    })
}

fn score_or_dash(score: Option<u32>) -> String {
    score.map_or_else(|| "—".to_owned(), |s| s.to_string())
}

#[component]
pub fn CardPage() -> impl IntoView {
    let config = expect_context::<ClientConfig>();
    let params = use_params_map();
    let card_name = move || params.read().get("name").unwrap_or_default();

    let card = RwSignal::new(None::<Card>);
    let graph = RwSignal::new(GraphData::default());
    let error = RwSignal::new(None::<String>);

    Effect::new(move || {
        let name = card_name();
        #[cfg(feature = "hydrate")]
        {
            let base = config.api_base_url.clone();
            leptos::task::spawn_local(async move {
                match crate::net::api::fetch_card(&base, &name).await {
                    Ok(c) => card.set(Some(c)),
                    Err(e) => error.set(Some(e)),
                }
                if let Ok(g) = crate::net::api::fetch_graph(&base, &name).await {
                    graph.set(g);
                }
            });
        }
        #[cfg(not(feature = "hydrate"))]
        let _ = (name, &config);
    });

    let breakdown = move || score_breakdown(&graph.get());

    view! {
        <section class="card-detail">
            <h1>{card_name}</h1>
            <Show when=move || error.get().is_some()>
                <p class="card-detail__error">{move || error.get().unwrap_or_default()}</p>
            </Show>
            <p class="card-detail__odds">
                {move || card.get().map(|c| approval_summary(&c)).unwrap_or_default()}
            </p>
            <dl class="card-detail__scores">
                <dt>"Reported approvals"</dt>
                <dd>{move || breakdown().approved}</dd>
                <dt>"Reported denials"</dt>
                <dd>{move || breakdown().denied}</dd>
                <dt>"Lowest approved score"</dt>
                <dd>{move || score_or_dash(breakdown().lowest_approved)}</dd>
                <dt>"Highest denied score"</dt>
                <dd>{move || score_or_dash(breakdown().highest_denied)}</dd>
            </dl>
        </section>
    }
}
