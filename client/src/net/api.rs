//! REST helpers for the backend data service.
//!
//! Client-side (hydrate): real HTTP calls via `gloo-net`.
//! Server-side (SSR): stubs returning an error since these endpoints are only
//! called from the browser.
//!
//! ERROR HANDLING
//! ==============
//! Callers get `Result<_, String>` outputs instead of panics so a failed
//! fetch degrades the page instead of crashing hydration. Nothing is retried.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

#[cfg(feature = "hydrate")]
use serde::{Serialize, de::DeserializeOwned};

use super::types::{Card, GraphData, NewRecord, NewReferral, Profile, Referral, UserRecord};

#[cfg(not(feature = "hydrate"))]
const NOT_AVAILABLE: &str = "not available on server";

#[cfg(any(test, feature = "hydrate"))]
fn cards_endpoint(base: &str) -> String {
    format!("{base}/cards")
}

#[cfg(any(test, feature = "hydrate"))]
fn card_endpoint(base: &str, name: &str) -> String {
    format!("{base}/cards/{}", urlencoding::encode(name))
}

#[cfg(any(test, feature = "hydrate"))]
fn graph_endpoint(base: &str, name: &str) -> String {
    format!("{base}/graph/{}", urlencoding::encode(name))
}

#[cfg(any(test, feature = "hydrate"))]
fn records_endpoint(base: &str) -> String {
    format!("{base}/records")
}

#[cfg(any(test, feature = "hydrate"))]
fn referrals_endpoint(base: &str) -> String {
    format!("{base}/referrals")
}

#[cfg(any(test, feature = "hydrate"))]
fn profile_endpoint(base: &str) -> String {
    format!("{base}/profile")
}

#[cfg(any(test, feature = "hydrate"))]
fn bearer_header(token: &str) -> String {
    format!("Bearer {token}")
}

#[cfg(any(test, feature = "hydrate"))]
fn request_failed_message(what: &str, status: u16) -> String {
    format!("{what} request failed: {status}")
}

/// Path of the in-app card detail route for `name`.
#[must_use]
pub fn card_path(name: &str) -> String {
    format!("/cards/{}", urlencoding::encode(name))
}

#[cfg(feature = "hydrate")]
async fn get_json<T: DeserializeOwned>(what: &str, url: &str, token: Option<&str>) -> Result<T, String> {
    let mut req = gloo_net::http::Request::get(url);
    if let Some(token) = token {
        req = req.header("Authorization", &bearer_header(token));
    }
    let resp = req.send().await.map_err(|e| e.to_string())?;
    if !resp.ok() {
        return Err(request_failed_message(what, resp.status()));
    }
    resp.json::<T>().await.map_err(|e| e.to_string())
}

#[cfg(feature = "hydrate")]
async fn post_json<B: Serialize, T: DeserializeOwned>(what: &str, url: &str, token: &str, body: &B) -> Result<T, String> {
    let resp = gloo_net::http::Request::post(url)
        .header("Authorization", &bearer_header(token))
        .json(body)
        .map_err(|e| e.to_string())?
        .send()
        .await
        .map_err(|e| e.to_string())?;
    if !resp.ok() {
        return Err(request_failed_message(what, resp.status()));
    }
    resp.json::<T>().await.map_err(|e| e.to_string())
}

/// Fetch the card listing from `GET {base}/cards`.
///
/// # Errors
///
/// Returns an error string if the request fails or the server responds with a non-OK status.
pub async fn fetch_cards(base: &str) -> Result<Vec<Card>, String> {
    #[cfg(feature = "hydrate")]
    {
        get_json("cards", &cards_endpoint(base), None).await
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = base;
        Err(NOT_AVAILABLE.to_owned())
    }
}

/// Fetch one card from `GET {base}/cards/{name}`.
///
/// # Errors
///
/// Returns an error string if the request fails or the card is unknown.
pub async fn fetch_card(base: &str, name: &str) -> Result<Card, String> {
    #[cfg(feature = "hydrate")]
    {
        get_json("card", &card_endpoint(base, name), None).await
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (base, name);
        Err(NOT_AVAILABLE.to_owned())
    }
}

/// Fetch plot data for one card from `GET {base}/graph/{name}`.
///
/// # Errors
///
/// Returns an error string if the request fails or the server responds with a non-OK status.
pub async fn fetch_graph(base: &str, name: &str) -> Result<GraphData, String> {
    #[cfg(feature = "hydrate")]
    {
        get_json("graph", &graph_endpoint(base, name), None).await
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (base, name);
        Err(NOT_AVAILABLE.to_owned())
    }
}

/// List the signed-in user's records via `GET {base}/records`.
///
/// # Errors
///
/// Returns an error string if the request fails or the token is refused.
pub async fn fetch_records(base: &str, token: &str) -> Result<Vec<UserRecord>, String> {
    #[cfg(feature = "hydrate")]
    {
        get_json("records", &records_endpoint(base), Some(token)).await
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (base, token);
        Err(NOT_AVAILABLE.to_owned())
    }
}

/// Report an application outcome via `POST {base}/records`.
///
/// # Errors
///
/// Returns an error string if the request fails or the token is refused.
pub async fn create_record(base: &str, token: &str, record: &NewRecord) -> Result<UserRecord, String> {
    #[cfg(feature = "hydrate")]
    {
        post_json("create record", &records_endpoint(base), token, record).await
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (base, token, record);
        Err(NOT_AVAILABLE.to_owned())
    }
}

/// List the signed-in user's referrals via `GET {base}/referrals`.
///
/// # Errors
///
/// Returns an error string if the request fails or the token is refused.
pub async fn fetch_referrals(base: &str, token: &str) -> Result<Vec<Referral>, String> {
    #[cfg(feature = "hydrate")]
    {
        get_json("referrals", &referrals_endpoint(base), Some(token)).await
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (base, token);
        Err(NOT_AVAILABLE.to_owned())
    }
}

/// Add a referral link via `POST {base}/referrals`.
///
/// # Errors
///
/// Returns an error string if the request fails or the token is refused.
pub async fn create_referral(base: &str, token: &str, referral: &NewReferral) -> Result<Referral, String> {
    #[cfg(feature = "hydrate")]
    {
        post_json("create referral", &referrals_endpoint(base), token, referral).await
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (base, token, referral);
        Err(NOT_AVAILABLE.to_owned())
    }
}

/// Fetch the signed-in user's profile from `GET {base}/profile`.
///
/// # Errors
///
/// Returns an error string if the request fails or the token is refused.
pub async fn fetch_profile(base: &str, token: &str) -> Result<Profile, String> {
    #[cfg(feature = "hydrate")]
    {
        get_json("profile", &profile_endpoint(base), Some(token)).await
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (base, token);
        Err(NOT_AVAILABLE.to_owned())
    }
}
