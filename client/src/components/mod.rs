//! Reusable UI component modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components render shared chrome and the protected-route wrapper while
//! reading auth state from Leptos context providers.

pub mod card_row;
pub mod nav_bar;
pub mod protected;
