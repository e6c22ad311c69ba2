//! Page modules for route-level screens.
//!
//! ARCHITECTURE
//! ============
//! Each page owns route-scoped orchestration and delegates rendering details
//! to `components`. Store operations are only issued from the browser.

pub mod card;
pub mod forgot_password;
pub mod home;
pub mod login;
pub mod profile;
