//! Shared client-side state modules.
//!
//! DESIGN
//! ======
//! Only authentication is shared across pages; page-local data lives in
//! signals owned by each page.

pub mod auth;
