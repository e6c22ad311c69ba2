//! Networking modules for the backend data service.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` wraps the REST endpoints and `types` defines their JSON schema.
//! Identity-provider traffic lives in the `session` crate.

pub mod api;
pub mod types;
