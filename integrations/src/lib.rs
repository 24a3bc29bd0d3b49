//! Clients for the services notifications are built from and delivered to.
//!
//! Every service sits behind a trait so handlers can be exercised with mocks
//! (enable the `test_mocks` feature to get them).

pub mod asset_store;
pub mod build_logs;
pub mod build_system;
pub mod chat;
pub mod dns;
pub mod mailer;
