//! Administrative control and status reporting for the zero touch
//! provisioning service.
//!
//! The session service owns the state files; this crate only reads them,
//! reconciles them with the live service and admin mode, and renders the
//! result. Lifecycle commands flip admin mode, stop or start the service and
//! delete state.

pub mod activity;
pub mod commands;
pub mod config;
pub mod display;
pub mod error;
pub mod logging;
pub mod service;
pub mod session;
pub mod time;
