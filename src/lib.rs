//! # frejamfa (Freja eID MFA adapter)
//!
//! Second-factor authentication through the Freja eID mobile app, packaged as
//! an adapter a federation host drives through two entry points.
//!
//! ## Ceremony
//!
//! `begin` starts an assertion request for the user and returns the state the
//! host must persist together with the first view (confirmation code and QR
//! payload). The host then calls `resume` on every user refresh; each call
//! polls the remote service once and yields either a terminal outcome or a
//! view to show while the user is still confirming in the app.
//!
//! ## Host
//!
//! The binary runs a small HTTP host (`api`) that keeps per-ceremony context
//! in memory, renders views to localized HTML and issues the authentication
//! method claim when a ceremony completes.

pub mod api;
pub mod ceremony;
pub mod cli;
pub mod freja;
pub mod metadata;
pub mod render;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
