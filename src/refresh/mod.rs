//! Keeps a session's bearer token alive while the session is active.
//!
//! A [`RefreshScheduler`] worker fires an injected [`TokenRefresher`] on a
//! fixed cadence and persists the next due time through a [`ScheduleStore`],
//! so a process restart resumes the running cycle instead of resetting it.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use lawdesk_auth::refresh::{RefreshClient, RefreshScheduler, SessionTokens, TokenPair};
//! use std::sync::Arc;
//!
//! let client = RefreshClient::new("https://api.example.com/auth/refresh".parse()?);
//! let tokens = Arc::new(SessionTokens::new(client, initial_pair));
//!
//! let handle = RefreshScheduler::new().spawn(Arc::clone(&tokens), store);
//! // ... tokens.access_token().await stays fresh ...
//! handle.shutdown();
//! ```

#[cfg(feature = "client")]
mod client;
mod scheduler;
mod store;

#[cfg(feature = "client")]
pub use client::{RefreshClient, SessionTokens};
pub use scheduler::{
    DEFAULT_REFRESH_INTERVAL, RefreshHandle, RefreshScheduler, TokenPair, TokenRefresher,
};
pub use store::{MemoryScheduleStore, ScheduleStore};
