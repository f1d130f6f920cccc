#![doc = include_str!("../README.md")]

pub mod claims;
pub mod error;
pub mod gate;
#[cfg(feature = "middleware")]
pub mod middleware;
pub mod refresh;

// Re-exports for convenient access
pub use claims::{ADMIN_ROLE, EMPLOYEE_USER_TYPE, Profile, SessionClaims, decode_session_claims};
pub use error::Error;
pub use gate::{Decision, GateConfig, RedirectTarget, evaluate};
#[cfg(feature = "client")]
pub use refresh::{RefreshClient, SessionTokens};
pub use refresh::{
    DEFAULT_REFRESH_INTERVAL, MemoryScheduleStore, RefreshHandle, RefreshScheduler, ScheduleStore,
    TokenPair, TokenRefresher,
};
