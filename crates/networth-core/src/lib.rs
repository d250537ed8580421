pub mod error;
pub mod ledger;
pub mod types;
pub mod xirr;

#[cfg(feature = "provident")]
pub mod provident;

#[cfg(feature = "fire")]
pub mod fire;

#[cfg(feature = "dashboard")]
pub mod dashboard;

pub use error::NetWorthError;
pub use types::*;

/// Standard result type for all engine operations
pub type NetWorthResult<T> = Result<T, NetWorthError>;
