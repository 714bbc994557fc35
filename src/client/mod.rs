//! Everything related to a gathering client
pub mod clock;
pub mod session;
pub mod shared;
pub mod source;
pub mod timing;
pub mod tracker;
