//! Picks the next resource node for a gathering bot to work and remembers
//! which nodes were recently depleted.
//!
//! The core is [`client::tracker::ResourceTracker`]. It is fed the nodes the
//! bot can currently see and the player's position, and answers which node
//! is nearest and not depleted. [`client::session::GatherSession`] drives it
//! the way a gathering bot would, from any [`client::source::GameView`].
pub use interfaces;

pub mod bootstrap;
pub mod client;
pub mod error;

pub use crate::{
    client::{
        clock::{Clock, ManualClock, SystemClock},
        shared::SharedTracker,
        tracker::{DepletionMemory, ResourceTracker, RespawnWindow},
    },
    error::{HasContext, Res, ResContext},
};
