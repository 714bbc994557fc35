use std::{collections::BTreeMap, time::Duration};

use indexmap::IndexSet;
use interfaces::types::{NodeKey, NodeObservation, WorldPosition};

use crate::client::clock::ManualClock;

/// Where the player is. `None` when the game state can't be read right now.
pub trait PositionSource {
    fn position(&mut self) -> Option<WorldPosition>;
}

/// What resource nodes are visible right now, restricted to `ids`.
pub trait PerceptionSource {
    fn visible_nodes(&mut self, ids: &IndexSet<u32>) -> Vec<NodeObservation>;
}

/// A view of the game that can be stepped frame by frame
pub trait GameView: PositionSource + PerceptionSource {
    /// Move to the next frame. Returns false once there are no more frames.
    fn advance(&mut self) -> bool;

    /// Nodes confirmed to have respawned in the current frame
    fn respawned(&mut self) -> Vec<NodeKey> {
        Vec::new()
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Frame {
    pub position: Option<WorldPosition>,
    pub nodes: Vec<NodeObservation>,
    pub respawned: Vec<NodeKey>,
}

/// Plays back recorded frames in frame-number order. Frame numbers may have
/// gaps; stepping from frame `a` to frame `b` moves the clock forward by
/// `b - a` frame lengths.
#[derive(Debug)]
pub struct Replay {
    frames: Vec<(u32, Frame)>,
    cursor: Option<usize>,
    clock: ManualClock,
    frame_length: Duration,
}

impl Replay {
    /// one game tick
    pub const DEFAULT_FRAME_LENGTH: Duration = Duration::from_millis(600);

    /// Frames numbered 0, 1, 2, ... in the order given
    pub fn new(frames: Vec<Frame>, clock: ManualClock, frame_length: Duration) -> Self {
        let numbered = (0..).zip(frames).collect();
        Self::numbered(numbered, clock, frame_length)
    }

    pub fn numbered(frames: BTreeMap<u32, Frame>, clock: ManualClock, frame_length: Duration) -> Self {
        Self {
            frames: frames.into_iter().collect(),
            cursor: None,
            clock,
            frame_length,
        }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// number of the frame currently played, if any
    pub fn frame_number(&self) -> Option<u32> {
        Some(self.frames.get(self.cursor?)?.0)
    }

    fn current(&self) -> Option<&Frame> {
        self.frames.get(self.cursor?).map(|(_, frame)| frame)
    }
}

impl PositionSource for Replay {
    fn position(&mut self) -> Option<WorldPosition> {
        self.current()?.position
    }
}

impl PerceptionSource for Replay {
    fn visible_nodes(&mut self, ids: &IndexSet<u32>) -> Vec<NodeObservation> {
        let Some(frame) = self.current() else {
            return Vec::new();
        };

        frame
            .nodes
            .iter()
            .filter(|node| ids.contains(&node.id))
            .copied()
            .collect()
    }
}

impl GameView for Replay {
    fn advance(&mut self) -> bool {
        let next = self.cursor.map_or(0, |cursor| cursor + 1);
        if next >= self.frames.len() {
            return false;
        }

        if let Some(cursor) = self.cursor {
            let gap = self.frames[next].0 - self.frames[cursor].0;
            self.clock.advance(self.frame_length.saturating_mul(gap));
        }

        self.cursor = Some(next);
        true
    }

    fn respawned(&mut self) -> Vec<NodeKey> {
        self.current()
            .map(|frame| frame.respawned.clone())
            .unwrap_or_default()
    }
}
