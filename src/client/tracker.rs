use std::time::Duration;

use float_ord::FloatOrd;
use indexmap::{IndexMap, IndexSet};
use interfaces::types::{NodeKey, NodeObservation, RankedNode, WorldPosition};
use itertools::Itertools;
use tracing::{debug, info};

use crate::{
    client::clock::{Clock, SystemClock},
    error::{Error, Res},
};

/// How long a depleted node takes to come back, as `(min, max)`. Only the
/// upper bound is used to forget depletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RespawnWindow {
    min: Duration,
    max: Duration,
}

impl RespawnWindow {
    pub fn new(min: Duration, max: Duration) -> Res<Self> {
        if min > max {
            return Err(Error::Profile(format!(
                "respawn minimum {}s is greater than maximum {}s",
                min.as_secs_f64(),
                max.as_secs_f64()
            )));
        }
        Ok(Self { min, max })
    }

    pub fn from_secs(min: f64, max: f64) -> Res<Self> {
        let seconds = |secs: f64| {
            Duration::try_from_secs_f64(secs).map_err(|_| {
                Error::Profile(format!("respawn time {secs} is not a valid number of seconds"))
            })
        };
        Self::new(seconds(min)?, seconds(max)?)
    }

    pub fn min(&self) -> Duration {
        self.min
    }

    pub fn max(&self) -> Duration {
        self.max
    }
}

impl Default for RespawnWindow {
    fn default() -> Self {
        Self {
            min: Duration::from_secs(5),
            max: Duration::from_secs(10),
        }
    }
}

/// map of node coordinate => time it was marked depleted
#[derive(Debug, Default, Clone)]
pub struct DepletionMemory {
    marked: IndexMap<NodeKey, Duration>,
}

impl DepletionMemory {
    /// Returns true if the key was already present and only its time moved.
    pub fn mark(&mut self, key: NodeKey, now: Duration) -> bool {
        self.marked.insert(key, now).is_some()
    }

    pub fn clear(&mut self, key: NodeKey) -> bool {
        self.marked.shift_remove(&key).is_some()
    }

    pub fn contains(&self, key: NodeKey) -> bool {
        self.marked.contains_key(&key)
    }

    pub fn marked_at(&self, key: NodeKey) -> Option<Duration> {
        self.marked.get(&key).copied()
    }

    pub fn len(&self) -> usize {
        self.marked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.marked.is_empty()
    }

    /// Forget every entry marked more than `max` before `now`. Returns how
    /// many were removed.
    pub fn sweep(&mut self, now: Duration, max: Duration) -> usize {
        let before = self.marked.len();
        self.marked
            .retain(|_, marked_at| now.saturating_sub(*marked_at) <= max);
        before - self.marked.len()
    }
}

/// Picks the next resource node to work and remembers which ones were
/// recently exhausted.
///
/// One tracker lives for one gathering session. Observations and the player
/// position are handed in on every call and never stored; the only state is
/// the depletion memory and the time of the last sweep over it.
///
/// # Sweeping
/// Depleted entries are not expired on every call. [`Self::find_nearest_node`]
/// and [`Self::list_all_visible`] sweep at most once per sweep interval, and a
/// sweep drops an entry only once the *maximum* respawn time has passed since
/// it was marked. The point queries ([`Self::is_depleted`],
/// [`Self::depleted_count`]) never sweep, so they may report entries that the
/// next sweep will drop.
#[derive(Debug)]
pub struct ResourceTracker<C = SystemClock> {
    object_ids: IndexSet<u32>,
    respawn: RespawnWindow,
    depleted: DepletionMemory,
    clock: C,
    last_sweep: Duration,
    sweep_interval: Duration,
}

impl ResourceTracker<SystemClock> {
    pub fn new(object_ids: impl IntoIterator<Item = u32>, respawn: RespawnWindow) -> Self {
        Self::with_clock(object_ids, respawn, SystemClock::default())
    }
}

impl<C: Clock> ResourceTracker<C> {
    pub const SWEEP_INTERVAL: Duration = Duration::from_secs(30);

    pub fn with_clock(
        object_ids: impl IntoIterator<Item = u32>,
        respawn: RespawnWindow,
        clock: C,
    ) -> Self {
        let last_sweep = clock.now();
        Self {
            object_ids: object_ids.into_iter().collect(),
            respawn,
            depleted: DepletionMemory::default(),
            clock,
            last_sweep,
            sweep_interval: Self::SWEEP_INTERVAL,
        }
    }

    #[must_use]
    pub fn with_sweep_interval(mut self, sweep_interval: Duration) -> Self {
        self.sweep_interval = sweep_interval;
        self
    }

    pub fn tracks(&self, id: u32) -> bool {
        self.object_ids.contains(&id)
    }

    pub fn tracked_ids(&self) -> &IndexSet<u32> {
        &self.object_ids
    }

    pub fn respawn_window(&self) -> RespawnWindow {
        self.respawn
    }

    /// The nearest observation that is not remembered as depleted (unless
    /// `exclude_depleted` is false). Ties go to the earliest observation.
    pub fn find_nearest_node(
        &mut self,
        observations: &[NodeObservation],
        player: WorldPosition,
        exclude_depleted: bool,
    ) -> Option<RankedNode> {
        self.sweep_if_due();

        let nearest = observations
            .iter()
            .filter(|node| !exclude_depleted || !self.depleted.contains(node.key()))
            .map(|node| self.annotate(node, player))
            // min_by_key keeps the first of equal elements
            .min_by_key(|ranked| FloatOrd(ranked.distance));

        match &nearest {
            Some(ranked) => debug!(
                visible = observations.len(),
                "nearest node #{} at {} dist {:.1}",
                ranked.node.id,
                ranked.key(),
                ranked.distance
            ),
            None if observations.is_empty() => debug!("no resource nodes visible"),
            None => debug!(visible = observations.len(), "all visible nodes are depleted"),
        }

        nearest
    }

    /// Every observation, nearest first, annotated with distance and
    /// depletion. Depleted nodes are included.
    pub fn list_all_visible(
        &mut self,
        observations: &[NodeObservation],
        player: WorldPosition,
    ) -> Vec<RankedNode> {
        self.sweep_if_due();

        observations
            .iter()
            .map(|node| self.annotate(node, player))
            .sorted_by_key(|ranked| FloatOrd(ranked.distance))
            .collect()
    }

    pub fn mark_depleted(&mut self, x: i32, y: i32) {
        let key = NodeKey::new(x, y);
        let refreshed = self.depleted.mark(key, self.clock.now());
        debug!(refreshed, "marked node at {key} as depleted");
    }

    /// Returns false if nothing was marked at `(x, y)`.
    pub fn clear_depleted(&mut self, x: i32, y: i32) -> bool {
        let key = NodeKey::new(x, y);
        let cleared = self.depleted.clear(key);
        if cleared {
            debug!("cleared depletion marker for node at {key}");
        }
        cleared
    }

    pub fn is_depleted(&self, x: i32, y: i32) -> bool {
        self.depleted.contains(NodeKey::new(x, y))
    }

    pub fn depleted_count(&self) -> usize {
        self.depleted.len()
    }

    /// Runs a sweep if at least one sweep interval has passed since the last
    /// one. Returns the number of entries removed.
    pub fn sweep_if_due(&mut self) -> usize {
        let now = self.clock.now();
        if now.saturating_sub(self.last_sweep) < self.sweep_interval {
            return 0;
        }

        let removed = self.depleted.sweep(now, self.respawn.max());
        if removed > 0 {
            info!(
                removed,
                remaining = self.depleted.len(),
                "cleaned up old depleted nodes"
            );
        }

        self.last_sweep = now;
        removed
    }

    fn annotate(&self, node: &NodeObservation, player: WorldPosition) -> RankedNode {
        RankedNode {
            node: *node,
            distance: node.distance_to(player),
            is_depleted: self.depleted.contains(node.key()),
        }
    }
}
