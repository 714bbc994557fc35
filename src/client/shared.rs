use std::sync::Arc;

use interfaces::types::{NodeObservation, RankedNode, WorldPosition};
use parking_lot::Mutex;

use crate::client::{
    clock::{Clock, SystemClock},
    tracker::ResourceTracker,
};

/// A tracker that can be handed to more than one caller. Every method takes
/// the lock once, so a sweep and the read or write that triggered it are
/// never interleaved with another caller.
#[derive(Debug)]
pub struct SharedTracker<C = SystemClock> {
    inner: Arc<Mutex<ResourceTracker<C>>>,
}

impl<C> Clone for SharedTracker<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C: Clock> From<ResourceTracker<C>> for SharedTracker<C> {
    fn from(tracker: ResourceTracker<C>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(tracker)),
        }
    }
}

impl<C: Clock> SharedTracker<C> {
    pub fn find_nearest_node(
        &self,
        observations: &[NodeObservation],
        player: WorldPosition,
        exclude_depleted: bool,
    ) -> Option<RankedNode> {
        self.inner
            .lock()
            .find_nearest_node(observations, player, exclude_depleted)
    }

    pub fn list_all_visible(
        &self,
        observations: &[NodeObservation],
        player: WorldPosition,
    ) -> Vec<RankedNode> {
        self.inner.lock().list_all_visible(observations, player)
    }

    pub fn mark_depleted(&self, x: i32, y: i32) {
        self.inner.lock().mark_depleted(x, y);
    }

    pub fn clear_depleted(&self, x: i32, y: i32) -> bool {
        self.inner.lock().clear_depleted(x, y)
    }

    pub fn is_depleted(&self, x: i32, y: i32) -> bool {
        self.inner.lock().is_depleted(x, y)
    }

    pub fn depleted_count(&self) -> usize {
        self.inner.lock().depleted_count()
    }

    /// Run several operations under one lock, e.g. pick a node and mark it
    /// before another caller can pick the same one.
    pub fn with<T>(&self, f: impl FnOnce(&mut ResourceTracker<C>) -> T) -> T {
        f(&mut self.inner.lock())
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::HashSet, thread};

    use interfaces::types::{NodeObservation, WorldPosition};

    use crate::client::{
        clock::ManualClock,
        shared::SharedTracker,
        tracker::{ResourceTracker, RespawnWindow},
    };

    #[test]
    fn test_claims_are_unique_across_threads() {
        let tracker = ResourceTracker::with_clock([1276], RespawnWindow::default(), ManualClock::new());
        let shared = SharedTracker::from(tracker);

        let trees: Vec<_> = (0..8).map(|i| NodeObservation::new(1276, 3160 + i, 3450, 0)).collect();
        let player = WorldPosition::new(3160, 3450, 0);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let shared = shared.clone();
                let trees = trees.clone();
                thread::spawn(move || {
                    shared.with(|tracker| {
                        let nearest = tracker.find_nearest_node(&trees, player, true)?;
                        tracker.mark_depleted(nearest.node.x, nearest.node.y);
                        Some(nearest.key())
                    })
                })
            })
            .collect();

        let claimed: HashSet<_> = handles
            .into_iter()
            .map(|handle| handle.join().unwrap().unwrap())
            .collect();

        assert_eq!(8, claimed.len());
        assert_eq!(8, shared.depleted_count());
        assert!(shared.find_nearest_node(&trees, player, true).is_none());
    }

    #[test]
    fn test_handles_share_state() {
        let tracker = ResourceTracker::with_clock([1276], RespawnWindow::default(), ManualClock::new());
        let first = SharedTracker::from(tracker);
        let second = first.clone();

        first.mark_depleted(3161, 3450);
        assert!(second.is_depleted(3161, 3450));

        let trees = [NodeObservation::new(1276, 3161, 3450, 0)];
        let listed = second.list_all_visible(&trees, WorldPosition::new(3160, 3450, 0));
        assert!(listed[0].is_depleted);

        assert!(second.clear_depleted(3161, 3450));
        assert!(!first.is_depleted(3161, 3450));
    }
}
