use std::mem;

use interfaces::{NodeListing, NodeRespawned, NodeWorked, SessionSummary};
use tracing::{info, warn};

use crate::client::{
    clock::Clock,
    source::GameView,
    timing::{Increment, Incremental},
    tracker::ResourceTracker,
};

#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    Worked(NodeWorked),
    Listing(NodeListing),
    Respawned(NodeRespawned),
}

/// The gathering loop. Each cycle reads the player position, looks for
/// tracked nodes, picks the nearest usable one and marks it depleted, since
/// working a node is assumed to exhaust it.
pub struct GatherSession<V, C> {
    view: V,
    tracker: ResourceTracker<C>,
    exclude_depleted: bool,
    list_nodes: bool,
    max_cycles: Option<u64>,
    summary: SessionSummary,
    events: Vec<SessionEvent>,
}

impl<V: GameView, C: Clock> GatherSession<V, C> {
    pub fn new(view: V, tracker: ResourceTracker<C>) -> Self {
        Self {
            view,
            tracker,
            exclude_depleted: true,
            list_nodes: false,
            max_cycles: None,
            summary: SessionSummary::default(),
            events: Vec::new(),
        }
    }

    #[must_use]
    pub fn exclude_depleted(mut self, exclude_depleted: bool) -> Self {
        self.exclude_depleted = exclude_depleted;
        self
    }

    /// also report every visible node each cycle
    #[must_use]
    pub fn list_nodes(mut self, list_nodes: bool) -> Self {
        self.list_nodes = list_nodes;
        self
    }

    #[must_use]
    pub fn max_cycles(mut self, max_cycles: Option<u64>) -> Self {
        self.max_cycles = max_cycles;
        self
    }

    pub fn tracker(&self) -> &ResourceTracker<C> {
        &self.tracker
    }

    /// events produced since the last drain, oldest first
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        mem::take(&mut self.events)
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            depleted_tracked: self.tracker.depleted_count(),
            ..self.summary
        }
    }

    fn cycle(&mut self) {
        self.summary.cycles += 1;
        let cycle = self.summary.cycles;

        for key in self.view.respawned() {
            if self.tracker.clear_depleted(key.x, key.y) {
                self.events.push(SessionEvent::Respawned(NodeRespawned { key }));
            }
        }

        let Some(player) = self.view.position() else {
            self.summary.position_failures += 1;
            warn!(cycle, "failed to get player coordinates");
            return;
        };

        let nodes = self.view.visible_nodes(self.tracker.tracked_ids());

        if self.list_nodes {
            let nodes = self.tracker.list_all_visible(&nodes, player);
            self.events.push(SessionEvent::Listing(NodeListing {
                cycle,
                player,
                nodes,
            }));
        }

        let Some(node) = self
            .tracker
            .find_nearest_node(&nodes, player, self.exclude_depleted)
        else {
            self.summary.idle_cycles += 1;
            return;
        };

        self.tracker.mark_depleted(node.node.x, node.node.y);
        self.summary.nodes_worked += 1;
        info!(cycle, total = self.summary.nodes_worked, "working {node}");

        self.events
            .push(SessionEvent::Worked(NodeWorked { cycle, player, node }));
    }
}

impl<V: GameView, C: Clock> Incremental<SessionSummary> for GatherSession<V, C> {
    fn iterate(&mut self) -> Increment<SessionSummary> {
        let reached_max = self
            .max_cycles
            .is_some_and(|max| self.summary.cycles >= max);

        if reached_max || !self.view.advance() {
            return Increment::Finished(self.summary());
        }

        self.cycle();
        Increment::InProgress
    }
}
