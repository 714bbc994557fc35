use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Where the player stands. `plane` is the z-level; it is carried along but
/// never weighted into distances.
#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WorldPosition {
    pub x: i32,
    pub y: i32,
    #[serde(default)]
    pub plane: i32,
}

impl WorldPosition {
    pub fn new(x: i32, y: i32, plane: i32) -> Self {
        Self { x, y, plane }
    }
}

impl Display for WorldPosition {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("[{}, {}, {}]", self.x, self.y, self.plane))
    }
}

/// The (x, y) tile a resource node occupies. Depletion is remembered per key,
/// so two nodes only share state if their coordinates are exactly equal.
#[derive(Copy, Clone, Debug, Hash, PartialOrd, PartialEq, Ord, Eq, Serialize, Deserialize)]
pub struct NodeKey {
    pub x: i32,
    pub y: i32,
}

impl NodeKey {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl Display for NodeKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("({}, {})", self.x, self.y))
    }
}

/// A resource node as reported by the perception source for one frame.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeObservation {
    pub id: u32,
    pub x: i32,
    pub y: i32,
    #[serde(default)]
    pub plane: i32,
}

impl NodeObservation {
    pub fn new(id: u32, x: i32, y: i32, plane: i32) -> Self {
        Self { id, x, y, plane }
    }

    pub fn key(&self) -> NodeKey {
        NodeKey::new(self.x, self.y)
    }

    pub fn dist2(&self, player: WorldPosition) -> u64 {
        let dx = u64::from(self.x.abs_diff(player.x));
        let dy = u64::from(self.y.abs_diff(player.y));
        (dx * dx).saturating_add(dy * dy)
    }

    /// Euclidean distance on the (x, y) plane
    pub fn distance_to(&self, player: WorldPosition) -> f64 {
        (self.dist2(player) as f64).sqrt()
    }
}

/// An observation annotated at query time.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RankedNode {
    #[serde(flatten)]
    pub node: NodeObservation,
    pub distance: f64,
    pub is_depleted: bool,
}

impl RankedNode {
    pub fn key(&self) -> NodeKey {
        self.node.key()
    }
}

impl Display for RankedNode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!(
            "#{} at {} dist {:.1}",
            self.node.id,
            self.node.key(),
            self.distance
        ))
    }
}

#[cfg(test)]
mod tests {
    use crate::types::{NodeObservation, WorldPosition};

    #[test]
    fn test_distance_ignores_plane() {
        let player = WorldPosition::new(3200, 3200, 0);
        let node = NodeObservation::new(11364, 3203, 3204, 2);

        assert_eq!(25, node.dist2(player));
        assert!((node.distance_to(player) - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_far_coordinates_do_not_overflow() {
        let player = WorldPosition::new(i32::MIN, 0, 0);
        let node = NodeObservation::new(1, i32::MAX, 0, 0);

        assert_eq!(u64::from(u32::MAX).pow(2), node.dist2(player));
    }
}
