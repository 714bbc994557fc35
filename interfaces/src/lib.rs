use serde::{Deserialize, Serialize};

use crate::types::{NodeKey, RankedNode, WorldPosition};

pub mod types;

/// A report line. Encoded as the message's own fields plus a `path` field
/// naming the message kind, so a consumer can dispatch on it.
pub trait Tag: Serialize {
    const PATH: &'static str;

    fn encode(&self) -> serde_json::Result<String> {
        let mut v = serde_json::to_value(self)?;

        if let Some(map) = v.as_object_mut() {
            map.insert(
                "path".to_string(),
                serde_json::Value::String(Self::PATH.to_string()),
            );
        }

        serde_json::to_string(&v)
    }
}

/// A node was chosen as the next one to work and has been marked depleted.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct NodeWorked {
    pub cycle: u64,
    pub player: WorldPosition,
    pub node: RankedNode,
}

impl Tag for NodeWorked {
    const PATH: &'static str = "worked";
}

/// Every tracked node visible in one cycle, nearest first.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct NodeListing {
    pub cycle: u64,
    pub player: WorldPosition,
    pub nodes: Vec<RankedNode>,
}

impl Tag for NodeListing {
    const PATH: &'static str = "listing";
}

/// A node the caller confirmed as respawned.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeRespawned {
    pub key: NodeKey,
}

impl Tag for NodeRespawned {
    const PATH: &'static str = "respawned";
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub cycles: u64,
    pub nodes_worked: u64,
    pub idle_cycles: u64,
    pub position_failures: u64,
    pub depleted_tracked: usize,
}

impl Tag for SessionSummary {
    const PATH: &'static str = "summary";
}

#[cfg(test)]
mod tests {
    use crate::{
        types::{NodeObservation, RankedNode, WorldPosition},
        NodeWorked, SessionSummary, Tag,
    };

    #[test]
    fn test_summary_carries_path() {
        let summary = SessionSummary {
            cycles: 12,
            nodes_worked: 4,
            ..SessionSummary::default()
        };

        let encoded = summary.encode().unwrap();
        let value: serde_json::Value = serde_json::from_str(&encoded).unwrap();

        assert_eq!(value["path"], "summary");
        assert_eq!(value["cycles"], 12);
        assert_eq!(value["nodes_worked"], 4);
    }

    #[test]
    fn test_ranked_node_is_flattened() {
        let worked = NodeWorked {
            cycle: 3,
            player: WorldPosition::new(3200, 3200, 0),
            node: RankedNode {
                node: NodeObservation::new(11364, 3203, 3204, 0),
                distance: 5.0,
                is_depleted: false,
            },
        };

        let value: serde_json::Value = serde_json::from_str(&worked.encode().unwrap()).unwrap();

        assert_eq!(value["path"], "worked");
        assert_eq!(value["node"]["id"], 11364);
        assert_eq!(value["node"]["x"], 3203);
        assert_eq!(value["node"]["distance"], 5.0);
    }
}
