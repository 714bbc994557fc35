use std::{collections::BTreeMap, io::Read, time::Duration};

use interfaces::types::{NodeKey, NodeObservation, WorldPosition};
use serde::{de::DeserializeOwned, Deserialize};

use crate::{
    client::{
        clock::ManualClock,
        source::{Frame, Replay},
    },
    error::{Error, Res},
};

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionRow {
    pub frame: u32,
    pub x: i32,
    pub y: i32,
    pub plane: i32,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObservationRow {
    pub frame: u32,
    pub id: u32,
    pub x: i32,
    pub y: i32,
    pub plane: i32,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct RespawnRow {
    pub frame: u32,
    pub x: i32,
    pub y: i32,
}

fn read_csv<T: DeserializeOwned>(reader: impl Read) -> Res<Vec<T>> {
    csv::ReaderBuilder::new()
        .delimiter(b':')
        .has_headers(false)
        .trim(csv::Trim::All)
        .from_reader(reader)
        .deserialize()
        .map(|res| {
            let elem: T = res?;
            Ok(elem)
        })
        .collect()
}

pub fn read_positions(reader: impl Read) -> Res<Vec<PositionRow>> {
    read_csv(reader)
}

pub fn read_observations(reader: impl Read) -> Res<Vec<ObservationRow>> {
    read_csv(reader)
}

pub fn read_respawns(reader: impl Read) -> Res<Vec<RespawnRow>> {
    read_csv(reader)
}

/// Groups rows by frame number. Only frames some row mentions exist; a
/// frame may carry at most one position.
pub fn frames(
    positions: &[PositionRow],
    observations: &[ObservationRow],
    respawns: &[RespawnRow],
) -> Res<BTreeMap<u32, Frame>> {
    let mut frames: BTreeMap<u32, Frame> = BTreeMap::new();

    for row in positions {
        let frame = frames.entry(row.frame).or_default();
        if let Some(previous) = frame.position {
            return Err(Error::Replay(format!(
                "frame {} has two positions, {previous} and [{}, {}, {}]",
                row.frame, row.x, row.y, row.plane
            )));
        }
        frame.position = Some(WorldPosition::new(row.x, row.y, row.plane));
    }

    for row in observations {
        frames
            .entry(row.frame)
            .or_default()
            .nodes
            .push(NodeObservation::new(row.id, row.x, row.y, row.plane));
    }

    for row in respawns {
        frames
            .entry(row.frame)
            .or_default()
            .respawned
            .push(NodeKey::new(row.x, row.y));
    }

    Ok(frames)
}

pub fn replay(
    positions: &[PositionRow],
    observations: &[ObservationRow],
    respawns: &[RespawnRow],
    clock: ManualClock,
    frame_length: Duration,
) -> Res<Replay> {
    let frames = frames(positions, observations, respawns)?;
    Ok(Replay::numbered(frames, clock, frame_length))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use interfaces::types::{NodeKey, NodeObservation, WorldPosition};

    use crate::{
        bootstrap::csv::{frames, read_observations, read_positions, read_respawns},
        error::Error,
    };

    #[test]
    fn test_frames_from_rows() {
        let positions = read_positions("0:3285:3365:0\n2:3286:3365:0\n".as_bytes()).unwrap();
        let observations =
            read_observations("0:11364:3286:3366:0\n0:11365:3290:3365:0\n3:11364:3286:3366:0\n".as_bytes())
                .unwrap();
        let respawns = read_respawns("3:3286:3366\n".as_bytes()).unwrap();

        let frames = frames(&positions, &observations, &respawns).unwrap();

        // frame 1 is never mentioned
        assert_eq!(vec![0, 2, 3], frames.keys().copied().collect::<Vec<_>>());
        assert_eq!(Some(WorldPosition::new(3285, 3365, 0)), frames[&0].position);
        assert_eq!(2, frames[&0].nodes.len());
        assert_eq!(NodeObservation::new(11365, 3290, 3365, 0), frames[&0].nodes[1]);

        assert!(frames[&2].nodes.is_empty());

        assert_eq!(None, frames[&3].position);
        assert_eq!(vec![NodeKey::new(3286, 3366)], frames[&3].respawned);
    }

    #[test]
    fn test_huge_frame_number_is_sparse() {
        let observations = read_observations("4000000000:11364:3286:3365:0\n".as_bytes()).unwrap();

        let frames = frames(&[], &observations, &[]).unwrap();

        assert_eq!(1, frames.len());
        assert_eq!(1, frames[&4_000_000_000].nodes.len());
    }

    #[test]
    fn test_two_positions_in_one_frame() {
        let positions = read_positions("5:3285:3365:0\n5:3290:3365:0\n".as_bytes()).unwrap();

        assert_matches!(frames(&positions, &[], &[]), Err(Error::Replay(_)));
    }

    #[test]
    fn test_no_rows() {
        assert!(frames(&[], &[], &[]).unwrap().is_empty());
    }

    #[test]
    fn test_bad_row() {
        assert_matches!(read_positions("0:abc:3365:0\n".as_bytes()), Err(Error::CSV(_)));
    }
}
