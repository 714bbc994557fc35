//! Everything needed before a session can start: options, the gathering
//! profile and the recorded frames to replay.
use std::{fs::File, path::Path, time::Duration};

use crate::{
    client::{clock::ManualClock, source::Replay},
    error::{HasContext, ResContext},
};

pub mod csv;
pub mod opts;
pub mod profile;

/// Paths of the files a replay is built from
#[derive(Debug, Clone)]
pub struct ReplayFiles<'a> {
    pub positions: &'a str,
    pub observations: &'a str,
    pub respawns: Option<&'a str>,
}

fn open(path: &str, what: &str) -> ResContext<File> {
    File::open(Path::new(path)).context(|| format!("could not open {what} file {path}"))
}

impl ReplayFiles<'_> {
    pub fn load(&self, clock: ManualClock, frame_length: Duration) -> ResContext<Replay> {
        let positions = csv::read_positions(open(self.positions, "positions")?)
            .context(|| format!("could not read positions file {}", self.positions))?;

        let observations = csv::read_observations(open(self.observations, "observations")?)
            .context(|| format!("could not read observations file {}", self.observations))?;

        let respawns = match self.respawns {
            Some(path) => csv::read_respawns(open(path, "respawns")?)
                .context(|| format!("could not read respawns file {path}"))?,
            None => Vec::new(),
        };

        csv::replay(&positions, &observations, &respawns, clock, frame_length)
            .context_str("could not group replay rows into frames")
    }
}

#[cfg(test)]
mod tests {
    use std::{fs, time::Duration};

    use assert_matches::assert_matches;

    use crate::{
        bootstrap::ReplayFiles,
        client::{
            clock::ManualClock,
            source::{GameView, PositionSource},
        },
        error::Error,
    };

    #[test]
    fn test_load_without_respawns() {
        let dir = tempfile::tempdir().unwrap();
        let positions = dir.path().join("positions.csv");
        let observations = dir.path().join("observations.csv");
        fs::write(&positions, "0:3285:3365:0\n1:3286:3365:0\n").unwrap();
        fs::write(&observations, "1:11364:3287:3365:0\n").unwrap();

        let files = ReplayFiles {
            positions: positions.to_str().unwrap(),
            observations: observations.to_str().unwrap(),
            respawns: None,
        };
        let mut replay = files
            .load(ManualClock::new(), Duration::from_millis(600))
            .unwrap();

        assert_eq!(2, replay.len());
        assert!(replay.advance());
        assert!(replay.respawned().is_empty());
        assert!(replay.position().is_some());
    }

    #[test]
    fn test_missing_file_names_it() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.csv");
        let missing = missing.to_str().unwrap();

        let files = ReplayFiles {
            positions: missing,
            observations: missing,
            respawns: None,
        };
        let err = files
            .load(ManualClock::new(), Duration::from_millis(600))
            .unwrap_err();

        assert_matches!(err.inner(), Error::IO(_));
        assert!(err
            .to_string()
            .starts_with(&format!("Error could not open positions file {missing} : ")));
    }

    #[test]
    fn test_duplicate_positions_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let positions = dir.path().join("positions.csv");
        let observations = dir.path().join("observations.csv");
        fs::write(&positions, "0:3285:3365:0\n0:3286:3365:0\n").unwrap();
        fs::write(&observations, "").unwrap();

        let files = ReplayFiles {
            positions: positions.to_str().unwrap(),
            observations: observations.to_str().unwrap(),
            respawns: None,
        };
        let err = files
            .load(ManualClock::new(), Duration::from_millis(600))
            .unwrap_err();

        assert_matches!(err.inner(), Error::Replay(_));
        assert!(err
            .to_string()
            .starts_with("Error could not group replay rows into frames : invalid replay"));
    }
}
