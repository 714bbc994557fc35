use std::{fs::File, io::BufReader, path::Path, time::Duration};

use serde::{Deserialize, Serialize};

use crate::{
    client::{
        clock::Clock,
        tracker::{ResourceTracker, RespawnWindow},
    },
    error::{Error, HasContext, Res, ResContext},
};

/// What one gathering session works on and how long its nodes take to
/// come back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatherProfile {
    pub name: String,

    /// object ids of the nodes worth working, e.g. every iron rock variant
    pub object_ids: Vec<u32>,

    /// (min, max) respawn time in seconds
    #[serde(default = "default_respawn_secs")]
    pub respawn_secs: (f64, f64),

    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: f64,

    #[serde(default = "default_true")]
    pub exclude_depleted: bool,
}

fn default_respawn_secs() -> (f64, f64) {
    (5.0, 10.0)
}

fn default_sweep_interval_secs() -> f64 {
    30.0
}

fn default_true() -> bool {
    true
}

impl GatherProfile {
    pub fn load(path: impl AsRef<Path>) -> ResContext<Self> {
        let path = path.as_ref();
        let file = File::open(path).context(|| format!("could not open profile {}", path.display()))?;

        let profile: Self = serde_json::from_reader(BufReader::new(file))
            .context(|| format!("could not parse profile {}", path.display()))?;

        profile
            .validate()
            .context(|| format!("profile {} is not usable", path.display()))?;

        Ok(profile)
    }

    pub fn validate(&self) -> Res {
        if self.name.trim().is_empty() {
            return Err(Error::Profile("name is required".to_string()));
        }

        if self.object_ids.is_empty() {
            return Err(Error::Profile("object_ids is empty".to_string()));
        }

        self.respawn_window()?;
        self.sweep_interval()?;
        Ok(())
    }

    pub fn respawn_window(&self) -> Res<RespawnWindow> {
        let (min, max) = self.respawn_secs;
        RespawnWindow::from_secs(min, max)
    }

    pub fn sweep_interval(&self) -> Res<Duration> {
        match Duration::try_from_secs_f64(self.sweep_interval_secs) {
            Ok(interval) if !interval.is_zero() => Ok(interval),
            _ => Err(Error::Profile(format!(
                "sweep interval {} must be a positive number of seconds",
                self.sweep_interval_secs
            ))),
        }
    }

    pub fn tracker<C: Clock>(&self, clock: C) -> Res<ResourceTracker<C>> {
        let tracker = ResourceTracker::with_clock(
            self.object_ids.iter().copied(),
            self.respawn_window()?,
            clock,
        );
        Ok(tracker.with_sweep_interval(self.sweep_interval()?))
    }
}
