//! Module to interact with cargo options

use clap::Parser;

/// Options parsed from CLI
#[derive(Parser, Debug)]
#[command(about, author, version)]
pub struct CliOptions {
    /// The gathering profile. A JSON file of the form
    ///
    /// {"name": "iron", "object_ids": [11364, 11365], "respawn_secs": [5, 10]}
    #[clap(long)]
    pub profile: String,

    /// The recorded player positions. A CSV file of the form
    ///
    /// frame:x:y:plane
    ///
    /// Note, instead of commas as a delimiter, colons are used. A frame
    /// without a row has no readable position.
    #[clap(long, default_value = "positions.csv")]
    pub positions: String,

    /// The recorded node observations. A CSV file of the form
    ///
    /// frame:id:x:y:plane
    #[clap(long, default_value = "observations.csv")]
    pub observations: String,

    /// Nodes confirmed as respawned. A CSV file of the form
    ///
    /// frame:x:y
    #[clap(long)]
    pub respawns: Option<String>,

    /// How much game time passes between two recorded frames
    #[clap(long, default_value = "600")]
    pub frame_ms: u64,

    /// Stop after this many cycles even if frames remain
    #[clap(long)]
    pub max_cycles: Option<u64>,

    /// Print every visible node each cycle, not just the one worked
    #[clap(short, long)]
    pub list: bool,

    /// Print JSON lines instead of text
    #[clap(long)]
    pub json: bool,

    /// Log at debug level unless RUST_LOG says otherwise
    #[clap(short, long)]
    pub verbose: bool,
}

impl CliOptions {
    pub fn get() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use crate::bootstrap::opts::CliOptions;

    #[test]
    fn test_defaults() {
        let opts = CliOptions::parse_from(["gather-bot", "--profile", "iron.json"]);

        assert_eq!("iron.json", opts.profile);
        assert_eq!("positions.csv", opts.positions);
        assert_eq!(600, opts.frame_ms);
        assert_eq!(None, opts.max_cycles);
        assert!(!opts.list);
    }

    #[test]
    fn test_profile_required() {
        assert!(CliOptions::try_parse_from(["gather-bot"]).is_err());
    }
}
