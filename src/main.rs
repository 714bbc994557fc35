use std::time::Duration;

use anyhow::Context;
use colored::Colorize;
use gather_bot::{
    bootstrap::{opts::CliOptions, profile::GatherProfile, ReplayFiles},
    client::{
        clock::ManualClock,
        session::{GatherSession, SessionEvent},
        timing::{Increment, Incremental},
    },
};
use interfaces::{SessionSummary, Tag};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() {
    match run() {
        Ok(()) => {}

        // print the error in non-debug fashion
        Err(err) => println!("{err:#}"),
    }
}

fn setup_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run() -> anyhow::Result<()> {
    let CliOptions {
        profile,
        positions,
        observations,
        respawns,
        frame_ms,
        max_cycles,
        list,
        json,
        verbose,
    } = CliOptions::get();

    setup_logging(verbose);

    let profile = GatherProfile::load(&profile)?;

    // replayed frames drive the tracker's clock
    let clock = ManualClock::new();

    let files = ReplayFiles {
        positions: &positions,
        observations: &observations,
        respawns: respawns.as_deref(),
    };
    let replay = files.load(clock.clone(), Duration::from_millis(frame_ms))?;

    info!(
        profile = %profile.name,
        frames = replay.len(),
        ids = ?profile.object_ids,
        "starting gathering session"
    );

    let tracker = profile
        .tracker(clock)
        .context("could not build tracker from profile")?;

    let mut session = GatherSession::new(replay, tracker)
        .exclude_depleted(profile.exclude_depleted)
        .list_nodes(list)
        .max_cycles(max_cycles);

    loop {
        let step = session.iterate();

        for event in session.drain_events() {
            print_event(&event, json)?;
        }

        if let Increment::Finished(summary) = step {
            print_summary(&summary, json)?;
            return Ok(());
        }
    }
}

fn print_event(event: &SessionEvent, json: bool) -> anyhow::Result<()> {
    if json {
        let line = match event {
            SessionEvent::Worked(worked) => worked.encode(),
            SessionEvent::Listing(listing) => listing.encode(),
            SessionEvent::Respawned(respawned) => respawned.encode(),
        }?;
        println!("{line}");
        return Ok(());
    }

    match event {
        SessionEvent::Worked(worked) => println!(
            "{} {} {}",
            format!("[{}]", worked.cycle).dimmed(),
            "worked".green(),
            worked.node
        ),
        SessionEvent::Listing(listing) => {
            println!(
                "{} {} nodes visible from {}",
                format!("[{}]", listing.cycle).dimmed(),
                listing.nodes.len(),
                listing.player
            );
            for node in &listing.nodes {
                if node.is_depleted {
                    println!("    {}", node.to_string().red());
                } else {
                    println!("    {node}");
                }
            }
        }
        SessionEvent::Respawned(respawned) => {
            println!("{} {}", "respawned".yellow(), respawned.key);
        }
    }

    Ok(())
}

fn print_summary(summary: &SessionSummary, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", summary.encode()?);
        return Ok(());
    }

    println!();
    println!("{}", "Session finished".bold());
    println!("Cycles: {}", summary.cycles);
    println!("Nodes Worked: {}", summary.nodes_worked.to_string().green());
    println!("Idle Cycles: {}", summary.idle_cycles);
    println!("Position Failures: {}", summary.position_failures);
    println!("Depleted Nodes Tracked: {}", summary.depleted_tracked);
    Ok(())
}
