//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `tally_core` linkage.
//! - Drive one short counting session with deterministic output.

use std::process::ExitCode;
use tally_core::{CounterService, NoopFeedback, ServiceResult, PRESET_COLORS};

fn main() -> ExitCode {
    println!("tally_core ping={}", tally_core::ping());
    println!("tally_core version={}", tally_core::core_version());

    match run_session() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("session failed: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run_session() -> ServiceResult<()> {
    let mut service = CounterService::new(NoopFeedback);
    service.create_counter("Smoke", 3, PRESET_COLORS[1])?;

    for _ in 0..3 {
        let outcome = service.tap()?;
        println!(
            "tap count={} progress={}% goal_reached={}",
            outcome.count, outcome.progress_percent, outcome.goal_reached
        );
    }

    service.confirm_reset()?;
    let totals = service.with_store(|store| {
        store
            .active_counter()
            .map(|counter| (counter.count, counter.daily_count, counter.lifetime_count))
    })?;
    if let Some((count, daily, lifetime)) = totals {
        println!("reset count={count} daily={daily} lifetime={lifetime}");
    }
    Ok(())
}
