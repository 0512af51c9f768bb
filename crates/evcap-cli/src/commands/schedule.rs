//! `evcap schedule`

use std::path::Path;

use anyhow::{ensure, Result};
use evcap_io::{write_ev_schedule, DailyPattern};
use tracing::info;

pub fn handle(out: &Path, hours: usize) -> Result<()> {
    ensure!(hours > 0, "schedule must cover at least one hour");
    let pattern = DailyPattern::default();
    write_ev_schedule(out, &pattern.expand(hours))?;
    info!(
        "Wrote {}-hour schedule (daily driving loss {:.2}) to {}",
        hours,
        pattern.daily_loss(),
        out.display()
    );
    println!("Schedule written to {}", out.display());
    Ok(())
}
