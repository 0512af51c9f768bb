//! Representative daily EV schedule, tiled over the horizon.

use std::path::Path;

use anyhow::{ensure, Context, Result};
use evcap_core::EvSchedule;
use serde::{Deserialize, Serialize};

pub const HOURS_PER_DAY: usize = 24;

/// 24-hour availability, SOC floor and driving-loss profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyPattern {
    pub availability: [f64; HOURS_PER_DAY],
    pub soc_requirement: [f64; HOURS_PER_DAY],
    pub driving_loss: [f64; HOURS_PER_DAY],
}

impl Default for DailyPattern {
    /// Commuter day: plugged in at home overnight, partly at work, full
    /// battery expected before the morning drive.
    fn default() -> Self {
        let mut availability = [0.8; HOURS_PER_DAY];
        for a in &mut availability[8..18] {
            *a = 0.4;
        }
        let mut soc_requirement = [0.0; HOURS_PER_DAY];
        soc_requirement[8] = 0.8;
        let mut driving_loss = [0.0; HOURS_PER_DAY];
        driving_loss[9] = 0.2;
        driving_loss[18] = 0.2;

        Self {
            availability,
            soc_requirement,
            driving_loss,
        }
    }
}

impl DailyPattern {
    /// Repeat the day until `hours` entries exist; a partial last day is cut.
    pub fn expand(&self, hours: usize) -> EvSchedule {
        let tile = |day: &[f64; HOURS_PER_DAY]| -> Vec<f64> {
            (0..hours).map(|t| day[t % HOURS_PER_DAY]).collect()
        };
        EvSchedule::new(
            tile(&self.availability),
            tile(&self.soc_requirement),
            tile(&self.driving_loss),
        )
    }

    pub fn daily_loss(&self) -> f64 {
        self.driving_loss.iter().sum()
    }
}

#[derive(Serialize)]
struct ScheduleRecord {
    t: usize,
    #[serde(rename = "EV_avail")]
    availability: f64,
    #[serde(rename = "SOC_req")]
    soc_requirement: f64,
    driving_loss: f64,
}

/// Write `schedule` as an EV schedule table with 0-based hours.
pub fn write_ev_schedule(path: &Path, schedule: &EvSchedule) -> Result<()> {
    let hours = schedule.len();
    ensure!(
        schedule.soc_requirement.len() == hours && schedule.driving_loss.len() == hours,
        "schedule series have different lengths"
    );

    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("creating CSV writer for {}", path.display()))?;
    for t in 0..hours {
        wtr.serialize(ScheduleRecord {
            t,
            availability: schedule.availability[t],
            soc_requirement: schedule.soc_requirement[t],
            driving_loss: schedule.driving_loss[t],
        })
        .context("writing CSV record")?;
    }
    wtr.flush().context("flushing CSV writer")?;
    Ok(())
}
