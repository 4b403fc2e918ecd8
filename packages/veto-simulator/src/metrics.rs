//! Per-veto records and run-level summary statistics.

use serde::Serialize;
use veto_backend::domain::{FinalMap, MapId, Side, Team};

use crate::simulator::VetoResult;

/// One line of simulator output.
#[derive(Debug, Clone, Serialize)]
pub struct VetoMetrics {
    pub veto_num: u32,
    pub room_id: String,
    pub seed: u64,
    pub timestamp: String,
    pub format: String,
    pub pool: Vec<MapId>,
    pub bans: Vec<BanRecord>,
    pub final_maps: Vec<FinalMap>,
    pub accepted_actions: usize,
    pub rejected_actions: usize,
    pub final_version: i32,
    pub duration_ms: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct BanRecord {
    pub team: Team,
    pub map_id: MapId,
}

pub fn build_veto_metrics(veto_num: u32, seed: u64, result: &VetoResult, duration_ms: f64) -> VetoMetrics {
    let timestamp = time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| "unknown".to_string());

    VetoMetrics {
        veto_num,
        room_id: result.room_id.to_string(),
        seed,
        timestamp,
        format: result.format.to_string(),
        pool: result.pool.clone(),
        bans: result
            .bans
            .iter()
            .map(|(team, map_id)| BanRecord {
                team: *team,
                map_id: map_id.clone(),
            })
            .collect(),
        final_maps: result.final_maps.clone(),
        accepted_actions: result.accepted,
        rejected_actions: result.rejected,
        final_version: result.final_version,
        duration_ms,
    }
}

/// Aggregates printed at the end of a run.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Summary {
    pub vetoes: usize,
    pub maps_played: usize,
    pub rejected: usize,
    /// Maps each team starts on attack.
    pub attack_starts: [usize; 2],
    /// Side choices where the choosing team took defense.
    pub defense_choices: usize,
}

impl Summary {
    pub fn record(&mut self, result: &VetoResult) {
        self.vetoes += 1;
        self.rejected += result.rejected;
        for map in &result.final_maps {
            self.maps_played += 1;
            self.attack_starts[team_index(map.attacking_team)] += 1;
            if map.side == Side::Defense {
                self.defense_choices += 1;
            }
        }
    }

    pub fn attack_share(&self, team: Team) -> f64 {
        if self.maps_played == 0 {
            return 0.0;
        }
        self.attack_starts[team_index(team)] as f64 / self.maps_played as f64
    }
}

fn team_index(team: Team) -> usize {
    match team {
        Team::A => 0,
        Team::B => 1,
    }
}
