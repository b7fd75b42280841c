//! Scatter/chase sequencing. Frightened is tracked separately per ghost and
//! never touches this timer.

use crate::level::{duration_to_ticks, GlobalMode, LevelConfig, ModePhase};

/// A schedule entry with its duration already in ticks. `None` never expires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledPhase {
    pub mode: GlobalMode,
    pub ticks: Option<u32>,
}

/// Arcade progression used when a level carries no explicit schedule.
pub fn canonical_schedule(level: u32) -> Vec<ModePhase> {
    let scatter_ms = if level >= 5 { 5000 } else { 7000 };
    vec![
        ModePhase::timed(GlobalMode::Scatter, scatter_ms),
        ModePhase::timed(GlobalMode::Chase, 20_000),
        ModePhase::timed(GlobalMode::Scatter, scatter_ms),
        ModePhase::timed(GlobalMode::Chase, 20_000),
        ModePhase::timed(GlobalMode::Scatter, 5000),
        ModePhase::infinite(GlobalMode::Chase),
    ]
}

pub fn mode_schedule(level: u32, config: Option<&LevelConfig>) -> Vec<ScheduledPhase> {
    let phases = match config.and_then(|c| c.mode_schedule.as_ref()) {
        Some(phases) if !phases.is_empty() => phases.clone(),
        _ => canonical_schedule(level),
    };
    phases
        .into_iter()
        .map(|p| ScheduledPhase {
            mode: p.mode,
            ticks: duration_to_ticks(p.duration_ms),
        })
        .collect()
}

/// Position within the schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeTimer {
    pub index: usize,
    pub ticks_remaining: Option<u32>,
}

impl ModeTimer {
    /// Timer at the first entry with that entry's duration loaded.
    pub fn start(schedule: &[ScheduledPhase]) -> Self {
        Self {
            index: 0,
            ticks_remaining: schedule.first().and_then(|p| p.ticks),
        }
    }

    /// The mode at the (clamped) current index. An empty schedule chases.
    pub fn mode(&self, schedule: &[ScheduledPhase]) -> GlobalMode {
        match schedule.len() {
            0 => GlobalMode::Chase,
            n => schedule[self.index.min(n - 1)].mode,
        }
    }

    /// One tick of progress. Reaching zero loads the next entry, clamped at
    /// the last one.
    pub fn advance(self, schedule: &[ScheduledPhase]) -> Self {
        let Some(remaining) = self.ticks_remaining else {
            return self;
        };
        let remaining = remaining.saturating_sub(1);
        if remaining > 0 || schedule.is_empty() {
            return Self {
                ticks_remaining: Some(remaining),
                ..self
            };
        }
        let index = (self.index + 1).min(schedule.len() - 1);
        log::debug!(
            "global mode -> {:?} (phase {})",
            schedule[index].mode,
            index
        );
        Self {
            index,
            ticks_remaining: schedule[index].ticks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::LevelTable;

    #[test]
    fn builtin_levels_use_the_canonical_progression() {
        let table = LevelTable::default();
        let early = mode_schedule(1, table.get(1));
        let late = mode_schedule(5, table.get(5));
        assert_eq!(early.len(), 6);
        assert_eq!(early[0].ticks, Some(88));
        assert_eq!(late[0].ticks, Some(63));
        assert_eq!(
            early[5],
            ScheduledPhase {
                mode: GlobalMode::Chase,
                ticks: None,
            }
        );
    }

    #[test]
    fn explicit_schedule_wins() {
        let table = LevelTable::default();
        let mut config = table.get(1).cloned().expect("level 1");
        config.mode_schedule = Some(vec![ModePhase::infinite(GlobalMode::Chase)]);
        let schedule = mode_schedule(1, Some(&config));
        assert_eq!(schedule.len(), 1);
        assert_eq!(ModeTimer::start(&schedule).mode(&schedule), GlobalMode::Chase);
    }

    #[test]
    fn timer_walks_phases_and_stops_on_infinite() {
        let schedule = vec![
            ScheduledPhase {
                mode: GlobalMode::Scatter,
                ticks: Some(2),
            },
            ScheduledPhase {
                mode: GlobalMode::Chase,
                ticks: None,
            },
        ];
        let mut timer = ModeTimer::start(&schedule);
        assert_eq!(timer.mode(&schedule), GlobalMode::Scatter);
        timer = timer.advance(&schedule);
        assert_eq!(timer.ticks_remaining, Some(1));
        timer = timer.advance(&schedule);
        assert_eq!(timer.index, 1);
        assert_eq!(timer.mode(&schedule), GlobalMode::Chase);
        for _ in 0..100 {
            timer = timer.advance(&schedule);
        }
        assert_eq!(
            timer,
            ModeTimer {
                index: 1,
                ticks_remaining: None,
            }
        );
    }

    #[test]
    fn final_timed_phase_reloads_in_place() {
        let schedule = vec![ScheduledPhase {
            mode: GlobalMode::Scatter,
            ticks: Some(1),
        }];
        let timer = ModeTimer::start(&schedule).advance(&schedule);
        assert_eq!(
            timer,
            ModeTimer {
                index: 0,
                ticks_remaining: Some(1),
            }
        );
    }

    #[test]
    fn index_out_of_range_is_clamped() {
        let schedule = mode_schedule(1, None);
        let timer = ModeTimer {
            index: 99,
            ticks_remaining: None,
        };
        assert_eq!(timer.mode(&schedule), GlobalMode::Chase);
    }
}
