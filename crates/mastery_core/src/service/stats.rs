//! Derived statistics over the daily progress ledger.
//!
//! # Responsibility
//! - Recompute streaks, rolling completion average, and deep-work totals.
//!
//! # Invariants
//! - `total_tasks_completed` and `last_active_date` are counters owned by
//!   task completion; recomputation leaves them untouched.
//! - `longest_streak` never decreases.

use crate::model::progress::DailyProgress;
use crate::model::user::User;
use chrono::{Duration, NaiveDate};

/// Streak lengths measured in calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StreakStats {
    /// Run ending today or yesterday; zero once a full day is missed.
    pub current: u32,
    pub longest: u32,
}

/// Computes streaks over days on which at least one task was completed.
pub fn calculate_streaks(ledger: &[DailyProgress], today: NaiveDate) -> StreakStats {
    let mut days: Vec<NaiveDate> = ledger
        .iter()
        .filter(|entry| !entry.tasks_completed.is_empty() && entry.date <= today)
        .map(|entry| entry.date)
        .collect();
    days.sort_unstable();
    days.dedup();

    let Some(&last_day) = days.last() else {
        return StreakStats::default();
    };

    let mut longest = 1u32;
    let mut run = 1u32;
    for pair in days.windows(2) {
        if pair[0].succ_opt() == Some(pair[1]) {
            run += 1;
            longest = longest.max(run);
        } else {
            run = 1;
        }
    }

    let yesterday = today.pred_opt().unwrap_or(today);
    let current = if last_day == today || last_day == yesterday {
        // `run` is the trailing run after the loop.
        run
    } else {
        0
    };

    StreakStats { current, longest }
}

/// Mean completed-task count over ledger entries inside the trailing window.
///
/// The window covers `window_days` calendar days ending at `today`.
pub fn average_daily_completion(
    ledger: &[DailyProgress],
    today: NaiveDate,
    window_days: u32,
) -> f64 {
    let span = i64::from(window_days.max(1)) - 1;
    let window_start = today
        .checked_sub_signed(Duration::days(span))
        .unwrap_or(NaiveDate::MIN);

    let counts: Vec<usize> = ledger
        .iter()
        .filter(|entry| entry.date >= window_start && entry.date <= today)
        .map(|entry| entry.tasks_completed.len())
        .collect();

    if counts.is_empty() {
        return 0.0;
    }
    counts.iter().sum::<usize>() as f64 / counts.len() as f64
}

pub fn deep_work_hours(ledger: &[DailyProgress]) -> f64 {
    let minutes: u64 = ledger
        .iter()
        .map(|entry| u64::from(entry.deep_work_minutes))
        .sum();
    minutes as f64 / 60.0
}

/// Refreshes every derived stat on `user` in place.
pub fn recompute_stats(user: &mut User, today: NaiveDate, window_days: u32) {
    let streaks = calculate_streaks(&user.daily_progress, today);
    let stats = &mut user.stats;
    stats.current_streak = streaks.current;
    stats.longest_streak = stats.longest_streak.max(streaks.longest);
    stats.average_daily_completion =
        average_daily_completion(&user.daily_progress, today, window_days);
    stats.deep_work_hours = deep_work_hours(&user.daily_progress);
    stats.sigil_evolution_count = user.sigil.evolution_history.len() as u64;
}
