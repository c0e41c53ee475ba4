//! Achievement catalog and unlock evaluation.
//!
//! # Responsibility
//! - Define the fixed set of unlockable achievements.
//! - Append newly satisfied achievements to the aggregate.
//!
//! # Invariants
//! - Each catalog id is unlocked at most once per user.
//! - Unlocks are append-only; nothing is ever re-locked.

use crate::model::sigil::MASTER_THRESHOLD;
use crate::model::user::{Achievement, AchievementCategory, User};
use chrono::{DateTime, Utc};

struct AchievementDef {
    id: &'static str,
    title: &'static str,
    description: &'static str,
    category: AchievementCategory,
    icon: &'static str,
    is_met: fn(&User) -> bool,
}

const CATALOG: &[AchievementDef] = &[
    AchievementDef {
        id: "first_task",
        title: "First Step",
        description: "Complete your first task",
        category: AchievementCategory::Milestone,
        icon: "footprints",
        is_met: has_first_task,
    },
    AchievementDef {
        id: "ten_tasks",
        title: "Momentum",
        description: "Complete 10 tasks",
        category: AchievementCategory::Milestone,
        icon: "zap",
        is_met: has_ten_tasks,
    },
    AchievementDef {
        id: "streak_3",
        title: "Kindling",
        description: "Complete tasks three days in a row",
        category: AchievementCategory::Consistency,
        icon: "flame",
        is_met: has_three_day_streak,
    },
    AchievementDef {
        id: "streak_7",
        title: "Week of Fire",
        description: "Complete tasks seven days in a row",
        category: AchievementCategory::Consistency,
        icon: "calendar-check",
        is_met: has_seven_day_streak,
    },
    AchievementDef {
        id: "goal_achieved",
        title: "Summit",
        description: "Bring a goal to 100% progress",
        category: AchievementCategory::Depth,
        icon: "mountain",
        is_met: has_achieved_goal,
    },
    AchievementDef {
        id: "linked_task",
        title: "Woven Threads",
        description: "Complete a task linked to a goal",
        category: AchievementCategory::Integration,
        icon: "link",
        is_met: has_completed_linked_task,
    },
    AchievementDef {
        id: "sigil_master",
        title: "Transcendent",
        description: "Reach a total aspect score of 50",
        category: AchievementCategory::Milestone,
        icon: "sparkles",
        is_met: has_master_total,
    },
];

/// Returns every catalog achievement in locked state.
pub fn all_achievements() -> Vec<Achievement> {
    CATALOG.iter().map(|def| to_achievement(def, None)).collect()
}

/// Unlocks newly satisfied achievements on `user`.
///
/// Returns the ids unlocked by this call.
pub fn unlock_new_achievements(user: &mut User, now: DateTime<Utc>) -> Vec<String> {
    let newly_met: Vec<&AchievementDef> = CATALOG
        .iter()
        .filter(|def| !user.achievements.iter().any(|owned| owned.id == def.id))
        .filter(|def| (def.is_met)(user))
        .collect();

    newly_met
        .into_iter()
        .map(|def| {
            user.achievements.push(to_achievement(def, Some(now)));
            def.id.to_string()
        })
        .collect()
}

fn to_achievement(def: &AchievementDef, unlocked_at: Option<DateTime<Utc>>) -> Achievement {
    Achievement {
        id: def.id.to_string(),
        title: def.title.to_string(),
        description: def.description.to_string(),
        category: def.category,
        unlocked_at,
        icon: def.icon.to_string(),
    }
}

fn has_first_task(user: &User) -> bool {
    user.stats.total_tasks_completed >= 1
}

fn has_ten_tasks(user: &User) -> bool {
    user.stats.total_tasks_completed >= 10
}

fn has_three_day_streak(user: &User) -> bool {
    user.stats.longest_streak >= 3
}

fn has_seven_day_streak(user: &User) -> bool {
    user.stats.longest_streak >= 7
}

fn has_achieved_goal(user: &User) -> bool {
    user.goals.iter().any(|goal| goal.is_achieved())
}

fn has_completed_linked_task(user: &User) -> bool {
    user.tasks
        .iter()
        .any(|task| task.completed && !task.linked_goals.is_empty())
}

fn has_master_total(user: &User) -> bool {
    user.sigil.aspects.total() >= MASTER_THRESHOLD
}

#[cfg(test)]
mod tests {
    use super::{all_achievements, unlock_new_achievements};
    use crate::model::user::User;
    use chrono::{TimeZone, Utc};

    #[test]
    fn catalog_starts_locked() {
        assert!(all_achievements()
            .iter()
            .all(|achievement| achievement.unlocked_at.is_none()));
    }

    #[test]
    fn unlock_is_idempotent() {
        let now = Utc.with_ymd_and_hms(2026, 8, 1, 9, 0, 0).unwrap();
        let mut user = User::new(now);
        user.stats.total_tasks_completed = 1;

        assert_eq!(unlock_new_achievements(&mut user, now), vec!["first_task"]);
        assert!(unlock_new_achievements(&mut user, now).is_empty());
        assert_eq!(user.achievements.len(), 1);
        assert_eq!(user.achievements[0].unlocked_at, Some(now));
    }
}
