//! Daily challenges: one fixed set per calendar day

use chrono::NaiveDate;
use rand::Rng;

use crate::models::{ChallengeKey, DailyChallenge, Difficulty, QuestReward};

/// Stored alongside the challenge blob to detect day rollover
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy)]
pub struct ChallengeTemplate {
    pub id: &'static str,
    pub key: ChallengeKey,
    pub title: &'static str,
    pub description: &'static str,
    pub targets: &'static [u32],
    pub reward_points: &'static [u64],
    pub reward_xp: &'static [u64],
}

pub const CHALLENGE_TEMPLATES: &[ChallengeTemplate] = &[
    ChallengeTemplate {
        id: "daily_streak",
        key: ChallengeKey::StreakRun,
        title: "On a Roll",
        description: "Build a streak of {target}",
        targets: &[3, 5, 7],
        reward_points: &[20, 35, 60],
        reward_xp: &[30, 60, 100],
    },
    ChallengeTemplate {
        id: "daily_photo",
        key: ChallengeKey::PhotoShots,
        title: "Say Cheese",
        description: "Complete {target} photo dares",
        targets: &[1, 2, 3],
        reward_points: &[25, 45, 70],
        reward_xp: &[40, 70, 110],
    },
    ChallengeTemplate {
        id: "daily_explorer",
        key: ChallengeKey::CategoryExplorer,
        title: "Explorer",
        description: "Complete tasks in {target} different categories",
        targets: &[2, 3],
        reward_points: &[30, 50],
        reward_xp: &[40, 80],
    },
    ChallengeTemplate {
        id: "daily_hard",
        key: ChallengeKey::HardHitter,
        title: "No Fear",
        description: "Complete {target} hard tasks",
        targets: &[1, 3, 5],
        reward_points: &[30, 60, 100],
        reward_xp: &[50, 100, 160],
    },
];

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// True when the stored date is missing, unreadable, or not `today`
pub fn needs_regeneration(last_update: Option<&str>, today: NaiveDate) -> bool {
    match last_update.and_then(|s| NaiveDate::parse_from_str(s, DATE_FORMAT).ok()) {
        Some(date) => date != today,
        None => true,
    }
}

pub fn generate_challenge<R: Rng + ?Sized>(template: &ChallengeTemplate, today: NaiveDate, rng: &mut R) -> DailyChallenge {
    let tiers = template.targets.len().max(1);
    let tier = rng.gen_range(0..tiers);
    let target_value = template.targets.get(tier).copied().unwrap_or(1).max(1);
    let points = template.reward_points.get(tier).copied().unwrap_or_default();
    let xp = template.reward_xp.get(tier).copied().unwrap_or_default();

    DailyChallenge {
        id: template.id.to_string(),
        key: template.key,
        title: template.title.to_string(),
        description: template.description.replace("{target}", &target_value.to_string()),
        tier,
        target_value,
        current_progress: 0,
        reward: QuestReward {
            points: (points > 0).then_some(points),
            xp: (xp > 0).then_some(xp),
            ..QuestReward::default()
        },
        is_completed: false,
        seen_categories: Default::default(),
        date: today,
    }
}

/// A fresh full set for `today`
pub fn generate_daily_set<R: Rng + ?Sized>(today: NaiveDate, rng: &mut R) -> Vec<DailyChallenge> {
    CHALLENGE_TEMPLATES
        .iter()
        .map(|t| generate_challenge(t, today, rng))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChallengeSignal<'a> {
    pub completed: bool,
    pub difficulty: Difficulty,
    pub is_photo: bool,
    pub new_streak: u32,
    pub category: &'a str,
}

fn next_progress(challenge: &mut DailyChallenge, signal: &ChallengeSignal<'_>) -> Option<u32> {
    let bump = challenge.current_progress.saturating_add(1);
    match challenge.key {
        ChallengeKey::StreakRun => Some(signal.new_streak),
        ChallengeKey::PhotoShots => (signal.completed && signal.is_photo).then_some(bump),
        ChallengeKey::HardHitter => {
            (signal.completed && signal.difficulty == Difficulty::Hard).then_some(bump)
        }
        ChallengeKey::CategoryExplorer => {
            if !signal.completed || signal.category.is_empty() {
                return None;
            }
            challenge.seen_categories.insert(signal.category.to_string());
            Some(challenge.seen_categories.len() as u32)
        }
    }
}

/// Advance incomplete challenges; returns updated list and ids completed now
pub fn advance_challenges(
    challenges: &[DailyChallenge],
    signal: &ChallengeSignal<'_>,
) -> (Vec<DailyChallenge>, Vec<String>) {
    let mut completed_now = Vec::new();
    let updated = challenges
        .iter()
        .map(|challenge| {
            let mut challenge = challenge.clone();
            if challenge.is_completed {
                return challenge;
            }
            if let Some(progress) = next_progress(&mut challenge, signal) {
                if progress != challenge.current_progress {
                    challenge.current_progress = progress;
                    if progress >= challenge.target_value {
                        challenge.is_completed = true;
                        completed_now.push(challenge.id.clone());
                    }
                }
            }
            challenge
        })
        .collect();
    (updated, completed_now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn signal<'a>(category: &'a str) -> ChallengeSignal<'a> {
        ChallengeSignal {
            completed: true,
            difficulty: Difficulty::Easy,
            is_photo: false,
            new_streak: 1,
            category,
        }
    }

    fn challenge(key: ChallengeKey, target: u32) -> DailyChallenge {
        let mut rng = StdRng::seed_from_u64(2);
        let template = CHALLENGE_TEMPLATES.iter().find(|t| t.key == key).unwrap();
        let mut c = generate_challenge(template, day(1), &mut rng);
        c.target_value = target;
        c
    }

    #[test]
    fn test_daily_set_uses_fixed_ids() {
        let mut rng = StdRng::seed_from_u64(9);
        let set = generate_daily_set(day(1), &mut rng);
        let ids: Vec<&str> = set.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["daily_streak", "daily_photo", "daily_explorer", "daily_hard"]);
        for c in &set {
            assert_eq!(c.date, day(1));
            assert!(c.target_value > 0);
        }
    }

    #[test]
    fn test_regeneration_by_calendar_day() {
        assert!(needs_regeneration(None, day(1)));
        assert!(needs_regeneration(Some("garbage"), day(1)));
        assert!(!needs_regeneration(Some("2024-03-01"), day(1)));
        assert!(needs_regeneration(Some("2024-03-01"), day(2)));
        assert_eq!(format_date(day(5)), "2024-03-05");
    }

    #[test]
    fn test_explorer_counts_distinct_categories() {
        let c = challenge(ChallengeKey::CategoryExplorer, 2);
        let (after_one, done) = advance_challenges(&[c], &signal("classic"));
        assert_eq!(after_one[0].current_progress, 1);
        assert!(done.is_empty());

        let (same, _) = advance_challenges(&after_one, &signal("classic"));
        assert_eq!(same[0].current_progress, 1);

        let (two, done) = advance_challenges(&same, &signal("party"));
        assert_eq!(two[0].current_progress, 2);
        assert!(two[0].is_completed);
        assert_eq!(done, vec!["daily_explorer".to_string()]);
    }

    #[test]
    fn test_photo_and_hard_rules() {
        let photo = challenge(ChallengeKey::PhotoShots, 2);
        let hard = challenge(ChallengeKey::HardHitter, 1);
        let mut s = signal("classic");
        s.is_photo = true;
        let (updated, _) = advance_challenges(&[photo.clone(), hard.clone()], &s);
        assert_eq!(updated[0].current_progress, 1);
        assert_eq!(updated[1].current_progress, 0);

        let mut s = signal("classic");
        s.difficulty = Difficulty::Hard;
        let (updated, done) = advance_challenges(&[photo, hard], &s);
        assert_eq!(updated[0].current_progress, 0);
        assert!(updated[1].is_completed);
        assert_eq!(done, vec!["daily_hard".to_string()]);
    }

    #[test]
    fn test_streak_challenge_follows_streak() {
        let c = challenge(ChallengeKey::StreakRun, 3);
        let mut s = signal("classic");
        s.new_streak = 2;
        let (updated, _) = advance_challenges(&[c], &s);
        assert_eq!(updated[0].current_progress, 2);

        let mut failed = signal("classic");
        failed.completed = false;
        failed.new_streak = 0;
        let (updated, _) = advance_challenges(&updated, &failed);
        assert_eq!(updated[0].current_progress, 0);
    }
}
