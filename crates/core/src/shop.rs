//! Virtual shop: items, effects and the central effect applier

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};
use crate::messages::GameEffect;
use crate::models::PlayerStats;

/// What an item does once bought
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ShopEffect {
    /// Takes points away (clamped at zero)
    ConsumePoints { amount: u64 },
    GrantXpBoost { minutes: u32 },
    GrantSkipToken { count: u32 },
    /// Resolves to one of the other effects at purchase time
    GrantRandomSurprise,
}

impl ShopEffect {
    pub fn describe(&self) -> String {
        match self {
            ShopEffect::ConsumePoints { amount } => format!("lost {} points", amount),
            ShopEffect::GrantXpBoost { minutes } => format!("{} minutes of double XP", minutes),
            ShopEffect::GrantSkipToken { count } if *count == 1 => "a skip token".to_string(),
            ShopEffect::GrantSkipToken { count } => format!("{} skip tokens", count),
            ShopEffect::GrantRandomSurprise => "a mystery surprise".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShopItem {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub price: u64,
    pub effect: ShopEffect,
}

pub const SHOP_ITEMS: &[ShopItem] = &[
    ShopItem {
        id: "skip_token",
        name: "Skip Token",
        description: "Skip a task without losing your streak",
        price: 100,
        effect: ShopEffect::GrantSkipToken { count: 1 },
    },
    ShopItem {
        id: "skip_bundle",
        name: "Skip Bundle",
        description: "Three skip tokens at a discount",
        price: 250,
        effect: ShopEffect::GrantSkipToken { count: 3 },
    },
    ShopItem {
        id: "xp_boost",
        name: "XP Boost",
        description: "Double XP for 15 minutes",
        price: 200,
        effect: ShopEffect::GrantXpBoost { minutes: 15 },
    },
    ShopItem {
        id: "mystery_box",
        name: "Mystery Box",
        description: "Could be anything. Could be nothing.",
        price: 150,
        effect: ShopEffect::GrantRandomSurprise,
    },
];

/// Possible surprise outcomes with their weights
const SURPRISES: &[(ShopEffect, u32)] = &[
    (ShopEffect::GrantSkipToken { count: 1 }, 35),
    (ShopEffect::GrantSkipToken { count: 2 }, 15),
    (ShopEffect::GrantXpBoost { minutes: 10 }, 25),
    (ShopEffect::GrantXpBoost { minutes: 30 }, 10),
    (ShopEffect::ConsumePoints { amount: 25 }, 15),
];

pub fn find_item(id: &str) -> Result<&'static ShopItem> {
    SHOP_ITEMS
        .iter()
        .find(|item| item.id == id)
        .ok_or_else(|| GameError::UnknownItem(id.to_string()))
}

/// Roll a mystery box into a concrete effect
pub fn roll_surprise<R: Rng + ?Sized>(rng: &mut R) -> ShopEffect {
    let total: u32 = SURPRISES.iter().map(|(_, w)| *w).sum();
    let mut roll = rng.gen_range(0..total);
    for (effect, weight) in SURPRISES {
        if roll < *weight {
            return *effect;
        }
        roll -= weight;
    }
    SURPRISES[0].0
}

/// Extend (or start) the XP boost window
pub fn extend_boost(stats: &mut PlayerStats, minutes: u32, now: DateTime<Utc>) {
    let start = match stats.xp_boost_end_time {
        Some(end) if end > now => end,
        _ => now,
    };
    stats.xp_boost_end_time = Some(start + Duration::minutes(minutes as i64));
}

/// Apply an effect to a copy of `stats`. Surprises are rolled first; the
/// concrete effect that was applied is returned alongside the new stats.
pub fn apply_effect<R: Rng + ?Sized>(
    stats: &PlayerStats,
    effect: ShopEffect,
    now: DateTime<Utc>,
    rng: &mut R,
) -> (PlayerStats, ShopEffect) {
    let mut next = stats.clone();
    let applied = match effect {
        ShopEffect::GrantRandomSurprise => roll_surprise(rng),
        other => other,
    };
    match applied {
        ShopEffect::ConsumePoints { amount } => {
            next.points = next.points.saturating_sub(amount);
        }
        ShopEffect::GrantXpBoost { minutes } => extend_boost(&mut next, minutes, now),
        ShopEffect::GrantSkipToken { count } => {
            next.skip_tokens = next.skip_tokens.saturating_add(count);
        }
        ShopEffect::GrantRandomSurprise => {}
    }
    (next, applied)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Purchase {
    pub stats: PlayerStats,
    pub applied: ShopEffect,
    pub effects: Vec<GameEffect>,
}

/// Buy an item: validate funds, charge the price, apply the effect
pub fn purchase<R: Rng + ?Sized>(
    stats: &PlayerStats,
    item_id: &str,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Result<Purchase> {
    let item = find_item(item_id)?;
    if stats.points < item.price {
        return Err(GameError::InsufficientFunds {
            price: item.price,
            available: stats.points,
        });
    }

    let mut charged = stats.clone();
    charged.points -= item.price;
    let (next, applied) = apply_effect(&charged, item.effect, now, rng);

    let mut effects = vec![GameEffect::ItemPurchased {
        item_id: item.id.to_string(),
        price: item.price,
    }];
    if item.effect == ShopEffect::GrantRandomSurprise {
        effects.push(GameEffect::SurpriseRevealed { effect: applied });
    }
    tracing::info!("Purchased {} for {} points ({:?})", item.id, item.price, applied);

    Ok(Purchase { stats: next, applied, effects })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    fn rich() -> PlayerStats {
        PlayerStats { points: 1_000, ..PlayerStats::default() }
    }

    #[test]
    fn test_buy_skip_token() {
        let mut rng = StdRng::seed_from_u64(1);
        let result = purchase(&rich(), "skip_token", now(), &mut rng).unwrap();
        assert_eq!(result.stats.points, 900);
        assert_eq!(result.stats.skip_tokens, 1);
    }

    #[test]
    fn test_insufficient_funds_leaves_stats_untouched() {
        let mut rng = StdRng::seed_from_u64(1);
        let poor = PlayerStats { points: 50, ..PlayerStats::default() };
        let err = purchase(&poor, "xp_boost", now(), &mut rng).unwrap_err();
        assert_eq!(err, GameError::InsufficientFunds { price: 200, available: 50 });
        assert_eq!(poor.points, 50);
    }

    #[test]
    fn test_unknown_item() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(
            purchase(&rich(), "golden_goose", now(), &mut rng),
            Err(GameError::UnknownItem(_))
        ));
    }

    #[test]
    fn test_boost_stacks_on_running_window() {
        let mut rng = StdRng::seed_from_u64(1);
        let first = purchase(&rich(), "xp_boost", now(), &mut rng).unwrap();
        assert_eq!(first.stats.xp_boost_end_time, Some(now() + Duration::minutes(15)));
        let second = purchase(&first.stats, "xp_boost", now() + Duration::minutes(5), &mut rng).unwrap();
        assert_eq!(second.stats.xp_boost_end_time, Some(now() + Duration::minutes(30)));
    }

    #[test]
    fn test_expired_boost_restarts_from_now() {
        let mut stats = rich();
        stats.xp_boost_end_time = Some(now() - Duration::hours(1));
        extend_boost(&mut stats, 10, now());
        assert_eq!(stats.xp_boost_end_time, Some(now() + Duration::minutes(10)));
    }

    #[test]
    fn test_mystery_box_resolves_to_concrete_effect() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..50 {
            let result = purchase(&rich(), "mystery_box", now(), &mut rng).unwrap();
            assert_ne!(result.applied, ShopEffect::GrantRandomSurprise);
            assert!(result
                .effects
                .iter()
                .any(|e| matches!(e, GameEffect::SurpriseRevealed { .. })));
        }
    }

    #[test]
    fn test_consume_points_clamps_at_zero() {
        let mut rng = StdRng::seed_from_u64(1);
        let stats = PlayerStats { points: 10, ..PlayerStats::default() };
        let (next, applied) = apply_effect(&stats, ShopEffect::ConsumePoints { amount: 25 }, now(), &mut rng);
        assert_eq!(next.points, 0);
        assert_eq!(applied, ShopEffect::ConsumePoints { amount: 25 });
    }
}
