//! Tier scoring
//!
//! Basic and advanced completions are worth one point each. The score
//! places the learner in one of four tiers.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::UserProgress;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Bronze,
    Silver,
    Gold,
    Diamond,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierInfo {
    pub tier: Tier,
    pub label: &'static str,
    pub emoji: &'static str,
    pub min_score: u32,
    pub max_score: u32,
}

pub static TIERS: [TierInfo; 4] = [
    TierInfo {
        tier: Tier::Bronze,
        label: "Bronze Marketer",
        emoji: "🥉",
        min_score: 0,
        max_score: 35,
    },
    TierInfo {
        tier: Tier::Silver,
        label: "Silver Marketer",
        emoji: "🥈",
        min_score: 36,
        max_score: 71,
    },
    TierInfo {
        tier: Tier::Gold,
        label: "Gold Marketer",
        emoji: "🥇",
        min_score: 72,
        max_score: 107,
    },
    TierInfo {
        tier: Tier::Diamond,
        label: "Diamond Marketer",
        emoji: "💎",
        min_score: 108,
        max_score: 144,
    },
];

impl Tier {
    pub fn info(&self) -> &'static TierInfo {
        &TIERS[*self as usize]
    }

    pub fn next(&self) -> Option<Tier> {
        TIERS.get(*self as usize + 1).map(|info| info.tier)
    }
}

impl fmt::Display for TierInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.emoji, self.label)
    }
}

/// Highest tier whose minimum the score reaches
pub fn tier_for_score(score: u32) -> &'static TierInfo {
    TIERS
        .iter()
        .rev()
        .find(|info| score >= info.min_score)
        .unwrap_or(&TIERS[0])
}

/// Points still needed for the next tier; 0 at the top
pub fn topics_to_next_tier(score: u32) -> u32 {
    tier_for_score(score)
        .tier
        .next()
        .map(|next| next.info().min_score.saturating_sub(score))
        .unwrap_or(0)
}

pub fn calculate_score<'a, I>(progress: I) -> u32
where
    I: IntoIterator<Item = &'a UserProgress>,
{
    progress.into_iter().map(UserProgress::points).sum()
}

const LOADING_MESSAGES: &[&str] = &[
    "Brewing knowledge for you...",
    "Unlocking marketing secrets...",
    "Preparing your next breakthrough...",
    "Loading your path to mastery...",
    "Gathering expert insights...",
    "Your marketing journey continues...",
    "Building your competitive edge...",
];

/// Motivational line shown while a lesson is generating
pub fn random_loading_message(username: &str) -> String {
    // Index past the fixed pool picks the personalised line
    let pick = rand::random_range(0..=LOADING_MESSAGES.len());
    match LOADING_MESSAGES.get(pick) {
        Some(message) => message.to_string(),
        None => format!("{}'s marketing skills leveling up...", username),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Level;
    use chrono::Utc;

    #[test]
    fn test_tier_thresholds() {
        assert_eq!(tier_for_score(0).tier, Tier::Bronze);
        assert_eq!(tier_for_score(35).tier, Tier::Bronze);
        assert_eq!(tier_for_score(36).tier, Tier::Silver);
        assert_eq!(tier_for_score(71).tier, Tier::Silver);
        assert_eq!(tier_for_score(72).tier, Tier::Gold);
        assert_eq!(tier_for_score(108).tier, Tier::Diamond);
        assert_eq!(tier_for_score(144).tier, Tier::Diamond);
    }

    #[test]
    fn test_topics_to_next_tier() {
        assert_eq!(topics_to_next_tier(0), 36);
        assert_eq!(topics_to_next_tier(40), 32);
        assert_eq!(topics_to_next_tier(107), 1);
        assert_eq!(topics_to_next_tier(120), 0);
    }

    #[test]
    fn test_calculate_score() {
        let now = Utc::now();
        let basic_only = UserProgress::first_completion("isha", "m0-t1", Level::Basic, now);
        let both = UserProgress::first_completion("isha", "m0-t2", Level::Advanced, now);
        assert_eq!(calculate_score([&basic_only, &both]), 3);
    }

    #[test]
    fn test_display() {
        assert_eq!(Tier::Gold.info().to_string(), "🥇 Gold Marketer");
        assert_eq!(Tier::Diamond.next(), None);
    }

    #[test]
    fn test_loading_message_non_empty() {
        for _ in 0..20 {
            assert!(random_loading_message("Isha").ends_with("..."));
        }
    }
}
