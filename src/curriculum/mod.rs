//! Curriculum
//!
//! Modules and topics come from the hosted store when it has them, and
//! from the bundled copy otherwise. Tier scoring lives in [`tiers`].

pub mod data;
pub mod tiers;

pub use data::bundled_modules;
pub use tiers::{Tier, TierInfo, calculate_score, tier_for_score, topics_to_next_tier};

use tracing::{info, warn};

use crate::storage::{ProgressTracker, RemoteStore, Sourced};
use crate::types::{Level, Module, ModuleSummary, Topic};

/// Load the curriculum, falling back to the bundled copy when the hosted
/// store is missing, unreachable, or empty.
pub async fn load_modules(remote: Option<&RemoteStore>) -> Sourced<Vec<Module>> {
    let Some(remote) = remote else {
        return Sourced::Fallback(bundled_modules());
    };

    match remote.fetch_modules().await {
        Ok(modules) if !modules.is_empty() => {
            info!("Loaded {} modules from data store", modules.len());
            Sourced::Remote(modules)
        }
        Ok(_) => {
            info!("Data store has no modules, using bundled curriculum");
            Sourced::Fallback(bundled_modules())
        }
        Err(e) => {
            warn!("Using bundled curriculum: {}", e);
            Sourced::Fallback(bundled_modules())
        }
    }
}

/// Find a topic by id together with its module
pub fn find_topic<'a>(modules: &'a [Module], topic_id: &str) -> Option<(&'a Module, &'a Topic)> {
    modules.iter().find_map(|module| {
        module
            .topics
            .iter()
            .find(|t| t.id == topic_id)
            .map(|topic| (module, topic))
    })
}

pub fn summarize(modules: &[Module], progress: &ProgressTracker) -> Vec<ModuleSummary> {
    modules
        .iter()
        .map(|module| {
            let done = |level: Level| {
                module
                    .topics
                    .iter()
                    .filter(|t| progress.is_complete(&t.id, level))
                    .count()
            };
            ModuleSummary {
                module_number: module.module_number,
                title: module.title.clone(),
                completed_basic: done(Level::Basic),
                completed_advanced: done(Level::Advanced),
                total_topics: module.topics.len(),
            }
        })
        .collect()
}
