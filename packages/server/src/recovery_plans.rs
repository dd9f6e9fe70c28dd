//! Recovery plans embedded at compile time.

use aves_mallorca_server_models::RecoveryPlan;
use serde::Deserialize;

const RECOVERY_PLANS_TOML: &str = include_str!("../resources/recovery_plans.toml");

#[derive(Deserialize)]
struct RecoveryPlanFile {
    plans: Vec<RecoveryPlan>,
}

/// Returns the published recovery and management plans, in display order.
///
/// # Panics
///
/// Panics if the embedded TOML fails to parse. It is a compile-time
/// constant, so a failure is a development error caught by the tests.
#[must_use]
pub fn recovery_plans() -> Vec<RecoveryPlan> {
    toml::de::from_str::<RecoveryPlanFile>(RECOVERY_PLANS_TOML)
        .unwrap_or_else(|e| panic!("Failed to parse recovery plans: {e}"))
        .plans
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    #[test]
    fn loads_all_plans_with_unique_ids() {
        let plans = recovery_plans();
        assert_eq!(plans.len(), 5);

        let ids: BTreeSet<&str> = plans.iter().map(|plan| plan.id.as_str()).collect();
        assert_eq!(ids.len(), plans.len());
    }

    #[test]
    fn plans_link_to_official_documents() {
        for plan in recovery_plans() {
            assert!(plan.url.starts_with("https://"), "{}", plan.id);
            assert!(plan.image.starts_with("/img/Planes/"), "{}", plan.id);
            assert!(!plan.title.is_empty());
        }
    }
}
