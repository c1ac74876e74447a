//! Rotation planner
//!
//! Pure policy function computing the ordered list of beneficiaries
//! for a group. The scheduler calls it exactly once, at tour-generation
//! time; the resulting order is pinned into the Tour records and never
//! recomputed, so a RANDOM draw stays fixed for the life of the group.
//!
//! # Policies
//!
//! - `Sequential`: membership join order, unchanged
//! - `Random`: uniformly-random permutation from the injected RNG
//! - `Shuffle`: sequential unless the caller opts in via `shuffle=true`
//! - `Custom`: caller-supplied order; unknown entries are rejected and
//!   omitted members are appended at the tail in join order, so every
//!   member keeps a place in the rotation

use std::collections::HashSet;

use crate::error::EngineError;
use crate::models::group::RotationMode;
use crate::rng::RngManager;

/// Caller-side rotation parameters for tour generation.
#[derive(Debug, Clone, Default)]
pub struct RotationParams {
    /// Explicit beneficiary order for `Custom` mode
    pub custom_order: Option<Vec<String>>,

    /// Opt-in random draw for `Shuffle` mode
    pub shuffle: bool,
}

/// Compute the beneficiary order for a group.
///
/// `members` must be the current person IDs in join order. The output
/// always has length equal to `members.len()`.
///
/// # Errors
/// - `InvalidState` if `members` is empty
/// - `BadRequest` for `Custom` mode without an order, with duplicate
///   entries, or with entries naming non-members
///
/// # Example
/// ```
/// use tontine_ledger_core_rs::models::group::RotationMode;
/// use tontine_ledger_core_rs::rng::RngManager;
/// use tontine_ledger_core_rs::rotation::{plan_rotation, RotationParams};
///
/// let members = vec!["a".to_string(), "b".to_string(), "c".to_string()];
/// let order = plan_rotation(
///     &members,
///     RotationMode::Sequential,
///     &RotationParams::default(),
///     &mut RngManager::new(1),
/// )
/// .unwrap();
/// assert_eq!(order, members);
/// ```
pub fn plan_rotation(
    members: &[String],
    mode: RotationMode,
    params: &RotationParams,
    rng: &mut RngManager,
) -> Result<Vec<String>, EngineError> {
    if members.is_empty() {
        return Err(EngineError::invalid_state(
            "cannot plan a rotation for a group with no members",
        ));
    }

    match mode {
        RotationMode::Sequential => Ok(members.to_vec()),
        RotationMode::Random => Ok(random_order(members, rng)),
        RotationMode::Shuffle => {
            if params.shuffle {
                Ok(random_order(members, rng))
            } else {
                Ok(members.to_vec())
            }
        }
        RotationMode::Custom => {
            let custom = params.custom_order.as_deref().ok_or_else(|| {
                EngineError::bad_request("custom rotation mode requires a custom order")
            })?;
            custom_order(members, custom)
        }
    }
}

fn random_order(members: &[String], rng: &mut RngManager) -> Vec<String> {
    let mut order = members.to_vec();
    rng.shuffle(&mut order);
    order
}

/// Validate a caller-supplied order and append omitted members.
fn custom_order(members: &[String], custom: &[String]) -> Result<Vec<String>, EngineError> {
    let roster: HashSet<&str> = members.iter().map(String::as_str).collect();

    let mut seen: HashSet<&str> = HashSet::new();
    for entry in custom {
        if !roster.contains(entry.as_str()) {
            return Err(EngineError::bad_request(format!(
                "unknown rotation-order entry: {}",
                entry
            )));
        }
        if !seen.insert(entry.as_str()) {
            return Err(EngineError::bad_request(format!(
                "duplicate rotation-order entry: {}",
                entry
            )));
        }
    }

    let mut order = custom.to_vec();
    // Omitted members keep their place at the tail, in join order
    order.extend(
        members
            .iter()
            .filter(|m| !seen.contains(m.as_str()))
            .cloned(),
    );
    Ok(order)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn members(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_sequential_preserves_join_order() {
        let roster = members(&["a", "b", "c", "d"]);
        let order = plan_rotation(
            &roster,
            RotationMode::Sequential,
            &RotationParams::default(),
            &mut RngManager::new(1),
        )
        .unwrap();
        assert_eq!(order, roster);
    }

    #[test]
    fn test_random_is_a_permutation() {
        let roster = members(&["a", "b", "c", "d", "e"]);
        let order = plan_rotation(
            &roster,
            RotationMode::Random,
            &RotationParams::default(),
            &mut RngManager::new(42),
        )
        .unwrap();

        let mut sorted = order.clone();
        sorted.sort();
        let mut expected = roster.clone();
        expected.sort();
        assert_eq!(sorted, expected);
    }

    #[test]
    fn test_random_is_deterministic_per_seed() {
        let roster = members(&["a", "b", "c", "d", "e", "f"]);
        let first = plan_rotation(
            &roster,
            RotationMode::Random,
            &RotationParams::default(),
            &mut RngManager::new(7),
        )
        .unwrap();
        let second = plan_rotation(
            &roster,
            RotationMode::Random,
            &RotationParams::default(),
            &mut RngManager::new(7),
        )
        .unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_shuffle_without_opt_in_is_sequential() {
        let roster = members(&["a", "b", "c"]);
        let order = plan_rotation(
            &roster,
            RotationMode::Shuffle,
            &RotationParams::default(),
            &mut RngManager::new(9),
        )
        .unwrap();
        assert_eq!(order, roster);
    }

    #[test]
    fn test_shuffle_with_opt_in_matches_random() {
        let roster = members(&["a", "b", "c", "d", "e"]);
        let shuffled = plan_rotation(
            &roster,
            RotationMode::Shuffle,
            &RotationParams {
                custom_order: None,
                shuffle: true,
            },
            &mut RngManager::new(11),
        )
        .unwrap();
        let random = plan_rotation(
            &roster,
            RotationMode::Random,
            &RotationParams::default(),
            &mut RngManager::new(11),
        )
        .unwrap();
        assert_eq!(shuffled, random);
    }

    #[test]
    fn test_custom_appends_omitted_members() {
        let roster = members(&["a", "b", "c", "d"]);
        let order = plan_rotation(
            &roster,
            RotationMode::Custom,
            &RotationParams {
                custom_order: Some(members(&["c", "a"])),
                shuffle: false,
            },
            &mut RngManager::new(1),
        )
        .unwrap();
        assert_eq!(order, members(&["c", "a", "b", "d"]));
    }

    #[test]
    fn test_custom_rejects_unknown_entry() {
        let roster = members(&["a", "b"]);
        let err = plan_rotation(
            &roster,
            RotationMode::Custom,
            &RotationParams {
                custom_order: Some(members(&["a", "zed"])),
                shuffle: false,
            },
            &mut RngManager::new(1),
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::BadRequest { .. }));
    }

    #[test]
    fn test_custom_rejects_duplicate_entry() {
        let roster = members(&["a", "b"]);
        let err = plan_rotation(
            &roster,
            RotationMode::Custom,
            &RotationParams {
                custom_order: Some(members(&["a", "a"])),
                shuffle: false,
            },
            &mut RngManager::new(1),
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::BadRequest { .. }));
    }

    #[test]
    fn test_custom_without_order_is_bad_request() {
        let roster = members(&["a", "b"]);
        let err = plan_rotation(
            &roster,
            RotationMode::Custom,
            &RotationParams::default(),
            &mut RngManager::new(1),
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::BadRequest { .. }));
    }

    #[test]
    fn test_empty_roster_is_invalid_state() {
        let err = plan_rotation(
            &[],
            RotationMode::Sequential,
            &RotationParams::default(),
            &mut RngManager::new(1),
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::InvalidState { .. }));
    }
}
