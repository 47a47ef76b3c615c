//! Ordered registry of the guilds that host the letter emojis

use serde::{Deserialize, Serialize};

use crate::types::SpaceMembership;

/// Number of guilds a full emoji set is spread over
pub const REGISTRY_SIZE: usize = 6;

/// Placeholder guild ids, highest priority first. Deployments replace them
/// with their own emoji guilds through `[reactions] guilds` or
/// `REACTEXT_GUILDS`.
pub const DEFAULT_SPACES: [u64; REGISTRY_SIZE] = [
    1_187_435_512_946_688_050,
    1_187_436_218_327_748_658,
    1_187_436_894_411_395_162,
    1_187_437_451_964_657_754,
    1_187_438_035_287_494_696,
    1_187_438_601_661_259_796,
];

/// Guild registry in priority order (index 0 is tried first)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct SpaceRegistry {
    spaces: Vec<u64>,
}

impl Default for SpaceRegistry {
    fn default() -> Self {
        Self {
            spaces: DEFAULT_SPACES.to_vec(),
        }
    }
}

impl SpaceRegistry {
    /// Build a registry from ids in priority order. Duplicates keep their
    /// first position.
    pub fn new(spaces: impl IntoIterator<Item = u64>) -> Self {
        let mut ordered: Vec<u64> = Vec::new();
        for id in spaces {
            if !ordered.contains(&id) {
                ordered.push(id);
            }
        }
        Self { spaces: ordered }
    }

    pub fn spaces(&self) -> &[u64] {
        &self.spaces
    }

    pub fn len(&self) -> usize {
        self.spaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spaces.is_empty()
    }

    pub fn contains(&self, space_id: u64) -> bool {
        self.spaces.contains(&space_id)
    }

    /// 0-based priority, `None` for guilds outside the registry
    pub fn priority(&self, space_id: u64) -> Option<usize> {
        self.spaces.iter().position(|id| *id == space_id)
    }

    /// Reorder memberships by registry priority; unknown guilds go last.
    pub fn sort_by_priority(&self, memberships: &mut [SpaceMembership]) {
        memberships.sort_by_key(|m| self.priority(m.space_id).unwrap_or(usize::MAX));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry_has_six_distinct_spaces() {
        let registry = SpaceRegistry::default();
        assert_eq!(registry.len(), REGISTRY_SIZE);
        assert_eq!(SpaceRegistry::new(DEFAULT_SPACES).len(), REGISTRY_SIZE);
    }

    #[test]
    fn test_priority_follows_insertion_order() {
        let registry = SpaceRegistry::new([30, 10, 20]);
        assert_eq!(registry.priority(30), Some(0));
        assert_eq!(registry.priority(10), Some(1));
        assert_eq!(registry.priority(20), Some(2));
        assert_eq!(registry.priority(99), None);
    }

    #[test]
    fn test_new_drops_duplicates() {
        let registry = SpaceRegistry::new([1, 2, 1, 3]);
        assert_eq!(registry.spaces(), &[1, 2, 3]);
    }

    #[test]
    fn test_sort_by_priority() {
        let registry = SpaceRegistry::new([1, 2, 3]);
        let mut memberships = vec![
            SpaceMembership::new(3, vec![]),
            SpaceMembership::new(99, vec![]),
            SpaceMembership::new(1, vec![]),
            SpaceMembership::new(2, vec![]),
        ];
        registry.sort_by_priority(&mut memberships);
        let order: Vec<u64> = memberships.iter().map(|m| m.space_id).collect();
        assert_eq!(order, vec![1, 2, 3, 99]);
    }

    #[test]
    fn test_serde_is_a_plain_list() {
        let registry: SpaceRegistry = serde_json::from_str("[5, 6]").unwrap();
        assert_eq!(registry.spaces(), &[5, 6]);
        assert_eq!(serde_json::to_string(&registry).unwrap(), "[5,6]");
    }
}
