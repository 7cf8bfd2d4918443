/// An ordered set of ranks taking part in a collective operation.
///
/// Chunk `i` of a scatter goes to `members[i]`; gather collects in the
/// same order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RankGroup {
    members: Vec<usize>,
}

impl RankGroup {
    pub fn new(members: Vec<usize>) -> Self {
        debug_assert!(
            members.windows(2).all(|w| w[0] < w[1]),
            "group members must be strictly ascending"
        );
        Self { members }
    }

    pub fn members(&self) -> &[usize] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, rank: usize) -> bool {
        self.index_of(rank).is_some()
    }

    /// Position of `rank` within the group, which is also its chunk index.
    pub fn index_of(&self, rank: usize) -> Option<usize> {
        self.members.binary_search(&rank).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_of_follows_member_order() {
        let group = RankGroup::new(vec![0, 1, 3]);
        assert_eq!(group.index_of(0), Some(0));
        assert_eq!(group.index_of(3), Some(2));
        assert_eq!(group.index_of(2), None);
        assert!(group.contains(1));
        assert!(!group.contains(4));
        assert_eq!(group.len(), 3);
    }

    #[test]
    fn test_empty_group() {
        let group = RankGroup::new(Vec::new());
        assert!(group.is_empty());
        assert!(!group.contains(0));
    }
}
