//! Functional category super-groups.
//!
//! COG functional categories are single letters; NCBI arranges them under
//! four broad groups. Letters outside these groups (new or retired codes)
//! have no group.

/// The four COG functional super-groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CategoryGroup {
    InformationStorage,
    CellularProcesses,
    Metabolism,
    PoorlyCharacterized,
}

impl CategoryGroup {
    /// Returns the display label of the group.
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryGroup::InformationStorage => "INFORMATION STORAGE AND PROCESSING",
            CategoryGroup::CellularProcesses => "CELLULAR PROCESSES AND SIGNALING",
            CategoryGroup::Metabolism => "METABOLISM",
            CategoryGroup::PoorlyCharacterized => "POORLY CHARACTERIZED",
        }
    }

    /// Category letters belonging to the group, in NCBI display order.
    pub fn letters(&self) -> &'static [char] {
        match self {
            CategoryGroup::InformationStorage => &['J', 'A', 'K', 'L', 'B'],
            CategoryGroup::CellularProcesses => &['D', 'Y', 'V', 'T', 'M', 'N', 'Z', 'W', 'U', 'O'],
            CategoryGroup::Metabolism => &['C', 'G', 'E', 'F', 'H', 'I', 'P', 'Q'],
            CategoryGroup::PoorlyCharacterized => &['R', 'S', 'X'],
        }
    }

    /// Returns all groups in display order.
    pub fn all_groups() -> Vec<CategoryGroup> {
        vec![
            CategoryGroup::InformationStorage,
            CategoryGroup::CellularProcesses,
            CategoryGroup::Metabolism,
            CategoryGroup::PoorlyCharacterized,
        ]
    }

    /// Finds the group a category letter belongs to.
    pub fn of(letter: char) -> Option<CategoryGroup> {
        Self::all_groups()
            .into_iter()
            .find(|group| group.letters().contains(&letter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_lookup() {
        assert_eq!(CategoryGroup::of('K'), Some(CategoryGroup::InformationStorage));
        assert_eq!(CategoryGroup::of('M'), Some(CategoryGroup::CellularProcesses));
        assert_eq!(CategoryGroup::of('E'), Some(CategoryGroup::Metabolism));
        assert_eq!(CategoryGroup::of('S'), Some(CategoryGroup::PoorlyCharacterized));
        assert_eq!(CategoryGroup::of('?'), None);
    }

    #[test]
    fn test_groups_are_disjoint() {
        let mut letters: Vec<char> = CategoryGroup::all_groups()
            .iter()
            .flat_map(|g| g.letters().iter().copied())
            .collect();
        let total = letters.len();
        letters.sort();
        letters.dedup();
        assert_eq!(letters.len(), total);
        assert_eq!(total, 26);
    }
}
