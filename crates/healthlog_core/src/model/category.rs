//! Log categories and their backing tables.

use serde::{Deserialize, Serialize};

/// One logical table/entity group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    FluidIntake,
    MoodEntry,
    Profile,
}

impl Category {
    pub const COUNT: usize = 3;
    pub const ALL: [Category; Self::COUNT] =
        [Category::FluidIntake, Category::MoodEntry, Category::Profile];

    /// SQLite table name; fixed for compatibility with existing data.
    pub fn table_name(self) -> &'static str {
        match self {
            Self::FluidIntake => "water_intake",
            Self::MoodEntry => "mood_log",
            Self::Profile => "user_profile",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::FluidIntake => "fluid_intake",
            Self::MoodEntry => "mood_entry",
            Self::Profile => "profile",
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Self::FluidIntake => 0,
            Self::MoodEntry => 1,
            Self::Profile => 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Category;
    use std::collections::HashSet;

    #[test]
    fn indexes_are_dense_and_unique() {
        let indexes: HashSet<usize> = Category::ALL.iter().map(|c| c.index()).collect();
        assert_eq!(indexes.len(), Category::COUNT);
        assert!(indexes.iter().all(|idx| *idx < Category::COUNT));
    }
}
