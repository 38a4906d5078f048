/// Levels used when a configuration supplies none.
pub const DEFAULT_LEVELS: [&str; 3] = ["info", "warn", "error"];

/// Ordered, non-empty sequence of severity names, least severe first.
///
/// The rank of a level is its position. Duplicates are tolerated; the first
/// occurrence decides the rank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelSet(Vec<String>);

impl LevelSet {
    /// Builds a level set, returning `None` when `names` is empty.
    pub fn new(names: Vec<String>) -> Option<Self> {
        if names.is_empty() {
            None
        } else {
            Some(Self(names))
        }
    }

    pub fn rank(&self, level: &str) -> Option<usize> {
        self.0.iter().position(|name| name == level)
    }

    pub fn contains(&self, level: &str) -> bool {
        self.rank(level).is_some()
    }

    /// Least severe level.
    pub fn first(&self) -> &str {
        &self.0[0]
    }

    /// Most severe level.
    pub fn last(&self) -> &str {
        &self.0[self.0.len() - 1]
    }

    /// `true` when `level` ranks at or above `threshold`.
    ///
    /// A level that is not part of the set never passes, and neither does
    /// anything measured against an unknown threshold.
    pub fn is_at_least(&self, level: &str, threshold: &str) -> bool {
        match (self.rank(level), self.rank(threshold)) {
            (Some(level), Some(threshold)) => level >= threshold,
            _ => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl Default for LevelSet {
    fn default() -> Self {
        Self(DEFAULT_LEVELS.iter().map(|level| (*level).to_string()).collect())
    }
}
