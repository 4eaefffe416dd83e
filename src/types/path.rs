use std::fmt;
use std::ops::Deref;

use serde::Serialize;

/// Ordered slot names leading from a traversal origin to a discovered node.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct SlotPath(Vec<String>);

impl SlotPath {
    /// Empty path (the origin itself).
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Returns a copy of this path extended by `name` at the end.
    pub fn child(&self, name: &str) -> Self {
        let mut segments = Vec::with_capacity(self.0.len() + 1);
        segments.extend(self.0.iter().cloned());
        segments.push(name.to_owned());
        Self(segments)
    }

    /// Returns a copy of this path with `name` inserted at the front.
    pub fn parent(&self, name: &str) -> Self {
        let mut segments = Vec::with_capacity(self.0.len() + 1);
        segments.push(name.to_owned());
        segments.extend(self.0.iter().cloned());
        Self(segments)
    }

    /// Appends a segment in place.
    pub fn push(&mut self, name: impl Into<String>) {
        self.0.push(name.into());
    }
}

impl Deref for SlotPath {
    type Target = [String];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S: Into<String>> FromIterator<S> for SlotPath {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl PartialEq<[&str]> for SlotPath {
    fn eq(&self, other: &[&str]) -> bool {
        self.0.len() == other.len() && self.0.iter().zip(other).all(|(a, b)| a == b)
    }
}

impl<const N: usize> PartialEq<[&str; N]> for SlotPath {
    fn eq(&self, other: &[&str; N]) -> bool {
        self == &other[..]
    }
}

impl fmt::Display for SlotPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, segment) in self.0.iter().enumerate() {
            if idx > 0 {
                f.write_str(" > ")?;
            }
            f.write_str(segment)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn child_and_parent_do_not_mutate_original() {
        let base: SlotPath = ["a", "b"].into_iter().collect();
        assert_eq!(base.child("c"), ["a", "b", "c"]);
        assert_eq!(base.parent("z"), ["z", "a", "b"]);
        assert_eq!(base, ["a", "b"]);
    }

    #[test]
    fn displays_segments() {
        let path: SlotPath = ["furnace", "tube"].into_iter().collect();
        assert_eq!(path.to_string(), "furnace > tube");
        assert_eq!(SlotPath::new().to_string(), "");
    }
}
