//! Link types for the graph store.

use serde::{Deserialize, Serialize};

/// Index of a node inside a graph.
///
/// Nodes carry no payload the core depends on; labels live in the store.
pub type NodeIndex = usize;

/// Optional tag attached to a link (edge weight class, relation id, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LinkTag(pub u32);

impl std::fmt::Display for LinkTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A link between two nodes.
///
/// For directed graphs `first` is the source and `second` the target. For
/// undirected graphs the store reports links with `first <= second`.
/// Implements `Ord` for deterministic ordering: (first, second, tag).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Link {
    /// First endpoint (source for directed links).
    pub first: NodeIndex,
    /// Second endpoint (target for directed links).
    pub second: NodeIndex,
    /// Optional tag.
    pub tag: Option<LinkTag>,
}

impl Link {
    /// Create a new untagged link.
    pub fn new(first: NodeIndex, second: NodeIndex) -> Self {
        Self {
            first,
            second,
            tag: None,
        }
    }

    /// Create a tagged link.
    pub fn tagged(first: NodeIndex, second: NodeIndex, tag: LinkTag) -> Self {
        Self {
            first,
            second,
            tag: Some(tag),
        }
    }

    /// Whether both endpoints are the same node.
    pub fn is_self_loop(&self) -> bool {
        self.first == self.second
    }

    /// The endpoint opposite to `node`, if `node` is an endpoint.
    pub fn other(&self, node: NodeIndex) -> Option<NodeIndex> {
        if self.first == node {
            Some(self.second)
        } else if self.second == node {
            Some(self.first)
        } else {
            None
        }
    }
}

// Canonical ordering: first, then second, then tag
impl PartialOrd for Link {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Link {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.first
            .cmp(&other.first)
            .then_with(|| self.second.cmp(&other.second))
            .then_with(|| self.tag.cmp(&other.tag))
    }
}

impl std::fmt::Display for Link {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.tag {
            Some(tag) => write!(f, "{}->{} {}", self.first, self.second, tag),
            None => write!(f, "{}->{}", self.first, self.second),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_ordering() {
        let l1 = Link::new(1, 2);
        let l2 = Link::new(1, 3);
        let l3 = Link::new(2, 3);

        // Same first, different second
        assert!(l1 < l2);
        // Different first
        assert!(l1 < l3);
        assert!(l2 < l3);
    }

    #[test]
    fn test_tag_ordering() {
        let plain = Link::new(1, 2);
        let tagged = Link::tagged(1, 2, LinkTag(7));

        // Untagged sorts before tagged when endpoints match
        assert!(plain < tagged);
        assert_ne!(plain, tagged);
    }

    #[test]
    fn test_other_endpoint() {
        let link = Link::new(4, 9);
        assert_eq!(link.other(4), Some(9));
        assert_eq!(link.other(9), Some(4));
        assert_eq!(link.other(5), None);
        assert!(Link::new(3, 3).is_self_loop());
    }
}
