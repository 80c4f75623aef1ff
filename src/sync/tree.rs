//! Bookmark tree data model.
//!
//! This module provides `BookmarkNode`, the tagged union over the external
//! store's node shape, and `TreeSnapshot`, the immutable point-in-time copy
//! of the full tree that the cache hands out to consumers.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reserved id of the root container node.
///
/// The root is never displayed; only its children are rendered as
/// top-level entries.
pub const ROOT_ID: &str = "0";

/// Errors produced while validating the external store's node shape.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// A node carried both a URL and a children list.
    #[error("node {id} has both a url and children")]
    AmbiguousShape {
        /// Id of the offending node.
        id: String,
    },
}

/// Raw node shape as the external bookmark store serializes it.
///
/// `url` is present iff the node is a leaf bookmark; `children` is present
/// iff the node is a folder. The shape is validated exactly once, at
/// construction of a [`BookmarkNode`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawNode {
    /// Unique id within the external store.
    pub id: String,
    /// Display title (may be empty, e.g. for the root container).
    #[serde(default)]
    pub title: String,
    /// Target URL, present only on leaf bookmarks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Ordered children, present only on folders.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<RawNode>>,
}

/// One entry in the bookmark hierarchy: exactly a folder or a leaf bookmark.
///
/// The variant is chosen once from the external API's shape; downstream code
/// never re-checks field presence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawNode", into = "RawNode")]
pub enum BookmarkNode {
    /// A folder with an ordered list of children.
    Folder {
        /// Unique id within the external store.
        id: String,
        /// Display title.
        title: String,
        /// Ordered children.
        children: Vec<BookmarkNode>,
    },
    /// A leaf bookmark pointing at a URL.
    Bookmark {
        /// Unique id within the external store.
        id: String,
        /// Display title.
        title: String,
        /// Target URL.
        url: String,
    },
}

impl BookmarkNode {
    /// Get the node's id.
    pub fn id(&self) -> &str {
        match self {
            BookmarkNode::Folder { id, .. } | BookmarkNode::Bookmark { id, .. } => id,
        }
    }

    /// Get the node's title.
    pub fn title(&self) -> &str {
        match self {
            BookmarkNode::Folder { title, .. } | BookmarkNode::Bookmark { title, .. } => title,
        }
    }

    /// Whether this node is a folder.
    pub fn is_folder(&self) -> bool {
        matches!(self, BookmarkNode::Folder { .. })
    }

    /// Recursive count of leaf bookmark descendants.
    ///
    /// A bookmark counts as 1; a folder's count is the sum over its
    /// subtree, not the number of direct children.
    pub fn bookmark_count(&self) -> usize {
        match self {
            BookmarkNode::Bookmark { .. } => 1,
            BookmarkNode::Folder { children, .. } => {
                children.iter().map(BookmarkNode::bookmark_count).sum()
            }
        }
    }
}

impl TryFrom<RawNode> for BookmarkNode {
    type Error = TreeError;

    fn try_from(raw: RawNode) -> Result<Self, Self::Error> {
        match (raw.url, raw.children) {
            (Some(_), Some(_)) => Err(TreeError::AmbiguousShape { id: raw.id }),
            (Some(url), None) => Ok(BookmarkNode::Bookmark {
                id: raw.id,
                title: raw.title,
                url,
            }),
            // A folder with no children list is an empty folder.
            (None, children) => Ok(BookmarkNode::Folder {
                id: raw.id,
                title: raw.title,
                children: children
                    .unwrap_or_default()
                    .into_iter()
                    .map(BookmarkNode::try_from)
                    .collect::<Result<_, _>>()?,
            }),
        }
    }
}

impl From<BookmarkNode> for RawNode {
    fn from(node: BookmarkNode) -> Self {
        match node {
            BookmarkNode::Folder {
                id,
                title,
                children,
            } => RawNode {
                id,
                title,
                url: None,
                children: Some(children.into_iter().map(RawNode::from).collect()),
            },
            BookmarkNode::Bookmark { id, title, url } => RawNode {
                id,
                title,
                url: Some(url),
                children: None,
            },
        }
    }
}

/// Immutable point-in-time copy of the full bookmark tree.
///
/// An ordered sequence of root-level trees, replaced atomically by the
/// cache on each successful refresh and read-only to all consumers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TreeSnapshot(pub Vec<BookmarkNode>);

impl TreeSnapshot {
    /// Whether the snapshot holds no trees at all.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Depth-first collection of all leaf bookmarks, in traversal order.
    pub fn flatten_bookmarks(&self) -> Vec<&BookmarkNode> {
        fn walk<'a>(nodes: &'a [BookmarkNode], out: &mut Vec<&'a BookmarkNode>) {
            for node in nodes {
                match node {
                    BookmarkNode::Bookmark { .. } => out.push(node),
                    BookmarkNode::Folder { children, .. } => walk(children, out),
                }
            }
        }

        let mut out = Vec::new();
        walk(&self.0, &mut out);
        out
    }

    /// Total number of leaf bookmarks in the snapshot.
    pub fn bookmark_count(&self) -> usize {
        self.0.iter().map(BookmarkNode::bookmark_count).sum()
    }

    /// Recursive count of folders, excluding the reserved root container.
    pub fn folder_count(&self) -> usize {
        fn walk(nodes: &[BookmarkNode]) -> usize {
            nodes
                .iter()
                .map(|node| match node {
                    BookmarkNode::Folder { id, children, .. } => {
                        let own = usize::from(id != ROOT_ID);
                        own + walk(children)
                    }
                    BookmarkNode::Bookmark { .. } => 0,
                })
                .sum()
        }

        walk(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn folder(id: &str, title: &str, children: Vec<BookmarkNode>) -> BookmarkNode {
        BookmarkNode::Folder {
            id: id.to_string(),
            title: title.to_string(),
            children,
        }
    }

    fn bookmark(id: &str, title: &str, url: &str) -> BookmarkNode {
        BookmarkNode::Bookmark {
            id: id.to_string(),
            title: title.to_string(),
            url: url.to_string(),
        }
    }

    #[test]
    fn test_bookmark_count_recurses_into_subfolders() {
        let node = folder(
            "1",
            "Top",
            vec![
                bookmark("2", "A", "http://a.example"),
                bookmark("3", "B", "http://b.example"),
                folder(
                    "4",
                    "Sub",
                    vec![
                        bookmark("5", "C", "http://c.example"),
                        bookmark("6", "D", "http://d.example"),
                        bookmark("7", "E", "http://e.example"),
                    ],
                ),
            ],
        );

        assert_eq!(node.bookmark_count(), 5);
    }

    #[test]
    fn test_raw_node_with_url_becomes_bookmark() {
        let raw = RawNode {
            id: "9".to_string(),
            title: "Cats".to_string(),
            url: Some("http://cats.com".to_string()),
            children: None,
        };

        let node = BookmarkNode::try_from(raw).unwrap();
        assert!(!node.is_folder());
        assert_eq!(node.title(), "Cats");
    }

    #[test]
    fn test_raw_node_without_children_is_empty_folder() {
        let raw = RawNode {
            id: "9".to_string(),
            title: "Empty".to_string(),
            url: None,
            children: None,
        };

        let node = BookmarkNode::try_from(raw).unwrap();
        assert_eq!(node, folder("9", "Empty", vec![]));
    }

    #[test]
    fn test_ambiguous_raw_node_is_rejected() {
        let raw = RawNode {
            id: "9".to_string(),
            title: "Bad".to_string(),
            url: Some("http://x.example".to_string()),
            children: Some(vec![]),
        };

        assert_eq!(
            BookmarkNode::try_from(raw),
            Err(TreeError::AmbiguousShape {
                id: "9".to_string()
            })
        );
    }

    #[test]
    fn test_snapshot_serde_round_trip_uses_raw_shape() {
        let snapshot = TreeSnapshot(vec![folder(
            "0",
            "",
            vec![bookmark("1", "A", "http://a.example")],
        )]);

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json[0]["children"][0]["url"], "http://a.example");
        assert!(json[0]["url"].is_null());

        let back: TreeSnapshot = serde_json::from_value(json).unwrap();
        assert_eq!(back, snapshot);
    }

    #[test]
    fn test_folder_count_excludes_root() {
        let snapshot = TreeSnapshot(vec![folder(
            "0",
            "",
            vec![
                folder("1", "Bar", vec![folder("2", "Nested", vec![])]),
                bookmark("3", "A", "http://a.example"),
            ],
        )]);

        assert_eq!(snapshot.folder_count(), 2);
    }

    #[test]
    fn test_flatten_bookmarks_traversal_order() {
        let snapshot = TreeSnapshot(vec![folder(
            "0",
            "",
            vec![
                folder("1", "F", vec![bookmark("2", "Inner", "http://i.example")]),
                bookmark("3", "Outer", "http://o.example"),
            ],
        )]);

        let flat: Vec<&str> = snapshot
            .flatten_bookmarks()
            .iter()
            .map(|n| n.title())
            .collect();
        assert_eq!(flat, vec!["Inner", "Outer"]);
    }
}
