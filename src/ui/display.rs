//! Display-list derivation shared by both view surfaces.
//!
//! Turns a tree snapshot plus per-view state (expansion set, search query)
//! into a flat list of display items. Rendering itself is delegated to the
//! surface; this module only decides what appears and in what order.

use crate::sync::tree::{BookmarkNode, TreeSnapshot, ROOT_ID};
use std::collections::HashSet;
use url::Url;

/// One row in a rendered view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayItem {
    /// A folder row.
    Folder {
        /// Folder id, used for expansion toggling.
        id: String,
        /// Folder title.
        title: String,
        /// Indentation depth (0 = top level).
        depth: usize,
        /// Whether the folder is currently expanded.
        expanded: bool,
        /// Recursive count of leaf bookmark descendants.
        bookmark_count: usize,
    },
    /// A bookmark row.
    Bookmark {
        /// Bookmark id.
        id: String,
        /// Bookmark title.
        title: String,
        /// Full target URL.
        url: String,
        /// Hostname of the URL, or the raw URL when it does not parse.
        hostname: String,
        /// Indentation depth (0 = top level).
        depth: usize,
    },
}

impl DisplayItem {
    /// Title of the underlying node.
    pub fn title(&self) -> &str {
        match self {
            DisplayItem::Folder { title, .. } | DisplayItem::Bookmark { title, .. } => title,
        }
    }

    fn folder(node: &BookmarkNode, depth: usize, expanded: bool) -> Self {
        DisplayItem::Folder {
            id: node.id().to_string(),
            title: node.title().to_string(),
            depth,
            expanded,
            bookmark_count: node.bookmark_count(),
        }
    }

    fn bookmark(id: &str, title: &str, url: &str, depth: usize) -> Self {
        DisplayItem::Bookmark {
            id: id.to_string(),
            title: title.to_string(),
            url: url.to_string(),
            hostname: hostname(url),
            depth,
        }
    }
}

/// Extract the hostname of a URL, falling back to the raw string for
/// anything the parser rejects.
pub fn hostname(raw: &str) -> String {
    Url::parse(raw)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_else(|| raw.to_string())
}

/// Derive the collapsed/expanded tree view.
///
/// The reserved root is never rendered; its children appear as top-level
/// entries. Children of collapsed folders are omitted entirely.
pub fn tree_items(snapshot: &TreeSnapshot, expanded: &HashSet<String>) -> Vec<DisplayItem> {
    fn walk(
        nodes: &[BookmarkNode],
        depth: usize,
        expanded: &HashSet<String>,
        out: &mut Vec<DisplayItem>,
    ) {
        for node in nodes {
            match node {
                BookmarkNode::Folder { id, children, .. } => {
                    if depth == 0 && id == ROOT_ID {
                        walk(children, depth, expanded, out);
                        continue;
                    }

                    let is_expanded = expanded.contains(id);
                    out.push(DisplayItem::folder(node, depth, is_expanded));
                    if is_expanded {
                        walk(children, depth + 1, expanded, out);
                    }
                }
                BookmarkNode::Bookmark { id, title, url } => {
                    out.push(DisplayItem::bookmark(id, title, url, depth));
                }
            }
        }
    }

    let mut out = Vec::new();
    walk(&snapshot.0, 0, expanded, &mut out);
    out
}

/// Derive the flat "saved" list: every leaf bookmark in traversal order,
/// truncated to `cap`.
pub fn saved_items(snapshot: &TreeSnapshot, cap: usize) -> Vec<DisplayItem> {
    snapshot
        .flatten_bookmarks()
        .into_iter()
        .take(cap)
        .filter_map(|node| match node {
            BookmarkNode::Bookmark { id, title, url } => {
                Some(DisplayItem::bookmark(id, title, url, 0))
            }
            BookmarkNode::Folder { .. } => None,
        })
        .collect()
}

/// Derive case-folded search results, truncated to `cap`.
///
/// A folder matches if its title contains the query or any descendant
/// matches; descendants are recursed into regardless of the folder's own
/// match, so every matching descendant surfaces. A bookmark matches on
/// title, full URL, or hostname. Traversal order is the only ordering;
/// the cap is a hard slice, not a top-K by relevance.
pub fn search_items(snapshot: &TreeSnapshot, query: &str, cap: usize) -> Vec<DisplayItem> {
    fn walk(nodes: &[BookmarkNode], query: &str, out: &mut Vec<DisplayItem>) -> bool {
        let mut any = false;
        for node in nodes {
            match node {
                BookmarkNode::Folder {
                    id,
                    title,
                    children,
                } => {
                    let title_match = title.to_lowercase().contains(query);
                    let mut sub = Vec::new();
                    let descendant_match = walk(children, query, &mut sub);

                    // The reserved root itself never appears in results.
                    if (title_match || descendant_match) && id != ROOT_ID {
                        out.push(DisplayItem::folder(node, 0, false));
                    }
                    out.append(&mut sub);
                    any |= title_match || descendant_match;
                }
                BookmarkNode::Bookmark { id, title, url } => {
                    let host = hostname(url);
                    if title.to_lowercase().contains(query)
                        || url.to_lowercase().contains(query)
                        || host.to_lowercase().contains(query)
                    {
                        out.push(DisplayItem::bookmark(id, title, url, 0));
                        any = true;
                    }
                }
            }
        }
        any
    }

    let query = query.to_lowercase();
    let mut out = Vec::new();
    walk(&snapshot.0, &query, &mut out);
    out.truncate(cap);
    out
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

    fn sample() -> TreeSnapshot {
        TreeSnapshot(vec![folder(
            "0",
            "",
            vec![
                folder(
                    "1",
                    "FolderA",
                    vec![bookmark("2", "Cat", "http://cats.com")],
                ),
                bookmark("3", "Dog", "http://dogs.com"),
            ],
        )])
    }

    #[test]
    fn test_hostname_fallback_on_unparsable_url() {
        assert_eq!(hostname("http://cats.com/page"), "cats.com");
        assert_eq!(hostname("not a url"), "not a url");
    }

    #[test]
    fn test_tree_skips_root_and_collapsed_children() {
        let items = tree_items(&sample(), &HashSet::new());

        assert_eq!(items.len(), 2);
        assert!(matches!(
            &items[0],
            DisplayItem::Folder { title, depth: 0, expanded: false, bookmark_count: 1, .. }
                if title == "FolderA"
        ));
        assert!(matches!(
            &items[1],
            DisplayItem::Bookmark { title, depth: 0, .. } if title == "Dog"
        ));
    }

    #[test]
    fn test_tree_expansion_reveals_children_indented() {
        let expanded: HashSet<String> = ["1".to_string()].into();
        let items = tree_items(&sample(), &expanded);

        assert_eq!(items.len(), 3);
        assert!(matches!(
            &items[1],
            DisplayItem::Bookmark { title, depth: 1, .. } if title == "Cat"
        ));
    }

    #[test]
    fn test_tree_derivation_is_idempotent() {
        let first = tree_items(&sample(), &HashSet::new());
        let second = tree_items(&sample(), &HashSet::new());
        assert_eq!(first, second);
    }

    #[test]
    fn test_search_includes_folder_when_only_descendant_matches() {
        let items = search_items(&sample(), "cat", 200);

        let titles: Vec<&str> = items.iter().map(DisplayItem::title).collect();
        assert_eq!(titles, vec!["FolderA", "Cat"]);
    }

    #[test]
    fn test_search_matches_bookmark_by_hostname() {
        let items = search_items(&sample(), "dogs.com", 200);

        let titles: Vec<&str> = items.iter().map(DisplayItem::title).collect();
        assert_eq!(titles, vec!["Dog"]);
    }

    #[test]
    fn test_search_is_case_folded() {
        let items = search_items(&sample(), "CAT", 200);
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn test_search_never_returns_the_root() {
        let items = search_items(&sample(), "dog", 200);
        let titles: Vec<&str> = items.iter().map(DisplayItem::title).collect();
        assert_eq!(titles, vec!["Dog"]);
    }

    #[test]
    fn test_search_cap_is_a_hard_slice_in_traversal_order() {
        let many: Vec<BookmarkNode> = (0..10)
            .map(|i| bookmark(&i.to_string(), &format!("cat {i}"), "http://cats.com"))
            .collect();
        let snapshot = TreeSnapshot(vec![folder("0", "", many)]);

        let items = search_items(&snapshot, "cat", 3);

        let titles: Vec<&str> = items.iter().map(DisplayItem::title).collect();
        assert_eq!(titles, vec!["cat 0", "cat 1", "cat 2"]);
    }

    #[test]
    fn test_saved_list_is_flat_and_capped() {
        let items = saved_items(&sample(), 50);
        let titles: Vec<&str> = items.iter().map(DisplayItem::title).collect();
        assert_eq!(titles, vec!["Cat", "Dog"]);

        let capped = saved_items(&sample(), 1);
        assert_eq!(capped.len(), 1);
    }
}
