use crate::path_tree::{PathTree, TreeNode};
use rustc_hash::FxHashSet;
use std::collections::BTreeSet;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TriState {
    None,
    Some,
    All,
}

/// Selected file paths of one partition. Directories are never stored.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SelectionSet {
    paths: BTreeSet<String>,
}

impl SelectionSet {
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.paths.contains(path)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.paths.iter().map(String::as_str)
    }

    /// Toggling a file flips it. Toggling a directory deselects its files when all of them are
    /// selected and selects all of them otherwise.
    pub fn toggle(&self, path: &str, node: &TreeNode) -> SelectionSet {
        let mut next = self.clone();
        match node {
            TreeNode::File(_) => {
                if !next.paths.remove(path) {
                    next.paths.insert(path.to_string());
                }
            }
            TreeNode::Dir(_) => {
                let files = node.file_paths();
                if files.iter().all(|p| self.paths.contains(*p)) {
                    for p in files {
                        next.paths.remove(p);
                    }
                } else {
                    next.paths.extend(files.into_iter().map(str::to_string));
                }
            }
        }
        next
    }

    pub fn tri_state(&self, node: &TreeNode) -> TriState {
        let files = node.file_paths();
        let selected = files.iter().filter(|p| self.paths.contains(**p)).count();
        if selected == 0 {
            TriState::None
        } else if selected == files.len() {
            TriState::All
        } else {
            TriState::Some
        }
    }

    pub fn select_all(tree: &PathTree) -> SelectionSet {
        SelectionSet {
            paths: tree.file_paths().into_iter().map(str::to_string).collect(),
        }
    }

    /// Drops entries that are no longer files of `tree`. Returns the number removed.
    pub fn retain_files(&mut self, tree: &PathTree) -> usize {
        let before = self.paths.len();
        self.paths.retain(|p| tree.contains_file(p));
        before - self.paths.len()
    }

    /// Selected paths in tree display order.
    pub fn in_tree_order(&self, tree: &PathTree) -> Vec<String> {
        tree.file_paths()
            .into_iter()
            .filter(|p| self.paths.contains(*p))
            .map(str::to_string)
            .collect()
    }

    pub fn clear(&mut self) {
        self.paths.clear();
    }
}

impl<S: Into<String>> FromIterator<S> for SelectionSet {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self {
            paths: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Expand/collapse state keyed by directory full path. Directories are expanded unless
/// explicitly collapsed, so a rebuilt tree keeps the state of every directory that reappears.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ExpandState {
    collapsed: FxHashSet<String>,
}

impl ExpandState {
    pub fn is_expanded(&self, dir_path: &str) -> bool {
        !self.collapsed.contains(dir_path)
    }

    pub fn toggle(&mut self, dir_path: &str) {
        if !self.collapsed.remove(dir_path) {
            self.collapsed.insert(dir_path.to_string());
        }
    }

    pub fn retain_dirs(&mut self, tree: &PathTree) {
        self.collapsed
            .retain(|p| tree.find(p).is_some_and(TreeNode::is_dir));
    }

    pub fn clear(&mut self) {
        self.collapsed.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ChangeRecord, FileStatusKind};

    fn tree(paths: &[&str]) -> PathTree {
        let records = paths
            .iter()
            .map(|p| ChangeRecord::new(*p, FileStatusKind::Modified, false))
            .collect::<Vec<_>>();
        PathTree::build(&records).expect("tree")
    }

    #[test]
    fn file_toggle_flips_membership() {
        let tree = tree(&["a.txt"]);
        let node = tree.find("a.txt").expect("node");

        let once = SelectionSet::default().toggle("a.txt", node);
        assert!(once.contains("a.txt"));
        let twice = once.toggle("a.txt", node);
        assert!(twice.is_empty());
    }

    #[test]
    fn directory_toggle_selects_when_mixed_then_clears() {
        let tree = tree(&["src/a.rs", "src/b.rs", "src/ui/c.rs", "top.rs"]);
        let src = tree.find("src").expect("src");

        let mixed: SelectionSet = ["src/b.rs", "top.rs"].into_iter().collect();
        assert_eq!(mixed.tri_state(src), TriState::Some);

        let first = mixed.toggle("src", src);
        assert_eq!(first.tri_state(src), TriState::All);
        assert!(first.contains("top.rs"));
        assert_eq!(first.len(), 4);

        let second = first.toggle("src", src);
        assert_eq!(second.tri_state(src), TriState::None);
        assert_eq!(second.iter().collect::<Vec<_>>(), vec!["top.rs"]);
    }

    #[test]
    fn toggle_depends_only_on_current_state() {
        let tree = tree(&["d/x", "d/y"]);
        let d = tree.find("d").expect("d");
        let partial: SelectionSet = ["d/x"].into_iter().collect();

        assert_eq!(partial.toggle("d", d), partial.toggle("d", d));
        assert_eq!(
            partial.toggle("d", d).toggle("d", d),
            SelectionSet::default()
        );
    }

    #[test]
    fn retain_and_order_follow_tree() {
        let tree = tree(&["b", "a/z", "a/y"]);
        let mut sel: SelectionSet = ["a/y", "gone.txt", "b"].into_iter().collect();

        assert_eq!(sel.retain_files(&tree), 1);
        assert_eq!(sel.in_tree_order(&tree), vec!["b", "a/y"]);
        assert_eq!(
            SelectionSet::select_all(&tree).in_tree_order(&tree),
            vec!["b", "a/z", "a/y"]
        );
    }

    #[test]
    fn expand_state_survives_rebuild_by_path() {
        let before = tree(&["a/one", "b/two"]);
        let mut expand = ExpandState::default();
        expand.toggle("a");
        expand.toggle("b");
        expand.retain_dirs(&before);

        let after = tree(&["a/one", "a/three", "c/four"]);
        expand.retain_dirs(&after);
        assert!(!expand.is_expanded("a"));
        assert!(expand.is_expanded("b"));
        assert!(expand.is_expanded("c"));
    }
}
