//! Folder tree built from a flat change list.
//!
//! Siblings keep the order in which their first record was seen; nothing is sorted. Every
//! directory exists only because at least one file lives below it.

use crate::domain::{ChangeRecord, FileStatusKind};
use crate::error::{Error, ErrorKind};
use crate::selection::ExpandState;
use crate::services::Result;
use rustc_hash::FxHashMap;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FileNode {
    pub name: String,
    pub full_path: String,
    pub status: FileStatusKind,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DirNode {
    pub name: String,
    pub full_path: String,
    children: Children,
}

impl DirNode {
    pub fn children(&self) -> &[TreeNode] {
        &self.children.nodes
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TreeNode {
    File(FileNode),
    Dir(DirNode),
}

impl TreeNode {
    pub fn name(&self) -> &str {
        match self {
            Self::File(f) => &f.name,
            Self::Dir(d) => &d.name,
        }
    }

    pub fn full_path(&self) -> &str {
        match self {
            Self::File(f) => &f.full_path,
            Self::Dir(d) => &d.full_path,
        }
    }

    pub fn is_dir(&self) -> bool {
        matches!(self, Self::Dir(_))
    }

    /// Descendant file paths in pre-order. A file node yields itself.
    pub fn file_paths(&self) -> Vec<&str> {
        let mut out = Vec::new();
        collect_files(std::slice::from_ref(self), &mut out);
        out
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
struct Children {
    nodes: Vec<TreeNode>,
    index: FxHashMap<String, usize>,
}

impl Children {
    fn get(&self, name: &str) -> Option<&TreeNode> {
        self.index.get(name).map(|&ix| &self.nodes[ix])
    }

    fn slot(&mut self, name: &str, make: impl FnOnce() -> TreeNode) -> &mut TreeNode {
        let ix = match self.index.get(name) {
            Some(&ix) => ix,
            None => {
                let ix = self.nodes.len();
                self.nodes.push(make());
                self.index.insert(name.to_string(), ix);
                ix
            }
        };
        &mut self.nodes[ix]
    }
}

#[derive(Clone, Copy, Debug)]
pub struct TreeRow<'a> {
    pub depth: usize,
    pub node: &'a TreeNode,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PathTree {
    roots: Children,
    file_count: usize,
}

impl PathTree {
    pub fn build<'a>(records: impl IntoIterator<Item = &'a ChangeRecord>) -> Result<Self> {
        let mut tree = Self::default();
        for record in records {
            tree.insert(&record.path, record.status)?;
        }
        Ok(tree)
    }

    fn insert(&mut self, path: &str, status: FileStatusKind) -> Result<()> {
        if path.is_empty() || path.split('/').any(str::is_empty) {
            return Err(Error::new(ErrorKind::InvalidPath(path.to_string())));
        }

        let segment_count = path.split('/').count();
        let mut level = &mut self.roots;
        let mut offset = 0usize;

        for (ix, segment) in path.split('/').enumerate() {
            offset += segment.len();
            let full_path = &path[..offset];
            offset += 1;
            let last = ix + 1 == segment_count;

            let mut created = false;
            let node = level.slot(segment, || {
                created = true;
                if last {
                    TreeNode::File(FileNode {
                        name: segment.to_string(),
                        full_path: full_path.to_string(),
                        status,
                    })
                } else {
                    TreeNode::Dir(DirNode {
                        name: segment.to_string(),
                        full_path: full_path.to_string(),
                        children: Children::default(),
                    })
                }
            });

            match node {
                TreeNode::File(file) => {
                    if !last {
                        return Err(Error::tree_conflict(file.full_path.clone(), path));
                    }
                    // Duplicate records: the last one wins.
                    file.status = status;
                    if created {
                        self.file_count += 1;
                    }
                    return Ok(());
                }
                TreeNode::Dir(dir) => {
                    if last {
                        let descendant = dir
                            .children
                            .nodes
                            .first()
                            .and_then(|n| n.file_paths().first().map(|p| p.to_string()))
                            .unwrap_or_else(|| dir.full_path.clone());
                        return Err(Error::tree_conflict(path, descendant));
                    }
                    level = &mut dir.children;
                }
            }
        }

        Ok(())
    }

    pub fn roots(&self) -> &[TreeNode] {
        &self.roots.nodes
    }

    /// Number of files in the tree.
    pub fn len(&self) -> usize {
        self.file_count
    }

    pub fn is_empty(&self) -> bool {
        self.file_count == 0
    }

    pub fn find(&self, path: &str) -> Option<&TreeNode> {
        let mut segments = path.split('/');
        let mut node = self.roots.get(segments.next()?)?;
        for segment in segments {
            match node {
                TreeNode::Dir(dir) => node = dir.children.get(segment)?,
                TreeNode::File(_) => return None,
            }
        }
        Some(node)
    }

    pub fn contains_file(&self, path: &str) -> bool {
        matches!(self.find(path), Some(TreeNode::File(_)))
    }

    pub fn file_paths(&self) -> Vec<&str> {
        let mut out = Vec::with_capacity(self.file_count);
        collect_files(&self.roots.nodes, &mut out);
        out
    }

    pub fn dir_paths(&self) -> Vec<&str> {
        fn walk<'a>(nodes: &'a [TreeNode], out: &mut Vec<&'a str>) {
            for node in nodes {
                if let TreeNode::Dir(dir) = node {
                    out.push(&dir.full_path);
                    walk(&dir.children.nodes, out);
                }
            }
        }
        let mut out = Vec::new();
        walk(&self.roots.nodes, &mut out);
        out
    }

    /// Visible nodes in display order; children of collapsed directories are skipped.
    pub fn rows(&self, expand: &ExpandState) -> Vec<TreeRow<'_>> {
        fn walk<'a>(
            nodes: &'a [TreeNode],
            depth: usize,
            expand: &ExpandState,
            out: &mut Vec<TreeRow<'a>>,
        ) {
            for node in nodes {
                out.push(TreeRow { depth, node });
                if let TreeNode::Dir(dir) = node
                    && expand.is_expanded(&dir.full_path)
                {
                    walk(&dir.children.nodes, depth + 1, expand, out);
                }
            }
        }
        let mut out = Vec::new();
        walk(&self.roots.nodes, 0, expand, &mut out);
        out
    }
}

fn collect_files<'a>(nodes: &'a [TreeNode], out: &mut Vec<&'a str>) {
    for node in nodes {
        match node {
            TreeNode::File(file) => out.push(&file.full_path),
            TreeNode::Dir(dir) => collect_files(&dir.children.nodes, out),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use FileStatusKind::*;

    fn rec(path: &str, status: FileStatusKind) -> ChangeRecord {
        ChangeRecord::new(path, status, false)
    }

    fn names(nodes: &[TreeNode]) -> Vec<&str> {
        nodes.iter().map(TreeNode::name).collect()
    }

    #[test]
    fn siblings_keep_first_seen_order() {
        let records = vec![
            rec("src/z.rs", Modified),
            rec("readme.md", Added),
            rec("src/a.rs", Modified),
            rec("docs/guide.md", Deleted),
        ];
        let tree = PathTree::build(&records).expect("tree");

        assert_eq!(names(tree.roots()), vec!["src", "readme.md", "docs"]);
        let Some(TreeNode::Dir(src)) = tree.find("src") else {
            panic!("src should be a directory");
        };
        assert_eq!(names(src.children()), vec!["z.rs", "a.rs"]);
        assert_eq!(
            tree.file_paths(),
            vec!["src/z.rs", "src/a.rs", "readme.md", "docs/guide.md"]
        );
        assert_eq!(tree.len(), 4);
    }

    #[test]
    fn duplicate_path_takes_last_status() {
        let records = vec![rec("a/b.txt", Modified), rec("a/b.txt", Deleted)];
        let tree = PathTree::build(&records).expect("tree");

        assert_eq!(tree.len(), 1);
        match tree.find("a/b.txt") {
            Some(TreeNode::File(f)) => assert_eq!(f.status, Deleted),
            other => panic!("unexpected node {other:?}"),
        }
    }

    #[test]
    fn file_then_descendant_is_a_conflict() {
        let records = vec![rec("a", Modified), rec("a/b", Added)];
        let err = PathTree::build(&records).expect_err("conflict");
        assert_eq!(
            err.kind(),
            &ErrorKind::TreeConflict {
                file: "a".into(),
                descendant: "a/b".into()
            }
        );
    }

    #[test]
    fn descendant_then_file_is_a_conflict() {
        let records = vec![rec("a/b/c", Modified), rec("a/b", Added)];
        let err = PathTree::build(&records).expect_err("conflict");
        assert_eq!(
            err.kind(),
            &ErrorKind::TreeConflict {
                file: "a/b".into(),
                descendant: "a/b/c".into()
            }
        );
    }

    #[test]
    fn empty_segments_are_rejected() {
        for bad in ["", "a//b", "/a", "a/"] {
            let records = vec![rec(bad, Untracked)];
            let err = PathTree::build(&records).expect_err("invalid path");
            assert_eq!(err.kind(), &ErrorKind::InvalidPath(bad.to_string()));
        }
    }

    #[test]
    fn rows_skip_collapsed_directories() {
        let records = vec![rec("src/ui/view.rs", Modified), rec("src/lib.rs", Added)];
        let tree = PathTree::build(&records).expect("tree");

        let mut expand = ExpandState::default();
        let all = tree
            .rows(&expand)
            .iter()
            .map(|r| (r.depth, r.node.full_path()))
            .collect::<Vec<_>>();
        assert_eq!(
            all,
            vec![
                (0, "src"),
                (1, "src/ui"),
                (2, "src/ui/view.rs"),
                (1, "src/lib.rs"),
            ]
        );

        expand.toggle("src/ui");
        let collapsed = tree
            .rows(&expand)
            .iter()
            .map(|r| r.node.full_path())
            .collect::<Vec<_>>();
        assert_eq!(collapsed, vec!["src", "src/ui", "src/lib.rs"]);
    }

    #[test]
    fn find_distinguishes_files_and_dirs() {
        let records = vec![rec("a/b.txt", Modified)];
        let tree = PathTree::build(&records).expect("tree");

        assert!(tree.find("a").is_some_and(TreeNode::is_dir));
        assert!(tree.contains_file("a/b.txt"));
        assert!(!tree.contains_file("a"));
        assert!(tree.find("a/b.txt/c").is_none());
        assert!(tree.find("missing").is_none());
        assert_eq!(tree.dir_paths(), vec!["a"]);
    }
}
