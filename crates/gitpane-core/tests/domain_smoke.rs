use gitpane_core::domain::{ChangeRecord, DiffArea, FileStatusKind};
use gitpane_core::error::ErrorKind;
use gitpane_core::path_tree::PathTree;
use rustc_hash::FxHashSet;

fn records() -> Vec<ChangeRecord> {
    vec![
        ChangeRecord::new("src/a.ts", FileStatusKind::Modified, false),
        ChangeRecord::new("src/b.ts", FileStatusKind::Added, true),
        ChangeRecord::new("readme.txt", FileStatusKind::Untracked, false),
    ]
}

#[test]
fn untracked_is_never_staged() {
    let record = ChangeRecord::new("x", FileStatusKind::Untracked, true);
    assert_eq!(record.area(), DiffArea::Unstaged);
    assert_eq!(
        ChangeRecord::new("y", FileStatusKind::Modified, true).area(),
        DiffArea::Staged
    );
}

#[test]
fn partitions_build_independent_trees() {
    let records = records();
    let staged = PathTree::build(records.iter().filter(|r| r.area() == DiffArea::Staged))
        .expect("staged tree");
    let unstaged = PathTree::build(records.iter().filter(|r| r.area() == DiffArea::Unstaged))
        .expect("unstaged tree");

    assert_eq!(staged.file_paths(), vec!["src/b.ts"]);
    assert_eq!(unstaged.file_paths(), vec!["src/a.ts", "readme.txt"]);
}

#[test]
fn leaf_paths_equal_input_paths() {
    let fixtures: Vec<Vec<&str>> = vec![
        vec!["a"],
        vec!["a/b/c", "a/b/d", "a/e", "f"],
        vec!["z/1", "y/2", "z/3", "x"],
        vec!["deep/er/and/deeper/file.rs", "deep/sibling.rs"],
    ];

    for paths in fixtures {
        let records = paths
            .iter()
            .map(|p| ChangeRecord::new(*p, FileStatusKind::Modified, false))
            .collect::<Vec<_>>();
        let tree = PathTree::build(&records).expect("tree");

        let leaves = tree.file_paths().into_iter().collect::<FxHashSet<_>>();
        let input = paths.iter().copied().collect::<FxHashSet<_>>();
        assert_eq!(leaves, input);
    }
}

#[test]
fn colliding_pair_reports_both_paths() {
    let records = vec![
        ChangeRecord::new("a", FileStatusKind::Modified, false),
        ChangeRecord::new("a/b", FileStatusKind::Added, false),
    ];
    let err = PathTree::build(&records).expect_err("conflict");
    match err.kind() {
        ErrorKind::TreeConflict { file, descendant } => {
            assert_eq!(file, "a");
            assert_eq!(descendant, "a/b");
        }
        other => panic!("unexpected error {other:?}"),
    }
    assert!(err.to_string().contains("a/b"));
}

#[test]
fn status_letters() {
    let letters = [
        FileStatusKind::Added,
        FileStatusKind::Modified,
        FileStatusKind::Deleted,
        FileStatusKind::Untracked,
        FileStatusKind::Ignored,
    ]
    .map(FileStatusKind::letter);
    assert_eq!(letters, ['A', 'M', 'D', '?', '!']);
}
