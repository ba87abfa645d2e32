use gitpane_core::domain::DiffArea;
use gitpane_core::path_tree::TreeNode;
use gitpane_state::model::ChangesState;
use gitpane_state::msg::Msg;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ContextMenuAction {
    OpenDiff { area: DiffArea, path: String },
    StageSelectionOrPath { path: String },
    UnstageSelectionOrPath { path: String },
    StageAll,
    UnstageAll,
    DiscardSelectionOrPath { area: DiffArea, path: String },
}

impl ContextMenuAction {
    /// Resolves the action against the state at the time it runs; the selection may have
    /// changed since the menu was opened.
    pub fn into_msgs(self, state: &ChangesState) -> Vec<Msg> {
        match self {
            Self::OpenDiff { area, path } => vec![Msg::SelectDiff { area, path }],
            Self::StageSelectionOrPath { path } => {
                if acts_on_selection(state, DiffArea::Unstaged, &path) {
                    vec![Msg::StageSelection]
                } else {
                    vec![Msg::StagePaths {
                        paths: target_files(state, DiffArea::Unstaged, &path),
                    }]
                }
            }
            Self::UnstageSelectionOrPath { path } => {
                if acts_on_selection(state, DiffArea::Staged, &path) {
                    vec![Msg::UnstageSelection]
                } else {
                    vec![Msg::UnstagePaths {
                        paths: target_files(state, DiffArea::Staged, &path),
                    }]
                }
            }
            Self::StageAll => vec![Msg::StageAll],
            Self::UnstageAll => vec![Msg::UnstageAll],
            Self::DiscardSelectionOrPath { area, path } => {
                let partition = state.partition(area);
                let paths = match partition.tree() {
                    Some(tree) if acts_on_selection(state, area, &path) => {
                        partition.selection.in_tree_order(tree)
                    }
                    _ => target_files(state, area, &path),
                };
                vec![Msg::DiscardPaths { paths }]
            }
        }
    }
}

/// A right-click on one member of a multi-selection acts on the whole selection.
fn acts_on_selection(state: &ChangesState, area: DiffArea, path: &str) -> bool {
    let selection = &state.partition(area).selection;
    selection.len() > 1 && selection.contains(path)
}

/// Files addressed by a row: the file itself or everything below a directory.
fn target_files(state: &ChangesState, area: DiffArea, path: &str) -> Vec<String> {
    match state.partition(area).tree().and_then(|t| t.find(path)) {
        Some(node) => node.file_paths().into_iter().map(str::to_string).collect(),
        None => vec![path.to_string()],
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ContextMenuItem {
    Separator,
    Header(String),
    Entry {
        label: String,
        shortcut: Option<&'static str>,
        disabled: bool,
        action: ContextMenuAction,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct ContextMenuModel {
    items: Vec<ContextMenuItem>,
}

impl ContextMenuModel {
    pub fn new(items: Vec<ContextMenuItem>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[ContextMenuItem] {
        &self.items
    }

    pub fn is_selectable(&self, ix: usize) -> bool {
        matches!(
            self.items.get(ix),
            Some(ContextMenuItem::Entry { disabled, .. }) if !*disabled
        )
    }

    pub fn first_selectable(&self) -> Option<usize> {
        (0..self.items.len()).find(|&ix| self.is_selectable(ix))
    }

    pub fn last_selectable(&self) -> Option<usize> {
        (0..self.items.len())
            .rev()
            .find(|&ix| self.is_selectable(ix))
    }

    pub fn next_selectable(&self, from: Option<usize>, dir: isize) -> Option<usize> {
        if self.items.is_empty() {
            return None;
        }
        let Some(mut ix) = from else {
            return if dir >= 0 {
                self.first_selectable()
            } else {
                self.last_selectable()
            };
        };

        let n = self.items.len() as isize;
        for _ in 0..self.items.len() {
            ix = ((ix as isize + dir).rem_euclid(n)) as usize;
            if self.is_selectable(ix) {
                return Some(ix);
            }
        }
        None
    }

    pub fn action(&self, ix: usize) -> Option<&ContextMenuAction> {
        match self.items.get(ix) {
            Some(ContextMenuItem::Entry {
                disabled: false,
                action,
                ..
            }) => Some(action),
            _ => None,
        }
    }
}

/// Menu for a row of the staged or unstaged tree. Files get "Open diff"; every row gets the
/// action that moves it to the other partition.
pub fn status_row_menu(state: &ChangesState, area: DiffArea, path: &str) -> ContextMenuModel {
    let partition = state.partition(area);
    let node = partition.tree().and_then(|t| t.find(path));
    let use_selection = acts_on_selection(state, area, path);
    let selected_count = if use_selection {
        partition.selection.len()
    } else {
        1
    };

    let title = node
        .map(TreeNode::name)
        .unwrap_or(path)
        .to_string();
    let mut items = vec![ContextMenuItem::Header(title), ContextMenuItem::Separator];

    if node.is_some_and(|n| !n.is_dir()) {
        items.push(ContextMenuItem::Entry {
            label: "Open diff".to_string(),
            shortcut: Some("Enter"),
            disabled: false,
            action: ContextMenuAction::OpenDiff {
                area,
                path: path.to_string(),
            },
        });
    }

    let in_flight = state.ops_in_flight;
    items.push(match area {
        DiffArea::Unstaged => ContextMenuItem::Entry {
            label: if use_selection {
                format!("Stage ({selected_count})")
            } else {
                "Stage".to_string()
            },
            shortcut: Some("S"),
            disabled: in_flight.stage,
            action: ContextMenuAction::StageSelectionOrPath {
                path: path.to_string(),
            },
        },
        DiffArea::Staged => ContextMenuItem::Entry {
            label: if use_selection {
                format!("Unstage ({selected_count})")
            } else {
                "Unstage".to_string()
            },
            shortcut: Some("U"),
            disabled: in_flight.unstage,
            action: ContextMenuAction::UnstageSelectionOrPath {
                path: path.to_string(),
            },
        },
    });

    items.push(ContextMenuItem::Entry {
        label: if use_selection {
            format!("Discard ({selected_count})")
        } else {
            "Discard changes".to_string()
        },
        shortcut: Some("D"),
        disabled: false,
        action: ContextMenuAction::DiscardSelectionOrPath {
            area,
            path: path.to_string(),
        },
    });

    items.push(ContextMenuItem::Separator);
    items.push(ContextMenuItem::Entry {
        label: "Stage all".to_string(),
        shortcut: None,
        disabled: in_flight.stage || state.unstaged.file_count() == 0,
        action: ContextMenuAction::StageAll,
    });
    items.push(ContextMenuItem::Entry {
        label: "Unstage all".to_string(),
        shortcut: None,
        disabled: in_flight.unstage || state.staged.file_count() == 0,
        action: ContextMenuAction::UnstageAll,
    });

    ContextMenuModel::new(items)
}

#[derive(Clone, Debug, PartialEq)]
pub struct OpenMenu {
    pub anchor: Point,
    pub model: ContextMenuModel,
    pub selected_ix: Option<usize>,
}

/// At most one menu is open. The anchor is the pointer position captured when it was opened.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ContextMenuHost {
    open: Option<OpenMenu>,
}

impl ContextMenuHost {
    pub fn open_at(&mut self, anchor: Point, model: ContextMenuModel) {
        self.open = Some(OpenMenu {
            anchor,
            model,
            selected_ix: None,
        });
    }

    pub fn close(&mut self) {
        self.open = None;
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    pub fn current(&self) -> Option<&OpenMenu> {
        self.open.as_ref()
    }

    /// Any click elsewhere in the document dismisses the menu.
    pub fn on_document_click(&mut self) {
        if self.open.take().is_some() {
            log::trace!("context menu dismissed by document click");
        }
    }

    pub fn move_selection(&mut self, dir: isize) {
        if let Some(menu) = self.open.as_mut() {
            menu.selected_ix = menu.model.next_selectable(menu.selected_ix, dir);
        }
    }

    /// Closes the menu and hands back the chosen action. Disabled entries and separators
    /// leave the menu open.
    pub fn activate(&mut self, ix: usize) -> Option<ContextMenuAction> {
        let action = self.open.as_ref()?.model.action(ix)?.clone();
        self.open = None;
        Some(action)
    }

    pub fn activate_selected(&mut self) -> Option<ContextMenuAction> {
        let ix = self.open.as_ref()?.selected_ix?;
        self.activate(ix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> ContextMenuModel {
        ContextMenuModel::new(vec![
            ContextMenuItem::Header("x".to_string()),
            ContextMenuItem::Entry {
                label: "a".to_string(),
                shortcut: None,
                disabled: false,
                action: ContextMenuAction::StageAll,
            },
            ContextMenuItem::Separator,
            ContextMenuItem::Entry {
                label: "b".to_string(),
                shortcut: None,
                disabled: true,
                action: ContextMenuAction::UnstageAll,
            },
            ContextMenuItem::Entry {
                label: "c".to_string(),
                shortcut: None,
                disabled: false,
                action: ContextMenuAction::UnstageAll,
            },
        ])
    }

    #[test]
    fn keyboard_navigation_skips_disabled_and_wraps() {
        let model = model();
        assert_eq!(model.next_selectable(None, 1), Some(1));
        assert_eq!(model.next_selectable(None, -1), Some(4));
        assert_eq!(model.next_selectable(Some(1), 1), Some(4));
        assert_eq!(model.next_selectable(Some(4), 1), Some(1));
    }

    #[test]
    fn document_click_dismisses_open_menu() {
        let mut host = ContextMenuHost::default();
        host.open_at(Point::new(12.0, 34.0), model());
        assert_eq!(host.current().map(|m| m.anchor), Some(Point::new(12.0, 34.0)));

        host.on_document_click();
        assert!(!host.is_open());
    }

    #[test]
    fn activating_disabled_entry_keeps_menu_open() {
        let mut host = ContextMenuHost::default();
        host.open_at(Point::default(), model());
        assert_eq!(host.activate(3), None);
        assert!(host.is_open());

        host.move_selection(1);
        assert_eq!(host.activate_selected(), Some(ContextMenuAction::StageAll));
        assert!(!host.is_open());
    }
}
