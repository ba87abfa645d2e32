use crate::context_menu::{ContextMenuHost, Point, status_row_menu};
use crate::layout::SplitPane;
use crate::settings::ViewSettings;
use crate::subscriptions::{HostEvent, HostEvents, Subscription};
use gitpane_core::diff::{DiffLine, DiffView};
use gitpane_core::domain::{BranchIdentity, DiffArea};
use gitpane_core::path_tree::TreeNode;
use gitpane_core::selection::TriState;
use gitpane_state::model::{AppNotification, AssetSlot, ChangesState, Loadable, RefreshTrigger};
use gitpane_state::msg::Msg;
use gitpane_state::store::ChangesStore;
use std::path::PathBuf;
use std::sync::{Arc, mpsc};

/// What the view needs from the store. `ChangesStore` is the production implementation.
pub trait ChangesHandle: Send + Sync {
    fn dispatch(&self, msg: Msg);
    fn snapshot(&self) -> ChangesState;
}

impl ChangesHandle for ChangesStore {
    fn dispatch(&self, msg: Msg) {
        ChangesStore::dispatch(self, msg);
    }

    fn snapshot(&self) -> ChangesState {
        ChangesStore::snapshot(self)
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ChangesViewProps {
    pub repo_path: PathBuf,
    pub branch: Option<BranchIdentity>,
}

/// One visible line of a partition tree.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StatusRow {
    pub area: DiffArea,
    pub full_path: String,
    pub name: String,
    pub depth: usize,
    pub is_dir: bool,
    /// Status letter; directories have none.
    pub badge: Option<char>,
    /// Files are either `All` or `None`.
    pub selected: TriState,
    pub expanded: bool,
    /// The row whose diff is shown.
    pub active: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub enum PartitionView {
    Loading,
    Error(String),
    Rows(Vec<StatusRow>),
}

#[derive(Clone, Debug, PartialEq)]
pub enum DiffPane {
    Empty,
    Loading,
    Error(String),
    Text(Vec<DiffLine>),
    Binary { old: AssetSlot, new: AssetSlot },
}

/// Mounted changes panel: partition trees, diff, commit form and the split between them.
pub struct ChangesView {
    store: Arc<dyn ChangesHandle>,
    props: ChangesViewProps,
    state: ChangesState,
    split: SplitPane,
    menu: ContextMenuHost,
    host_rx: mpsc::Receiver<HostEvent>,
    _subscriptions: Vec<Subscription>,
}

impl ChangesView {
    pub fn mount(
        store: Arc<dyn ChangesHandle>,
        props: ChangesViewProps,
        host: &HostEvents,
        settings: &ViewSettings,
    ) -> Self {
        log::debug!("mounting changes view for {}", props.repo_path.display());
        store.dispatch(Msg::SetRepo {
            workdir: props.repo_path.clone(),
            branch: props.branch.clone(),
        });

        let (host_tx, host_rx) = mpsc::channel();
        let refresh_store = Arc::clone(&store);
        let subscription = host.subscribe(move |event| {
            let trigger = match event {
                HostEvent::WindowFocused => Some(RefreshTrigger::WindowFocused),
                HostEvent::DocumentVisible => Some(RefreshTrigger::DocumentVisible),
                HostEvent::DocumentHidden | HostEvent::DocumentClick => None,
            };
            if let Some(trigger) = trigger {
                refresh_store.dispatch(Msg::Refresh { trigger });
            }
            let _ = host_tx.send(event);
        });

        Self {
            state: store.snapshot(),
            store,
            props,
            split: SplitPane::from_settings(&settings.clone().normalized()),
            menu: ContextMenuHost::default(),
            host_rx,
            _subscriptions: vec![subscription],
        }
    }

    pub fn props(&self) -> &ChangesViewProps {
        &self.props
    }

    /// A different repository resets everything; the same one just refreshes.
    pub fn set_props(&mut self, props: ChangesViewProps) {
        if props == self.props {
            return;
        }
        self.menu.close();
        self.store.dispatch(Msg::SetRepo {
            workdir: props.repo_path.clone(),
            branch: props.branch.clone(),
        });
        self.props = props;
    }

    /// Applies queued host events and pulls the latest store snapshot. Called by the host
    /// whenever the store reports a change or an event was forwarded.
    pub fn sync(&mut self) {
        while let Ok(event) = self.host_rx.try_recv() {
            if event == HostEvent::DocumentClick {
                self.menu.on_document_click();
            }
        }
        self.state = self.store.snapshot();
    }

    pub fn state(&self) -> &ChangesState {
        &self.state
    }

    pub fn partition_view(&self, area: DiffArea) -> PartitionView {
        let partition = self.state.partition(area);
        let tree = match &partition.tree {
            Loadable::Ready(tree) => tree,
            Loadable::Error(message) => return PartitionView::Error(message.clone()),
            Loadable::NotLoaded | Loadable::Loading => return PartitionView::Loading,
        };

        let active = self
            .state
            .diff_target
            .as_ref()
            .filter(|t| t.area == area)
            .map(|t| t.path.as_str());

        let rows = tree
            .rows(&partition.expand)
            .into_iter()
            .map(|row| {
                let node = row.node;
                let (badge, expanded) = match node {
                    TreeNode::File(file) => (Some(file.status.letter()), false),
                    TreeNode::Dir(dir) => (None, partition.expand.is_expanded(&dir.full_path)),
                };
                StatusRow {
                    area,
                    full_path: node.full_path().to_string(),
                    name: node.name().to_string(),
                    depth: row.depth,
                    is_dir: node.is_dir(),
                    badge,
                    selected: partition.selection.tri_state(node),
                    expanded,
                    active: active == Some(node.full_path()),
                }
            })
            .collect();
        PartitionView::Rows(rows)
    }

    pub fn diff_pane(&self) -> DiffPane {
        match &self.state.diff {
            Loadable::NotLoaded => DiffPane::Empty,
            Loadable::Loading => DiffPane::Loading,
            Loadable::Error(message) => DiffPane::Error(message.clone()),
            Loadable::Ready(view) => match view.as_ref() {
                DiffView::Text(lines) => DiffPane::Text(lines.clone()),
                DiffView::Binary { .. } => DiffPane::Binary {
                    old: self.state.diff_assets.old.clone(),
                    new: self.state.diff_assets.new.clone(),
                },
            },
        }
    }

    /// Files open their diff; directories fold.
    pub fn click_row(&mut self, area: DiffArea, path: &str) {
        let is_dir = self
            .state
            .partition(area)
            .tree()
            .and_then(|t| t.find(path))
            .map(TreeNode::is_dir);
        match is_dir {
            Some(true) => self.store.dispatch(Msg::ToggleExpanded {
                area,
                path: path.to_string(),
            }),
            Some(false) => self.store.dispatch(Msg::SelectDiff {
                area,
                path: path.to_string(),
            }),
            None => log::debug!("click on unknown row {path}"),
        }
    }

    pub fn toggle_checkbox(&mut self, area: DiffArea, path: &str) {
        self.store.dispatch(Msg::ToggleSelection {
            area,
            path: path.to_string(),
        });
    }

    pub fn open_context_menu(&mut self, area: DiffArea, path: &str, position: Point) {
        let model = status_row_menu(&self.state, area, path);
        self.menu.open_at(position, model);
    }

    pub fn context_menu(&self) -> &ContextMenuHost {
        &self.menu
    }

    pub fn context_menu_move(&mut self, dir: isize) {
        self.menu.move_selection(dir);
    }

    pub fn context_menu_activate(&mut self, ix: usize) {
        if let Some(action) = self.menu.activate(ix) {
            self.run_menu_action(action);
        }
    }

    pub fn context_menu_activate_selected(&mut self) {
        if let Some(action) = self.menu.activate_selected() {
            self.run_menu_action(action);
        }
    }

    fn run_menu_action(&mut self, action: crate::context_menu::ContextMenuAction) {
        for msg in action.into_msgs(&self.state) {
            self.store.dispatch(msg);
        }
    }

    pub fn divider_pointer_down(&mut self, x: f32) {
        self.split.pointer_down_on_divider(x);
    }

    pub fn pointer_move(&mut self, x: f32) -> bool {
        self.split.pointer_move(x)
    }

    pub fn pointer_up(&mut self) {
        self.split.pointer_up();
    }

    pub fn pointer_leave(&mut self) {
        self.split.pointer_leave();
    }

    pub fn split(&self) -> &SplitPane {
        &self.split
    }

    pub fn refresh(&self) {
        self.store.dispatch(Msg::Refresh {
            trigger: RefreshTrigger::Manual,
        });
    }

    pub fn stage_selection(&self) {
        self.store.dispatch(Msg::StageSelection);
    }

    pub fn unstage_selection(&self) {
        self.store.dispatch(Msg::UnstageSelection);
    }

    pub fn stage_all(&self) {
        self.store.dispatch(Msg::StageAll);
    }

    pub fn unstage_all(&self) {
        self.store.dispatch(Msg::UnstageAll);
    }

    pub fn set_commit_message(&self, message: impl Into<String>) {
        self.store.dispatch(Msg::SetCommitMessage(message.into()));
    }

    pub fn set_commit_description(&self, description: impl Into<String>) {
        self.store
            .dispatch(Msg::SetCommitDescription(description.into()));
    }

    pub fn set_commit_amend(&self, amend: bool) {
        self.store.dispatch(Msg::SetCommitAmend(amend));
    }

    pub fn commit(&self) {
        self.store.dispatch(Msg::Commit);
    }

    pub fn notifications(&self) -> &[AppNotification] {
        &self.state.notifications
    }

    pub fn dismiss_notification(&self, id: u64) {
        self.store.dispatch(Msg::DismissNotification { id });
    }
}

impl Drop for ChangesView {
    fn drop(&mut self) {
        log::debug!("unmounting changes view for {}", self.props.repo_path.display());
        self.store.dispatch(Msg::CloseRepo);
    }
}
