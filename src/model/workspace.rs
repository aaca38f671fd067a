use std::fmt;
use std::path::Path;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, trace};

use crate::common::collections::{HashMap, hash_map};
use crate::common::config::Settings;
use crate::model::tree::Node;

/// Name a workspace is known by outside this subsystem. Workspaces appear and
/// disappear dynamically, so ids are not pre-declared anywhere.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkspaceId(String);

impl WorkspaceId {
    pub fn new(name: impl Into<String>) -> Self { Self(name.into()) }

    pub fn as_str(&self) -> &str { &self.0 }
}

impl From<&str> for WorkspaceId {
    fn from(name: &str) -> Self { Self(name.to_string()) }
}

impl From<String> for WorkspaceId {
    fn from(name: String) -> Self { Self(name) }
}

impl fmt::Display for WorkspaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

/// The full tiling structure of one workspace, replaced wholesale on every
/// structural change. Trees are never mutated node-by-node, which is what
/// lets consumers key on the registry version instead of diffing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub structure: Node,
}

impl Layout {
    pub fn new(structure: Node) -> Self { Self { structure } }
}

impl From<Node> for Layout {
    fn from(structure: Node) -> Self { Self::new(structure) }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workspace {
    id: WorkspaceId,
    layout: Option<Layout>,
}

impl Workspace {
    fn new(id: WorkspaceId) -> Self { Self { id, layout: None } }

    pub fn id(&self) -> &WorkspaceId { &self.id }

    pub fn layout(&self) -> Option<&Layout> { self.layout.as_ref() }

    pub fn structure(&self) -> Option<&Node> { self.layout.as_ref().map(|l| &l.structure) }

    pub fn has_layout(&self) -> bool { self.layout.is_some() }

    pub fn window_count(&self) -> usize {
        self.structure().map(Node::window_count).unwrap_or(0)
    }
}

/// Identity key the presentation layer uses to decide whether a previous
/// render can be kept. Strictly greater version means the structure may have
/// changed; equal key means it has not.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RenderKey {
    pub workspace: WorkspaceId,
    pub version: u64,
}

/// Notification from the window-management side of the event bridge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LayoutEvent {
    LayoutChanged {
        workspace: WorkspaceId,
        structure: Node,
    },
    WorkspaceActivated {
        workspace: WorkspaceId,
    },
}

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot io failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("snapshot encoding failed: {0}")]
    Encode(#[from] ron::Error),
    #[error("snapshot decoding failed: {0}")]
    Decode(#[from] ron::error::SpannedError),
}

/// Holds every known workspace, which one is current, and the version counter
/// that keys re-composition. All mutation happens on the shell's event
/// thread; updates replace structures atomically, so a traversal always sees
/// a consistent `(structure, version)` snapshot.
#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkspaceRegistry {
    workspaces: HashMap<WorkspaceId, Workspace>,
    active: Option<WorkspaceId>,
    version: u64,
}

impl WorkspaceRegistry {
    pub fn new() -> Self { Self::default() }

    /// Pre-creates the configured workspaces and selects the configured
    /// default. Ids referenced later that were not configured are still
    /// created lazily.
    pub fn from_settings(settings: &Settings) -> Self {
        let mut registry = Self::new();
        for name in &settings.workspace.names {
            registry.ensure_workspace(WorkspaceId::from(name.as_str()));
        }
        if let Some(name) = settings.workspace.names.get(settings.workspace.default_workspace) {
            registry.active = Some(WorkspaceId::from(name.as_str()));
        }
        debug!(
            workspaces = registry.workspaces.len(),
            "seeded registry from settings"
        );
        registry
    }

    fn ensure_workspace(&mut self, id: WorkspaceId) -> &mut Workspace {
        match self.workspaces.entry(id) {
            hash_map::Entry::Vacant(entry) => {
                let workspace = Workspace::new(entry.key().clone());
                debug!("registering workspace {} on first reference", workspace.id);
                entry.insert(workspace)
            }
            hash_map::Entry::Occupied(entry) => entry.into_mut(),
        }
    }

    /// Replaces the workspace's layout wholesale and bumps the version.
    /// Unknown workspace ids create their entry. Returns the new version.
    pub fn set_layout(&mut self, workspace: WorkspaceId, layout: Layout) -> u64 {
        trace_misc("set_layout", || {
            self.ensure_workspace(workspace.clone()).layout = Some(layout);
            self.version += 1;
            debug!(workspace = %workspace, version = self.version, "layout replaced");
            self.version
        })
    }

    /// Changes which workspace is current without touching any layout.
    /// Unknown workspace ids create their (layout-less) entry.
    pub fn set_active_workspace(&mut self, workspace: WorkspaceId) {
        self.ensure_workspace(workspace.clone());
        if self.active.as_ref() != Some(&workspace) {
            trace!("switching active workspace to {workspace}");
            self.active = Some(workspace);
        }
    }

    pub fn handle_event(&mut self, event: LayoutEvent) {
        match event {
            LayoutEvent::LayoutChanged { workspace, structure } => {
                self.set_layout(workspace, Layout::new(structure));
            }
            LayoutEvent::WorkspaceActivated { workspace } => {
                self.set_active_workspace(workspace);
            }
        }
    }

    /// `None` until the first `set_active_workspace`, which callers treat as
    /// "render nothing", never as a fault.
    pub fn current_workspace(&self) -> Option<&Workspace> {
        self.active.as_ref().and_then(|id| self.workspaces.get(id))
    }

    pub fn active_workspace_id(&self) -> Option<&WorkspaceId> { self.active.as_ref() }

    pub fn workspace(&self, id: &WorkspaceId) -> Option<&Workspace> { self.workspaces.get(id) }

    /// Root of the current workspace's layout, if both exist.
    pub fn current_structure(&self) -> Option<&Node> {
        self.current_workspace()?.structure()
    }

    pub fn version(&self) -> u64 { self.version }

    pub fn render_key(&self) -> Option<RenderKey> {
        Some(RenderKey {
            workspace: self.active.clone()?,
            version: self.version,
        })
    }

    pub fn list_workspaces(&self) -> Vec<&WorkspaceId> {
        let mut ids: Vec<_> = self.workspaces.keys().collect();
        ids.sort();
        ids
    }

    fn cycle_order(&self, skip_empty: bool) -> Vec<&WorkspaceId> {
        let mut ids: Vec<_> = self
            .workspaces
            .values()
            .filter(|workspace| !skip_empty || workspace.window_count() > 0)
            .map(|workspace| &workspace.id)
            .collect();
        ids.sort();
        ids
    }

    pub fn next_workspace(&self, current: &WorkspaceId, skip_empty: bool) -> Option<WorkspaceId> {
        let ids = self.cycle_order(skip_empty);
        let pos = ids.iter().position(|id| *id == current)?;
        ids.get((pos + 1) % ids.len()).map(|id| (*id).clone())
    }

    pub fn prev_workspace(&self, current: &WorkspaceId, skip_empty: bool) -> Option<WorkspaceId> {
        let ids = self.cycle_order(skip_empty);
        let pos = ids.iter().position(|id| *id == current)?;
        let prev = if pos == 0 { ids.len() - 1 } else { pos - 1 };
        ids.get(prev).map(|id| (*id).clone())
    }

    pub fn stats(&self) -> RegistryStats {
        let mut stats = RegistryStats {
            total_workspaces: self.workspaces.len(),
            with_layout: self.workspaces.values().filter(|w| w.has_layout()).count(),
            total_windows: 0,
            windows_per_workspace: HashMap::default(),
        };
        for (id, workspace) in &self.workspaces {
            let windows = workspace.window_count();
            stats.total_windows += windows;
            stats.windows_per_workspace.insert(id.clone(), windows);
        }
        stats
    }

    pub fn save(&self, path: &Path) -> Result<(), SnapshotError> {
        let text = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?;
        std::fs::write(path, text)?;
        Ok(())
    }

    pub fn restore(path: &Path) -> Result<Self, SnapshotError> {
        let text = std::fs::read_to_string(path)?;
        Ok(ron::de::from_str(&text)?)
    }
}

#[derive(Debug, Clone)]
pub struct RegistryStats {
    pub total_workspaces: usize,
    pub with_layout: usize,
    pub total_windows: usize,
    pub windows_per_workspace: HashMap<WorkspaceId, usize>,
}

fn trace_misc<T>(desc: &str, f: impl FnOnce() -> T) -> T {
    let start = Instant::now();
    let out = f();
    let end = Instant::now();
    trace!(time = ?(end - start), "{desc}");
    out
}
