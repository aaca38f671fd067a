pub mod tree;
pub mod workspace;

pub use tree::{BranchChild, BranchKind, FallbackSpec, Node, WindowHandle};
pub use workspace::{
    Layout, LayoutEvent, RenderKey, Workspace, WorkspaceId, WorkspaceRegistry,
};
