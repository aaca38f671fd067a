use serde::{Deserialize, Serialize};

/// Opaque identifier for a native window. Assigned and recycled by the
/// compositor; this crate never dereferences it or checks liveness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WindowHandle(pub u64);

/// How a branch arranges its children.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BranchKind {
    #[default]
    Horizontal,
    Vertical,
    Stack,
}

/// Placeholder content shown for a slot no real window occupies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FallbackSpec {
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
}

/// A child slot of a branch. `priority` is unique among direct siblings and
/// defines the rendering order, ascending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchChild {
    pub priority: u32,
    pub node: Node,
}

impl BranchChild {
    pub fn new(priority: u32, node: Node) -> Self { Self { priority, node } }
}

/// One element of a workspace layout tree.
///
/// A node's variant is fixed at construction; changing a node's role means
/// building a new node from the old one's payload (see [`Node::split`]).
/// Every child is exclusively owned by its parent branch, so traversal never
/// needs cycle or aliasing checks.
///
/// A `Leaf` whose `handle` is `None` is a slot whose window has not attached
/// yet. It renders as nothing, like `Empty`, but keeps its `Leaf` tag for
/// callers that inspect the tree directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Node {
    Empty,
    Fallback(FallbackSpec),
    Leaf {
        #[serde(default)]
        handle: Option<WindowHandle>,
    },
    Branch {
        kind: BranchKind,
        children: Vec<BranchChild>,
    },
}

/// Direct children in ascending priority order. Sibling priorities are
/// unique, so the order is total.
pub fn by_priority(children: &[BranchChild]) -> Vec<&BranchChild> {
    let mut ordered: Vec<_> = children.iter().collect();
    ordered.sort_by_key(|child| child.priority);
    ordered
}

impl Node {
    pub fn leaf(handle: Option<WindowHandle>) -> Self { Node::Leaf { handle } }

    /// Consumes this node into a single-child branch, the first step of a
    /// split. The consumed node keeps priority 0; the caller inserts the new
    /// sibling after it.
    pub fn split(self, kind: BranchKind) -> Self {
        Node::Branch {
            kind,
            children: vec![BranchChild::new(0, self)],
        }
    }

    pub fn is_empty(&self) -> bool { matches!(self, Node::Empty) }

    pub fn is_fallback(&self) -> bool { matches!(self, Node::Fallback(_)) }

    pub fn is_leaf(&self) -> bool { matches!(self, Node::Leaf { .. }) }

    pub fn is_branch(&self) -> bool { matches!(self, Node::Branch { .. }) }

    pub fn fallback(&self) -> Option<&FallbackSpec> {
        match self {
            Node::Fallback(spec) => Some(spec),
            _ => None,
        }
    }

    /// The attached window of a leaf. `None` for unattached leaves and every
    /// other variant.
    pub fn handle(&self) -> Option<WindowHandle> {
        match self {
            Node::Leaf { handle } => *handle,
            _ => None,
        }
    }

    pub fn branch_kind(&self) -> Option<BranchKind> {
        match self {
            Node::Branch { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    pub fn children(&self) -> Option<&[BranchChild]> {
        match self {
            Node::Branch { children, .. } => Some(children),
            _ => None,
        }
    }

    pub fn collect_handles(&self, out: &mut Vec<WindowHandle>) {
        match self {
            Node::Leaf { handle: Some(handle) } => out.push(*handle),
            Node::Branch { children, .. } => {
                for child in by_priority(children) {
                    child.node.collect_handles(out);
                }
            }
            _ => {}
        }
    }

    /// All attached window handles under this node, in rendering order.
    pub fn handles(&self) -> Vec<WindowHandle> {
        let mut out = Vec::new();
        self.collect_handles(&mut out);
        out
    }

    pub fn contains_handle(&self, handle: WindowHandle) -> bool {
        match self {
            Node::Leaf { handle: Some(h) } => *h == handle,
            Node::Branch { children, .. } => {
                children.iter().any(|child| child.node.contains_handle(handle))
            }
            _ => false,
        }
    }

    pub fn window_count(&self) -> usize {
        match self {
            Node::Leaf { handle: Some(_) } => 1,
            Node::Branch { children, .. } => {
                children.iter().map(|child| child.node.window_count()).sum()
            }
            _ => 0,
        }
    }

    pub fn draw_tree(&self) -> String {
        fn to_ascii(node: &Node) -> ascii_tree::Tree {
            match node {
                Node::Empty => ascii_tree::Tree::Leaf(vec!["(empty)".to_string()]),
                Node::Fallback(spec) => ascii_tree::Tree::Leaf(vec![format!(
                    "fallback {}",
                    spec.label.as_deref().or(spec.icon.as_deref()).unwrap_or("-")
                )]),
                Node::Leaf { handle: Some(handle) } => {
                    ascii_tree::Tree::Leaf(vec![format!("window {:?}", handle)])
                }
                Node::Leaf { handle: None } => {
                    ascii_tree::Tree::Leaf(vec!["(unattached)".to_string()])
                }
                Node::Branch { kind, children } => ascii_tree::Tree::Node(
                    format!("{:?}", kind),
                    by_priority(children)
                        .into_iter()
                        .map(|child| to_ascii(&child.node))
                        .collect(),
                ),
            }
        }

        let mut out = String::new();
        let _ = ascii_tree::write_tree(&mut out, &to_ascii(self));
        out
    }
}
