//! Turns a layout tree into the nested unit tree handed to the presentation
//! layer. Traversal is a pure function of the tree; the shell keys its output
//! on [`RenderKey`](crate::model::workspace::RenderKey) and redraws from the
//! root whenever the key changes instead of diffing, because patching around
//! stale native handles is worse than a full redraw.

use serde::Serialize;

use crate::model::tree::{BranchKind, FallbackSpec, Node, WindowHandle, by_priority};

/// One element of the composed output. Units form a tree isomorphic to the
/// non-empty, attached subset of the source nodes, siblings in ascending
/// priority order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "unit", rename_all = "snake_case")]
pub enum RenderedUnit {
    Fallback(FallbackSpec),
    Window { handle: WindowHandle },
    Container {
        kind: BranchKind,
        contents: Vec<RenderedUnit>,
    },
}

/// Composes `node` depth-first, pre-order. Returns `None` for nodes with
/// nothing to show: `Empty`, and leaves whose window has not attached.
///
/// Branch children that compose to nothing are omitted from the container
/// without leaving gaps; a branch with no renderable children still yields
/// an (empty) container.
pub fn render(node: &Node) -> Option<RenderedUnit> {
    match node {
        Node::Empty => None,
        Node::Fallback(spec) => Some(RenderedUnit::Fallback(spec.clone())),
        Node::Leaf { handle: Some(handle) } => {
            Some(RenderedUnit::Window { handle: *handle })
        }
        Node::Leaf { handle: None } => None,
        Node::Branch { kind, children } => Some(RenderedUnit::Container {
            kind: *kind,
            contents: by_priority(children)
                .into_iter()
                .filter_map(|child| render(&child.node))
                .collect(),
        }),
    }
}

/// Visits every node depth-first, pre-order, branch children in ascending
/// priority order. The callback receives each node with its depth from the
/// root. Unlike [`render`] this does not skip empty or unattached nodes;
/// classification is the visitor's business.
pub fn walk(node: &Node, visit: &mut dyn FnMut(&Node, usize)) {
    fn walk_at(node: &Node, depth: usize, visit: &mut dyn FnMut(&Node, usize)) {
        visit(node, depth);
        if let Node::Branch { children, .. } = node {
            for child in by_priority(children) {
                walk_at(&child.node, depth + 1, visit);
            }
        }
    }
    walk_at(node, 0, visit)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::tree::BranchChild;

    fn stack_with_one_window() -> Node {
        Node::Branch {
            kind: BranchKind::Stack,
            children: vec![
                BranchChild::new(0, Node::leaf(Some(WindowHandle(1)))),
                BranchChild::new(1, Node::Empty),
            ],
        }
    }

    #[test]
    fn empty_root_renders_nothing() {
        assert_eq!(render(&Node::Empty), None);
    }

    #[test]
    fn unattached_leaf_renders_nothing_but_stays_a_leaf() {
        let leaf = Node::leaf(None);
        assert_eq!(render(&leaf), None);
        // Same observable output as Empty, still distinguishable on inspection.
        assert!(leaf.is_leaf());
        assert!(!leaf.is_empty());
    }

    #[test]
    fn fallback_renders_its_payload() {
        let spec = FallbackSpec {
            icon: Some("missing-app".to_string()),
            label: Some("No window".to_string()),
        };
        assert_eq!(
            render(&Node::Fallback(spec.clone())),
            Some(RenderedUnit::Fallback(spec))
        );
    }

    #[test]
    fn stack_with_an_empty_child_yields_a_one_child_container() {
        assert_eq!(
            render(&stack_with_one_window()),
            Some(RenderedUnit::Container {
                kind: BranchKind::Stack,
                contents: vec![RenderedUnit::Window { handle: WindowHandle(1) }],
            })
        );
    }

    #[test]
    fn branch_with_no_renderable_children_yields_an_empty_container() {
        let branch = Node::Branch {
            kind: BranchKind::Horizontal,
            children: vec![
                BranchChild::new(0, Node::Empty),
                BranchChild::new(1, Node::leaf(None)),
            ],
        };
        assert_eq!(
            render(&branch),
            Some(RenderedUnit::Container {
                kind: BranchKind::Horizontal,
                contents: vec![],
            })
        );
    }

    #[test]
    fn children_compose_in_ascending_priority_order() {
        let branch = Node::Branch {
            kind: BranchKind::Horizontal,
            children: vec![
                BranchChild::new(3, Node::leaf(Some(WindowHandle(30)))),
                BranchChild::new(1, Node::leaf(Some(WindowHandle(10)))),
                BranchChild::new(2, Node::leaf(Some(WindowHandle(20)))),
            ],
        };
        assert_eq!(
            render(&branch),
            Some(RenderedUnit::Container {
                kind: BranchKind::Horizontal,
                contents: vec![
                    RenderedUnit::Window { handle: WindowHandle(10) },
                    RenderedUnit::Window { handle: WindowHandle(20) },
                    RenderedUnit::Window { handle: WindowHandle(30) },
                ],
            })
        );
    }

    #[test]
    fn nested_branches_compose_recursively() {
        let tree = Node::Branch {
            kind: BranchKind::Horizontal,
            children: vec![
                BranchChild::new(0, Node::leaf(Some(WindowHandle(1)))),
                BranchChild::new(1, Node::Branch {
                    kind: BranchKind::Vertical,
                    children: vec![
                        BranchChild::new(0, Node::leaf(None)),
                        BranchChild::new(1, Node::leaf(Some(WindowHandle(2)))),
                    ],
                }),
            ],
        };
        assert_eq!(
            render(&tree),
            Some(RenderedUnit::Container {
                kind: BranchKind::Horizontal,
                contents: vec![
                    RenderedUnit::Window { handle: WindowHandle(1) },
                    RenderedUnit::Container {
                        kind: BranchKind::Vertical,
                        contents: vec![RenderedUnit::Window { handle: WindowHandle(2) }],
                    },
                ],
            })
        );
    }

    #[test]
    fn units_serialize_for_the_presentation_layer() {
        let unit = render(&stack_with_one_window()).unwrap();
        assert_eq!(
            serde_json::to_value(&unit).unwrap(),
            serde_json::json!({
                "unit": "container",
                "kind": "stack",
                "contents": [
                    { "unit": "window", "handle": 1 },
                ],
            })
        );
    }

    #[test]
    fn rendering_is_idempotent() {
        let tree = stack_with_one_window();
        assert_eq!(render(&tree), render(&tree));
    }

    #[test]
    fn walk_visits_every_node_preorder() {
        let tree = Node::Branch {
            kind: BranchKind::Horizontal,
            children: vec![
                BranchChild::new(1, Node::Empty),
                BranchChild::new(0, Node::leaf(Some(WindowHandle(1)))),
            ],
        };
        let mut seen = Vec::new();
        walk(&tree, &mut |node, depth| {
            seen.push((depth, node.is_branch(), node.is_leaf(), node.is_empty()));
        });
        assert_eq!(seen, vec![
            (0, true, false, false),
            (1, false, true, false),
            (1, false, false, true),
        ]);
    }
}
