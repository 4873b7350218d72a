use ahash::HashSet;

use super::tree::{DockNode, DockTree, NodeId};
use crate::panel::PanelId;

/// Structural problems in the tree reachable from `root`. Empty when the tree is sound.
///
/// Checks that every reachable node exists and is reached once, that zones hold no tombstones
/// and a valid active tab, that no panel is docked twice, that split amounts are usable, that
/// exactly one keep-around zone exists, and that the arena holds no unreachable nodes.
pub fn tree_integrity_issues(tree: &DockTree, root: NodeId) -> Vec<String> {
    let mut issues: Vec<String> = Vec::new();

    if tree.get(root).is_none() {
        issues.push(format!("integrity: root {root:?} missing"));
        return issues;
    }

    let mut visited: HashSet<NodeId> = HashSet::default();
    let mut docked: HashSet<PanelId> = HashSet::default();
    let mut keep_arounds = 0;
    let mut stack: Vec<NodeId> = vec![root];

    while let Some(id) = stack.pop() {
        if !visited.insert(id) {
            issues.push(format!("integrity: node {id:?} reached more than once"));
            continue;
        }

        let Some(node) = tree.get(id) else {
            issues.push(format!("integrity: missing node {id:?} (reachable)"));
            continue;
        };

        match node {
            DockNode::Zone(zone) | DockNode::KeepAround { zone, .. } => {
                if node.is_keep_around() {
                    keep_arounds += 1;
                } else if zone.is_empty() && id != root {
                    issues.push(format!("integrity: empty zone {id:?} below the root"));
                }

                if zone.slots().iter().any(Option::is_none) {
                    issues.push(format!(
                        "integrity: zone {id:?} holds tombstones {:?}",
                        zone.slots()
                    ));
                }
                if !zone.is_empty() && zone.active_index() >= zone.slots().len() {
                    issues.push(format!(
                        "integrity: zone {id:?} active {} out of range (len {})",
                        zone.active_index(),
                        zone.slots().len()
                    ));
                }
                for panel in zone.panels() {
                    if !docked.insert(panel) {
                        issues.push(format!("integrity: panel {panel:?} docked more than once"));
                    }
                }
            }
            DockNode::HSplit(split) | DockNode::VSplit(split) => {
                if !split.amount.is_finite() || split.amount < 0.0 {
                    issues.push(format!(
                        "integrity: split {id:?} has invalid amount {}",
                        split.amount
                    ));
                }
                if split.first == split.second {
                    issues.push(format!(
                        "integrity: split {id:?} uses {:?} for both children",
                        split.first
                    ));
                }
                stack.push(split.second);
                stack.push(split.first);
            }
        }
    }

    if keep_arounds != 1 {
        issues.push(format!(
            "integrity: expected one keep-around zone, found {keep_arounds}"
        ));
    }

    let total = tree.len();
    let reachable = tree.node_ids().filter(|id| visited.contains(id)).count();
    if reachable != total {
        issues.push(format!(
            "integrity: unreachable nodes {} of {}",
            total - reachable,
            total
        ));
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dock::{Magnet, Split, Zone};

    fn p(raw: u64) -> PanelId {
        PanelId::from_raw(raw)
    }

    #[test]
    fn fresh_documents_root_is_sound() {
        let mut tree = DockTree::new();
        let root = tree.insert(DockNode::keep_around("Documents"));
        assert!(tree_integrity_issues(&tree, root).is_empty());
    }

    #[test]
    fn reports_duplicates_tombstones_and_leaks() {
        let mut tree = DockTree::new();
        let docs = tree.insert(DockNode::KeepAround {
            zone: Zone::new(vec![p(1)], 0),
            placeholder: String::new(),
        });
        let mut zone = Zone::new(vec![p(1), p(2)], 0);
        zone.tombstone(p(2));
        let side = tree.insert(DockNode::Zone(zone));
        let root = tree.insert(DockNode::HSplit(Split::new(docs, side, 0.5, Magnet::Middle)));
        let _leak = tree.insert(DockNode::Zone(Zone::with_panel(p(9))));

        let issues = tree_integrity_issues(&tree, root);
        assert!(issues.iter().any(|i| i.contains("docked more than once")), "{issues:?}");
        assert!(issues.iter().any(|i| i.contains("tombstones")), "{issues:?}");
        assert!(issues.iter().any(|i| i.contains("unreachable nodes 1 of 4")), "{issues:?}");
    }

    #[test]
    fn reports_missing_children_and_keep_around_count() {
        let mut tree = DockTree::new();
        let zone = tree.insert(DockNode::Zone(Zone::with_panel(p(1))));
        let root = tree.insert(DockNode::VSplit(Split::new(
            zone,
            NodeId::from_raw(99),
            f32::NAN,
            Magnet::Middle,
        )));

        let issues = tree_integrity_issues(&tree, root);
        assert!(issues.iter().any(|i| i.contains("missing node")), "{issues:?}");
        assert!(issues.iter().any(|i| i.contains("invalid amount")), "{issues:?}");
        assert!(issues.iter().any(|i| i.contains("found 0")), "{issues:?}");
    }
}
