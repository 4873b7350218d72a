use ahash::HashSet;

use super::geometry::{Magnet, SplitAxis};
use super::tree::{Clean, DockNode, DockTree, NodeId, Split};
use super::zone::Zone;
use crate::panel::PanelId;

pub const LAYOUT_SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug)]
pub enum LayoutSnapshotError {
    UnsupportedVersion { found: u32, expected: u32 },

    /// A node index that is out of range or referenced twice.
    InvalidNode { index: usize },

    MissingDocuments,
    DuplicateDocuments,
    RonSerialize(ron::Error),
    RonDeserialize(ron::error::SpannedError),
}

impl std::fmt::Display for LayoutSnapshotError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedVersion { found, expected } => {
                write!(
                    f,
                    "unsupported layout snapshot version: {found} (expected {expected})"
                )
            }
            Self::InvalidNode { index } => write!(f, "invalid node reference: {index}"),
            Self::MissingDocuments => write!(f, "layout has no documents zone"),
            Self::DuplicateDocuments => write!(f, "layout has more than one documents zone"),
            Self::RonSerialize(err) => write!(f, "ron serialize error: {err}"),
            Self::RonDeserialize(err) => write!(f, "ron deserialize error: {err}"),
        }
    }
}

impl std::error::Error for LayoutSnapshotError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::UnsupportedVersion { .. }
            | Self::InvalidNode { .. }
            | Self::MissingDocuments
            | Self::DuplicateDocuments => None,
            Self::RonSerialize(err) => Some(err),
            Self::RonDeserialize(err) => Some(err),
        }
    }
}

impl From<ron::Error> for LayoutSnapshotError {
    fn from(err: ron::Error) -> Self {
        Self::RonSerialize(err)
    }
}

impl From<ron::error::SpannedError> for LayoutSnapshotError {
    fn from(err: ron::error::SpannedError) -> Self {
        Self::RonDeserialize(err)
    }
}

/// Serializable form of a dock layout, keyed by [`PanelId`].
///
/// Nodes are stored flat; splits refer to their children by index into `nodes`.
#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct LayoutSnapshot {
    pub version: u32,
    pub root: usize,
    pub nodes: Vec<NodeSnapshot>,
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
pub enum NodeSnapshot {
    Zone {
        panels: Vec<PanelId>,
        active: usize,
    },
    Documents {
        placeholder: String,
        panels: Vec<PanelId>,
        active: usize,
    },
    HSplit {
        first: usize,
        second: usize,
        amount: f32,
        magnet: Magnet,
    },
    VSplit {
        first: usize,
        second: usize,
        amount: f32,
        magnet: Magnet,
    },
}

/// A tree rebuilt from a snapshot, already cleaned.
#[derive(Debug)]
pub(crate) struct RestoredLayout {
    pub tree: DockTree,
    pub root: NodeId,
    pub documents: NodeId,
}

impl LayoutSnapshot {
    pub fn capture(tree: &DockTree, root: NodeId) -> Self {
        fn live_active(zone: &Zone) -> usize {
            let active = zone.active_panel();
            zone.panels()
                .position(|p| Some(p) == active)
                .unwrap_or_default()
        }

        fn capture_node(tree: &DockTree, id: NodeId, nodes: &mut Vec<NodeSnapshot>) -> usize {
            // Reserve the slot first so children land after their parent.
            let index = nodes.len();
            nodes.push(NodeSnapshot::Zone {
                panels: Vec::new(),
                active: 0,
            });

            let node = match tree.get(id) {
                None => return index,
                Some(DockNode::Zone(zone)) => NodeSnapshot::Zone {
                    panels: zone.panels().collect(),
                    active: live_active(zone),
                },
                Some(DockNode::KeepAround { zone, placeholder }) => NodeSnapshot::Documents {
                    placeholder: placeholder.clone(),
                    panels: zone.panels().collect(),
                    active: live_active(zone),
                },
                Some(DockNode::HSplit(split)) => NodeSnapshot::HSplit {
                    first: capture_node(tree, split.first, nodes),
                    second: capture_node(tree, split.second, nodes),
                    amount: split.amount,
                    magnet: split.magnet,
                },
                Some(DockNode::VSplit(split)) => NodeSnapshot::VSplit {
                    first: capture_node(tree, split.first, nodes),
                    second: capture_node(tree, split.second, nodes),
                    amount: split.amount,
                    magnet: split.magnet,
                },
            };

            nodes[index] = node;
            index
        }

        let mut nodes = Vec::new();
        let root = capture_node(tree, root, &mut nodes);
        Self {
            version: LAYOUT_SNAPSHOT_VERSION,
            root,
            nodes,
        }
    }

    /// # Errors
    /// Fails if RON serialization fails.
    pub fn to_ron_string(&self) -> Result<String, LayoutSnapshotError> {
        Ok(ron::ser::to_string_pretty(
            self,
            ron::ser::PrettyConfig::default(),
        )?)
    }

    /// # Errors
    /// Fails on malformed RON or an unsupported snapshot version.
    pub fn from_ron_str(s: &str) -> Result<Self, LayoutSnapshotError> {
        let snapshot: Self = ron::from_str(s)?;
        snapshot.check_version()?;
        Ok(snapshot)
    }

    fn check_version(&self) -> Result<(), LayoutSnapshotError> {
        if self.version == LAYOUT_SNAPSHOT_VERSION {
            Ok(())
        } else {
            Err(LayoutSnapshotError::UnsupportedVersion {
                found: self.version,
                expected: LAYOUT_SNAPSHOT_VERSION,
            })
        }
    }

    /// Rebuild the tree, keeping only panels accepted by `keep`. A panel listed twice keeps
    /// its first position.
    pub(crate) fn build(
        &self,
        keep: impl Fn(PanelId) -> bool,
    ) -> Result<RestoredLayout, LayoutSnapshotError> {
        self.check_version()?;

        let mut builder = Builder {
            snapshot: self,
            tree: DockTree::new(),
            used: vec![false; self.nodes.len()],
            seen: HashSet::default(),
            documents: None,
            keep: &keep,
        };
        let root = builder.build_node(self.root)?;
        let documents = builder
            .documents
            .ok_or(LayoutSnapshotError::MissingDocuments)?;

        let mut tree = builder.tree;
        let root = match tree.clean(root) {
            Clean::Keep => root,
            Clean::Replace(replacement) => replacement,
            Clean::Null => return Err(LayoutSnapshotError::MissingDocuments),
        };

        Ok(RestoredLayout {
            tree,
            root,
            documents,
        })
    }
}

struct Builder<'a> {
    snapshot: &'a LayoutSnapshot,
    tree: DockTree,
    used: Vec<bool>,
    seen: HashSet<PanelId>,
    documents: Option<NodeId>,
    keep: &'a dyn Fn(PanelId) -> bool,
}

impl Builder<'_> {
    fn build_node(&mut self, index: usize) -> Result<NodeId, LayoutSnapshotError> {
        let snapshot = self.snapshot;
        let node = snapshot
            .nodes
            .get(index)
            .ok_or(LayoutSnapshotError::InvalidNode { index })?;
        if std::mem::replace(&mut self.used[index], true) {
            return Err(LayoutSnapshotError::InvalidNode { index });
        }

        let id = match node {
            NodeSnapshot::Zone { panels, active } => {
                let zone = self.zone(panels, *active);
                self.tree.insert(DockNode::Zone(zone))
            }
            NodeSnapshot::Documents {
                placeholder,
                panels,
                active,
            } => {
                if self.documents.is_some() {
                    return Err(LayoutSnapshotError::DuplicateDocuments);
                }
                let zone = self.zone(panels, *active);
                let id = self.tree.insert(DockNode::KeepAround {
                    zone,
                    placeholder: placeholder.clone(),
                });
                self.documents = Some(id);
                id
            }
            NodeSnapshot::HSplit {
                first,
                second,
                amount,
                magnet,
            } => self.split(SplitAxis::Horizontal, *first, *second, *amount, *magnet)?,
            NodeSnapshot::VSplit {
                first,
                second,
                amount,
                magnet,
            } => self.split(SplitAxis::Vertical, *first, *second, *amount, *magnet)?,
        };
        Ok(id)
    }

    fn split(
        &mut self,
        axis: SplitAxis,
        first: usize,
        second: usize,
        amount: f32,
        magnet: Magnet,
    ) -> Result<NodeId, LayoutSnapshotError> {
        let first = self.build_node(first)?;
        let second = self.build_node(second)?;
        let (amount, magnet) = if amount.is_finite() && amount >= 0.0 {
            (amount, magnet)
        } else {
            log::warn!("restoring split with invalid amount {amount}; using a half split");
            (0.5, Magnet::Middle)
        };
        Ok(self
            .tree
            .insert(DockNode::split(axis, Split::new(first, second, amount, magnet))))
    }

    /// Unknown and repeated panels become tombstones, dropped by the final clean.
    fn zone(&mut self, panels: &[PanelId], active: usize) -> Zone {
        let slots = panels
            .iter()
            .map(|&panel| ((self.keep)(panel) && self.seen.insert(panel)).then_some(panel))
            .collect();
        Zone::from_slots(slots, active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(raw: u64) -> PanelId {
        PanelId::from_raw(raw)
    }

    fn sample() -> LayoutSnapshot {
        LayoutSnapshot {
            version: LAYOUT_SNAPSHOT_VERSION,
            root: 0,
            nodes: vec![
                NodeSnapshot::HSplit {
                    first: 1,
                    second: 2,
                    amount: 300.0,
                    magnet: Magnet::RIGHT,
                },
                NodeSnapshot::Documents {
                    placeholder: "Documents View".to_owned(),
                    panels: vec![p(1), p(2)],
                    active: 1,
                },
                NodeSnapshot::Zone {
                    panels: vec![p(3)],
                    active: 0,
                },
            ],
        }
    }

    #[test]
    fn ron_round_trip() {
        let snapshot = sample();
        let text = snapshot.to_ron_string().unwrap_or_default();
        assert!(text.contains("Documents"), "{text}");
        let back = LayoutSnapshot::from_ron_str(&text);
        assert_eq!(back.ok(), Some(snapshot));
    }

    #[test]
    fn json_round_trip() {
        let snapshot = sample();
        let json = serde_json::to_string(&snapshot).unwrap_or_default();
        let back: Option<LayoutSnapshot> = serde_json::from_str(&json).ok();
        assert_eq!(back, Some(snapshot));
    }

    #[test]
    fn rejects_other_versions() {
        let mut snapshot = sample();
        snapshot.version = 99;
        let text = snapshot.to_ron_string().unwrap_or_default();
        assert!(matches!(
            LayoutSnapshot::from_ron_str(&text),
            Err(LayoutSnapshotError::UnsupportedVersion { found: 99, .. })
        ));
    }

    #[test]
    fn build_then_capture_is_stable() {
        let snapshot = sample();
        let restored = snapshot.build(|_| true);
        let Ok(restored) = restored else {
            panic!("build failed: {restored:?}");
        };
        assert_eq!(LayoutSnapshot::capture(&restored.tree, restored.root), snapshot);
        assert_eq!(
            restored.tree.find(restored.root, p(2)),
            Some((restored.documents, 1))
        );
    }

    #[test]
    fn unknown_panels_are_dropped_and_empty_zones_collapse() {
        let restored = sample().build(|panel| panel != p(3));
        let Ok(restored) = restored else {
            panic!("build failed: {restored:?}");
        };
        assert_eq!(restored.root, restored.documents);
        assert_eq!(restored.tree.len(), 1);
        assert_eq!(restored.tree.describe(restored.root), "Docs[1,2]*1");
    }

    #[test]
    fn dropping_the_active_panel_keeps_a_valid_active_tab() {
        let restored = sample().build(|panel| panel != p(2));
        let Ok(restored) = restored else {
            panic!("build failed: {restored:?}");
        };
        let docs = restored.tree.zone(restored.documents);
        assert_eq!(docs.and_then(Zone::active_panel), Some(p(1)));
    }

    #[test]
    fn structural_errors() {
        let mut snapshot = sample();
        snapshot.nodes[1] = NodeSnapshot::Zone {
            panels: vec![p(1)],
            active: 0,
        };
        assert!(matches!(
            snapshot.build(|_| true),
            Err(LayoutSnapshotError::MissingDocuments)
        ));

        let mut snapshot = sample();
        snapshot.nodes[0] = NodeSnapshot::VSplit {
            first: 1,
            second: 1,
            amount: 0.5,
            magnet: Magnet::Middle,
        };
        assert!(matches!(
            snapshot.build(|_| true),
            Err(LayoutSnapshotError::InvalidNode { index: 1 })
        ));

        let mut snapshot = sample();
        snapshot.root = 7;
        assert!(matches!(
            snapshot.build(|_| true),
            Err(LayoutSnapshotError::InvalidNode { index: 7 })
        ));
    }
}
