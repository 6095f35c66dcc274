use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::ids::mint_unique_id;
use super::legend::{find_entry, LegendEntry};
use super::node::Node;
use super::tree;
use crate::error::Result;

/// The whole document: one undeletable root, a legend, and a title.
///
/// This is the only state that is ever persisted; everything in the scene
/// graph is derived from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Architecture {
    pub root: Node,
    #[serde(default)]
    pub legend: Vec<LegendEntry>,
    #[serde(default)]
    pub title: String,
}

impl Architecture {
    /// Default title shown when an archive carries none
    pub const DEFAULT_TITLE: &'static str = "ARCHITECTURE VISUALIZATION";

    /// Create an architecture around `root` with an empty legend
    pub fn new(root: Node) -> Self {
        Self {
            root,
            legend: Vec::new(),
            title: Self::DEFAULT_TITLE.to_string(),
        }
    }

    /// A lone root node at the origin
    pub fn empty() -> Self {
        Self::new(Node::new("root", [0.0, 0.0, 0.0]))
    }

    /// Parse an archive in the persisted JSON shape
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Serialize to the persisted JSON shape
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Post-load reconciliation: unique ids for nodes and legend entries,
    /// then legend color mapping. Safe to run more than once.
    pub fn normalize(&mut self) {
        let reminted = tree::dedupe_ids(&mut self.root);
        let minted = tree::assign_ids(&mut self.root);

        let mut legend_ids: HashSet<String> = self
            .legend
            .iter()
            .filter(|entry| !entry.id.is_empty())
            .map(|entry| entry.id.clone())
            .collect();
        for entry in self.legend.iter_mut().filter(|entry| entry.id.is_empty()) {
            entry.id = mint_unique_id(&mut legend_ids);
        }

        tree::map_colors_to_legend(&mut self.root, &self.legend);

        if minted > 0 {
            log::debug!("Assigned {} missing node ids", minted);
        }
        if reminted > 0 {
            log::warn!("Reassigned {} duplicate node ids", reminted);
        }
    }

    pub fn find(&self, id: &str) -> Option<&Node> {
        tree::find_by_id(&self.root, id)
    }

    pub fn find_mut(&mut self, id: &str) -> Option<&mut Node> {
        tree::find_by_id_mut(&mut self.root, id)
    }

    pub fn parent_of(&self, id: &str) -> Option<&Node> {
        tree::find_parent(&self.root, id)
    }

    /// Resolved display color of `node`
    pub fn color_of<'a>(&'a self, node: &'a Node) -> &'a str {
        tree::get_color(node, &self.legend)
    }

    /// Resolved display color of `node`, falling back to `default`
    pub fn color_of_or<'a>(&'a self, node: &'a Node, default: &'a str) -> &'a str {
        tree::get_color_or(node, &self.legend, default)
    }

    pub fn legend_entry(&self, id: &str) -> Option<&LegendEntry> {
        find_entry(&self.legend, id)
    }

    pub fn legend_entry_mut(&mut self, id: &str) -> Option<&mut LegendEntry> {
        self.legend.iter_mut().find(|entry| entry.id == id)
    }

    /// Every node id currently in the tree
    pub fn node_ids(&self) -> HashSet<String> {
        tree::collect_ids(&self.root)
    }

    /// Number of nodes in the tree
    pub fn node_count(&self) -> usize {
        self.root.subtree_len()
    }

    /// The built-in microservices example: a root, three modules, and two
    /// components under each module.
    pub fn sample() -> Self {
        let component = |name: &str, pos: [f32; 3]| {
            Node::new(name, pos).with_color("#ffff00").with_scale(0.6)
        };

        let root = Node::new("ROOT", [0.0, 0.0, 0.0])
            .with_child(
                Node::new("API Gateway", [10.0, 5.0, 0.0])
                    .with_color("#ff00ff")
                    .with_scale(0.8)
                    .with_child(component("Auth Service", [15.0, 8.0, 5.0]))
                    .with_child(component("Rate Limiter", [15.0, 8.0, -5.0])),
            )
            .with_child(
                Node::new("Database Layer", [-10.0, 5.0, 0.0])
                    .with_color("#00ff00")
                    .with_scale(0.8)
                    .with_child(component("Primary DB", [-15.0, 8.0, 5.0]))
                    .with_child(component("Cache", [-15.0, 8.0, -5.0])),
            )
            .with_child(
                Node::new("Workers", [0.0, -5.0, 10.0])
                    .with_color("#ff6600")
                    .with_scale(0.8)
                    .with_child(component("Job Queue", [5.0, -8.0, 15.0]))
                    .with_child(component("Worker Pool", [-5.0, -8.0, 15.0])),
            );

        Self {
            root,
            legend: vec![
                LegendEntry::new("legend-core", "Core Services", "#00ffff"),
                LegendEntry::new("legend-modules", "Modules", "#ff00ff"),
                LegendEntry::new("legend-components", "Components", "#ffff00"),
                LegendEntry::new("legend-data", "Data Layer", "#00ff00"),
            ],
            title: "MICROSERVICES ARCHITECTURE".to_string(),
        }
    }
}

impl Default for Architecture {
    fn default() -> Self {
        Self::empty()
    }
}
