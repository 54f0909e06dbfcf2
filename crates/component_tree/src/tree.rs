use std::path::Path;

use ahash::AHashSet;
use path_slash::PathExt;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    parse::RouteDeclaration,
    registry::{ComponentRecord, ComponentRegistry},
};

/// Where the components used by an expanded component are attached
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum AttachMode {
    /// Under the node of the component that uses them
    #[default]
    CurrentNode,
    /// Under the node where expansion started, flattening nested usages.
    /// Route nodes still start a new level.
    CallSite,
}

/// One node of the rendered component tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    pub name: String,
    pub children: Vec<TreeNode>,
    pub file: Option<String>,
    pub uses: Vec<String>,
    pub props: Vec<String>,
}

impl TreeNode {
    pub fn leaf(name: impl Into<String>, file: Option<&Path>) -> Self {
        Self {
            name: name.into(),
            children: vec![],
            file: file.map(slash_path),
            uses: vec![],
            props: vec![],
        }
    }

    fn for_record(record: &ComponentRecord) -> Self {
        Self {
            name: record.name.clone(),
            children: vec![],
            file: Some(slash_path(&record.defined_in)),
            uses: record.uses.clone(),
            props: record.props.clone(),
        }
    }

    /// Route labels carry the file, usages and props of the declaring component
    fn for_route(route: &RouteDeclaration, declared_by: &ComponentRecord) -> Self {
        Self {
            name: format!("Route: {}", route.path),
            children: vec![],
            file: Some(slash_path(&declared_by.defined_in)),
            uses: declared_by.uses.clone(),
            props: declared_by.props.clone(),
        }
    }

    /// Number of nodes in this subtree, including this one
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(TreeNode::node_count).sum::<usize>()
    }

    /// Finds the first node with the given name, depth first
    pub fn find(&self, name: &str) -> Option<&TreeNode> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(name))
    }

    pub fn child_names(&self) -> Vec<&str> {
        self.children.iter().map(|c| c.name.as_str()).collect()
    }
}

fn slash_path(path: &Path) -> String {
    path.to_slash_lossy().into_owned()
}

/// Expands a root chain into a tree over a registry.
///
/// Every name is expanded at most once per build. A usage cycle or a diamond
/// is cut at the second visit, so the tree never holds more component nodes
/// than the registry has records, plus unregistered chain elements.
pub struct TreeBuilder<'a> {
    registry: &'a ComponentRegistry,
    attach_mode: AttachMode,
    visited: AHashSet<String>,
}

impl<'a> TreeBuilder<'a> {
    pub fn new(registry: &'a ComponentRegistry, attach_mode: AttachMode) -> Self {
        Self {
            registry,
            attach_mode,
            visited: AHashSet::default(),
        }
    }

    /// Builds the tree for `root_chain`.
    ///
    /// Each chain element becomes the only child of the previous one, and only
    /// the last element is expanded. An empty chain produces a childless
    /// `default_root` node.
    pub fn build(
        mut self,
        root_chain: &[String],
        entry_file: Option<&Path>,
        default_root: &str,
    ) -> TreeNode {
        let mut chain_nodes: Vec<TreeNode> = Vec::with_capacity(root_chain.len());
        for name in root_chain {
            if !self.visited.insert(name.clone()) {
                continue;
            }
            let node = match self.registry.get(name) {
                Some(record) => TreeNode::for_record(record),
                None => TreeNode::leaf(name.clone(), None),
            };
            chain_nodes.push(node);
        }

        let Some(mut terminal) = chain_nodes.pop() else {
            return TreeNode::leaf(default_root, entry_file);
        };
        let terminal_name = terminal.name.clone();
        self.expand(&terminal_name, &mut terminal);

        let mut root = chain_nodes.into_iter().rev().fold(terminal, |child, mut parent| {
            parent.children.push(child);
            parent
        });
        if root.file.is_none() {
            root.file = entry_file.map(slash_path);
        }
        root
    }

    /// Claims `name` for this build, returning false if it was already expanded
    /// or is not a registered component.
    fn claim(&mut self, name: &str) -> bool {
        if self.visited.contains(name) || !self.registry.contains(name) {
            return false;
        }
        self.visited.insert(name.to_string());
        true
    }

    /// Attaches the routes and usages of `name` to `attach_to`.
    ///
    /// `name` must already be claimed.
    fn expand(&mut self, name: &str, attach_to: &mut TreeNode) {
        let registry = self.registry;
        let Some(record) = registry.get(name) else {
            return;
        };

        for route in record.routes.iter() {
            if !self.claim(&route.component) {
                continue;
            }
            let Some(target_record) = registry.get(&route.component) else {
                continue;
            };
            let mut route_node = TreeNode::for_route(route, record);
            let mut target = TreeNode::for_record(target_record);
            match self.attach_mode {
                AttachMode::CurrentNode => {
                    self.expand(&route.component, &mut target);
                    route_node.children.push(target);
                }
                AttachMode::CallSite => {
                    route_node.children.push(target);
                    self.expand(&route.component, &mut route_node);
                }
            }
            attach_to.children.push(route_node);
        }

        for used in record.uses.iter() {
            if used == name || !self.claim(used) {
                continue;
            }
            let Some(used_record) = registry.get(used) else {
                continue;
            };
            let mut child = TreeNode::for_record(used_record);
            match self.attach_mode {
                AttachMode::CurrentNode => {
                    self.expand(used, &mut child);
                    attach_to.children.push(child);
                }
                AttachMode::CallSite => {
                    attach_to.children.push(child);
                    self.expand(used, attach_to);
                }
            }
        }
    }
}
