use crate::model::{Component, ComponentKind, ScannedModule};
use petgraph::{graph::NodeIndex, Directed, Direction, Graph};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};

pub type DependencyGraph = Graph<Node, Edge, Directed>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub name: String,
    pub node_type: NodeType,
    pub kind: Option<ComponentKind>,
    pub file_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeType {
    Module,
    Component,
    /// A dependency type that no scanned module registers
    External,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    pub edge_type: EdgeType,
    /// Constructor parameter position, for `DependsOn` edges
    pub position: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EdgeType {
    /// module → component it registers
    Provides,
    /// component → constructor dependency
    DependsOn,
}

pub struct GraphBuilder {
    graph: DependencyGraph,
    node_map: HashMap<String, NodeIndex>,
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self {
            graph: Graph::new(),
            node_map: HashMap::new(),
        }
    }

    /// Components are keyed by class name, so a class registered by two
    /// modules is a single node with two `Provides` edges. Every module is
    /// added before any dependency edge, so registration order across files
    /// does not decide whether a dependency counts as external.
    pub fn build_graph(&mut self, modules: &[ScannedModule]) -> &DependencyGraph {
        for scanned in modules {
            self.add_module(scanned);
        }

        let mut wired = HashSet::new();
        for scanned in modules {
            for component in scanned.module.components() {
                if wired.insert(component.name()) {
                    self.add_dependencies(component);
                }
            }
        }

        &self.graph
    }

    fn add_module(&mut self, scanned: &ScannedModule) {
        let module_id = format!("module:{}:{}", scanned.path.display(), scanned.module.name());
        let module_node = self.graph.add_node(Node {
            id: module_id.clone(),
            name: scanned.module.name().to_string(),
            node_type: NodeType::Module,
            kind: None,
            file_path: Some(scanned.path.clone()),
        });
        self.node_map.insert(module_id, module_node);

        for component in scanned.module.components() {
            let component_node = self.component_node(component, &scanned.path);
            self.graph.add_edge(
                module_node,
                component_node,
                Edge {
                    edge_type: EdgeType::Provides,
                    position: None,
                },
            );
        }
    }

    fn component_node(&mut self, component: &Component, path: &Path) -> NodeIndex {
        let id = component_id(component.name());
        if let Some(&index) = self.node_map.get(&id) {
            return index;
        }

        let index = self.graph.add_node(Node {
            id: id.clone(),
            name: component.name().to_string(),
            node_type: NodeType::Component,
            kind: Some(component.kind()),
            file_path: Some(path.to_path_buf()),
        });
        self.node_map.insert(id, index);
        index
    }

    fn add_dependencies(&mut self, component: &Component) {
        let Some(&from) = self.node_map.get(&component_id(component.name())) else {
            return;
        };

        for (position, dependency) in component.dependencies().iter().enumerate() {
            let to = self.dependency_node(dependency);
            self.graph.add_edge(
                from,
                to,
                Edge {
                    edge_type: EdgeType::DependsOn,
                    position: Some(position),
                },
            );
        }
    }

    fn dependency_node(&mut self, type_name: &str) -> NodeIndex {
        let id = component_id(type_name);
        if let Some(&index) = self.node_map.get(&id) {
            return index;
        }

        let index = self.graph.add_node(Node {
            id: id.clone(),
            name: type_name.to_string(),
            node_type: NodeType::External,
            kind: None,
            file_path: None,
        });
        self.node_map.insert(id, index);
        index
    }

    pub fn get_graph(&self) -> &DependencyGraph {
        &self.graph
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.node_map.get(id).map(|&index| &self.graph[index])
    }

    pub fn analyze_dependencies(&self) -> DependencyAnalysis {
        let mut component_kinds = BTreeMap::new();
        let mut total_modules = 0;
        let mut total_components = 0;
        let mut external_dependencies = Vec::new();
        let mut dependents: Vec<(String, usize)> = Vec::new();

        for index in self.graph.node_indices() {
            let node = &self.graph[index];
            match node.node_type {
                NodeType::Module => total_modules += 1,
                NodeType::Component => {
                    total_components += 1;
                    if let Some(kind) = node.kind {
                        *component_kinds.entry(kind.to_string()).or_insert(0) += 1;
                    }
                }
                NodeType::External => external_dependencies.push(node.name.clone()),
            }

            let incoming = self
                .graph
                .edges_directed(index, Direction::Incoming)
                .filter(|edge| edge.weight().edge_type == EdgeType::DependsOn)
                .count();
            if incoming > 0 {
                dependents.push((node.name.clone(), incoming));
            }
        }

        external_dependencies.sort();
        dependents.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        dependents.truncate(5);

        let dependency_edges = self
            .graph
            .edge_weights()
            .filter(|edge| edge.edge_type == EdgeType::DependsOn)
            .count();

        DependencyAnalysis {
            total_nodes: self.graph.node_count(),
            total_edges: self.graph.edge_count(),
            total_modules,
            total_components,
            dependency_edges,
            component_kinds,
            external_dependencies,
            most_depended_upon: dependents,
            avg_dependencies: if total_components > 0 {
                dependency_edges as f64 / total_components as f64
            } else {
                0.0
            },
        }
    }
}

fn component_id(name: &str) -> String {
    format!("type:{}", name)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DependencyAnalysis {
    pub total_nodes: usize,
    pub total_edges: usize,
    pub total_modules: usize,
    pub total_components: usize,
    pub dependency_edges: usize,
    pub component_kinds: BTreeMap<String, usize>,
    pub external_dependencies: Vec<String>,
    pub most_depended_upon: Vec<(String, usize)>,
    pub avg_dependencies: f64,
}

impl DependencyAnalysis {
    pub fn print_summary(&self) {
        println!("Dependency Graph Analysis:");
        println!("  Modules: {}", self.total_modules);
        println!("  Components: {}", self.total_components);
        println!("  Dependency edges: {}", self.dependency_edges);
        println!("  Average dependencies per component: {:.2}", self.avg_dependencies);

        println!("  Component kinds:");
        for (kind, count) in &self.component_kinds {
            println!("    {}: {}", kind, count);
        }

        if !self.most_depended_upon.is_empty() {
            println!("  Most depended upon:");
            for (name, count) in &self.most_depended_upon {
                println!("    {}: {}", name, count);
            }
        }

        if !self.external_dependencies.is_empty() {
            println!("  Not registered in any module: {}", self.external_dependencies.join(", "));
        }
    }
}
