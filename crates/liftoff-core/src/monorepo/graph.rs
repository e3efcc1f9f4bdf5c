//! Dependency graph for workspace packages

use std::collections::{HashMap, HashSet, VecDeque};

use crate::types::PackageInfo;

/// A node in the dependency graph
#[derive(Debug, Clone)]
pub struct PackageNode {
    /// Package name
    pub name: String,
    /// Packages this package depends on
    pub dependencies: Vec<String>,
    /// Packages that depend on this package
    pub dependents: Vec<String>,
}

/// Dependency graph for workspace packages
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    nodes: HashMap<String, PackageNode>,
    cycles: Vec<Vec<String>>,
}

impl DependencyGraph {
    /// Build a dependency graph from package descriptions
    ///
    /// Edges to names outside the workspace are ignored.
    pub fn build(packages: &[PackageInfo]) -> Self {
        let mut nodes: HashMap<String, PackageNode> = HashMap::new();

        for pkg in packages {
            nodes.insert(
                pkg.name.clone(),
                PackageNode {
                    name: pkg.name.clone(),
                    dependencies: pkg.dependencies.clone(),
                    dependents: Vec::new(),
                },
            );
        }

        for pkg in packages {
            for dep in &pkg.dependencies {
                if let Some(dep_node) = nodes.get_mut(dep) {
                    if !dep_node.dependents.contains(&pkg.name) {
                        dep_node.dependents.push(pkg.name.clone());
                    }
                }
            }
        }

        let cycles = Self::find_cycles(&nodes);

        Self { nodes, cycles }
    }

    /// Kahn's algorithm; nodes left over are part of a cycle
    fn find_cycles(nodes: &HashMap<String, PackageNode>) -> Vec<Vec<String>> {
        let mut in_degree: HashMap<&str, usize> = HashMap::new();
        let mut queue: VecDeque<&str> = VecDeque::new();
        let mut sorted: Vec<String> = Vec::new();

        let mut names: Vec<&String> = nodes.keys().collect();
        names.sort();

        for name in names {
            let node = &nodes[name];
            let degree = node
                .dependencies
                .iter()
                .filter(|d| nodes.contains_key(*d))
                .count();
            in_degree.insert(name.as_str(), degree);
            if degree == 0 {
                queue.push_back(name.as_str());
            }
        }

        while let Some(name) = queue.pop_front() {
            sorted.push(name.to_string());

            if let Some(node) = nodes.get(name) {
                for dependent in &node.dependents {
                    if let Some(degree) = in_degree.get_mut(dependent.as_str()) {
                        *degree = degree.saturating_sub(1);
                        if *degree == 0 {
                            queue.push_back(dependent.as_str());
                        }
                    }
                }
            }
        }

        let mut cycles = Vec::new();
        if sorted.len() != nodes.len() {
            let in_sorted: HashSet<&String> = sorted.iter().collect();
            let mut cyclic: Vec<String> = nodes
                .keys()
                .filter(|n| !in_sorted.contains(n))
                .cloned()
                .collect();
            cyclic.sort();
            cycles.push(cyclic);
        }

        cycles
    }

    /// Check if there are any circular dependencies
    pub fn has_cycles(&self) -> bool {
        !self.cycles.is_empty()
    }

    /// Packages caught in dependency cycles
    pub fn cycles(&self) -> &[Vec<String>] {
        &self.cycles
    }

    /// Direct dependents of a package
    pub fn get_dependents(&self, name: &str) -> HashSet<String> {
        self.nodes
            .get(name)
            .map(|n| n.dependents.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// All packages transitively affected by a change to the given package
    pub fn get_affected(&self, name: &str) -> HashSet<String> {
        let mut affected = HashSet::new();
        let mut queue: VecDeque<String> = VecDeque::new();
        queue.push_back(name.to_string());

        while let Some(current) = queue.pop_front() {
            if !affected.insert(current.clone()) {
                continue;
            }

            for dependent in self.get_dependents(&current) {
                if !affected.contains(&dependent) {
                    queue.push_back(dependent);
                }
            }
        }

        affected.remove(name);
        affected
    }
}
