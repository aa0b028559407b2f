//! Layout Service
//!
//! Computes 2D position hints for the nodes of a document graph, for a
//! canvas of a given size. Positions carry no graph semantics.
//!
//! Every method first produces raw coordinates, then rescales them the same
//! way: centred on `(0.5 * width, 0.5 * height)`, with the largest deviation
//! from the centre along either axis equal to the method's scale
//! (`0.45 * min(width, height)` for circular, `0.4 * min(width, height)`
//! otherwise). Results are deterministic for a given graph.
//!
//! ## References
//!
//! - Fruchterman & Reingold (1991) - Force-directed layout
//! - Koren (2003) - Spectral drawing with Laplacian eigenvectors
//! - Sugiyama et al. (1981) - Layered DAG layout

use crate::config::LayoutConfig;
use crate::models::NodeId;
use crate::services::{DocumentGraph, GraphError, Result};
use petgraph::Direction;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

/// Scale factor for circular layouts, relative to the shorter canvas side
const CIRCULAR_SCALE: f64 = 0.45;

/// Scale factor for every other layout
const DEFAULT_SCALE: f64 = 0.4;

/// Floor on node distance in force computations
const MIN_DISTANCE: f64 = 1e-3;

/// Jacobi sweeps before giving up on further convergence
const MAX_JACOBI_SWEEPS: usize = 100;

/// A position hint on the canvas
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Layout algorithm selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutMethod {
    /// Nodes evenly spaced on a circle
    Circular,
    /// Force-directed Fruchterman-Reingold
    Spring,
    /// Concentric rings by distance from the document's roots
    Shell,
    /// Laplacian eigenvectors
    Spectral,
    /// Layered top-down drawing by longest path from the roots
    Dot,
}

impl LayoutMethod {
    pub const ALL: [LayoutMethod; 5] = [
        LayoutMethod::Circular,
        LayoutMethod::Spring,
        LayoutMethod::Shell,
        LayoutMethod::Spectral,
        LayoutMethod::Dot,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Circular => "circular",
            Self::Spring => "spring",
            Self::Shell => "shell",
            Self::Spectral => "spectral",
            Self::Dot => "dot",
        }
    }

    fn scale_factor(&self) -> f64 {
        match self {
            Self::Circular => CIRCULAR_SCALE,
            _ => DEFAULT_SCALE,
        }
    }
}

impl fmt::Display for LayoutMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LayoutMethod {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "circular" => Ok(Self::Circular),
            "spring" | "force-directed" => Ok(Self::Spring),
            "shell" => Ok(Self::Shell),
            "spectral" => Ok(Self::Spectral),
            "dot" | "hierarchical" => Ok(Self::Dot),
            _ => Err(GraphError::unsupported_layout(s)),
        }
    }
}

/// Computes position hints over a borrowed document graph
#[derive(Debug, Clone, Copy)]
pub struct LayoutAdapter<'a> {
    graph: &'a DocumentGraph,
    config: &'a LayoutConfig,
}

impl<'a> LayoutAdapter<'a> {
    pub fn new(graph: &'a DocumentGraph, config: &'a LayoutConfig) -> Self {
        Self { graph, config }
    }

    /// Positions for every node, fitted to a `width` x `height` canvas.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if either dimension is zero, negative or not finite.
    pub fn compute_positions(
        &self,
        width: f64,
        height: f64,
        method: LayoutMethod,
    ) -> Result<BTreeMap<NodeId, Position>> {
        for (name, value) in [("width", width), ("height", height)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(GraphError::invalid_argument(format!(
                    "canvas {} must be a positive number, got {}",
                    name, value
                )));
            }
        }

        let ids: Vec<NodeId> = self.graph.nodes().into_iter().collect();
        if ids.is_empty() {
            return Ok(BTreeMap::new());
        }

        let raw = match method {
            LayoutMethod::Circular => circular(ids.len()),
            LayoutMethod::Spring => self.spring(&ids),
            LayoutMethod::Shell => self.shell(&ids),
            LayoutMethod::Spectral => self.spectral(&ids),
            LayoutMethod::Dot => self.dot(&ids),
        };

        let center = Position::new(0.5 * width, 0.5 * height);
        let scale = method.scale_factor() * width.min(height);
        let fitted = rescale(raw, center, scale);

        tracing::debug!(
            "Computed {} layout for {} nodes on {}x{} canvas",
            method,
            ids.len(),
            width,
            height
        );
        Ok(ids.into_iter().zip(fitted).collect())
    }

    /// Like [`compute_positions`](Self::compute_positions), with the method given by name.
    ///
    /// # Errors
    ///
    /// `UnsupportedLayout` if `method` names no known layout.
    pub fn compute_positions_by_name(
        &self,
        width: f64,
        height: f64,
        method: &str,
    ) -> Result<BTreeMap<NodeId, Position>> {
        self.compute_positions(width, height, method.parse()?)
    }

    /// Index of every node in `ids`, for building index-based adjacency
    fn index_of(ids: &[NodeId]) -> BTreeMap<NodeId, usize> {
        ids.iter().enumerate().map(|(i, &id)| (id, i)).collect()
    }

    /// Undirected, self-loop-free adjacency by index
    fn undirected_adjacency(&self, ids: &[NodeId]) -> Vec<BTreeSet<usize>> {
        let index = Self::index_of(ids);
        let mut adjacency = vec![BTreeSet::new(); ids.len()];
        for (head, tail) in self.graph.edges() {
            if let (Some(&h), Some(&t)) = (index.get(&head), index.get(&tail)) {
                if h != t {
                    adjacency[h].insert(t);
                    adjacency[t].insert(h);
                }
            }
        }
        adjacency
    }

    /// Force-directed layout - Fruchterman-Reingold from a circular start
    fn spring(&self, ids: &[NodeId]) -> Vec<Position> {
        let n = ids.len();
        let mut positions = circular(n);
        if n < 2 {
            return positions;
        }

        let adjacency = self.undirected_adjacency(ids);
        let k = (1.0 / n as f64).sqrt();
        let mut temperature = 0.1;

        for _ in 0..self.config.iterations {
            let mut displacement = vec![(0.0_f64, 0.0_f64); n];

            // Repulsion between every pair: k^2 / d
            for i in 0..n {
                for j in (i + 1)..n {
                    let dx = positions[i].x - positions[j].x;
                    let dy = positions[i].y - positions[j].y;
                    let dist = (dx * dx + dy * dy).sqrt().max(MIN_DISTANCE);
                    let force = k * k / dist;
                    let (fx, fy) = (dx / dist * force, dy / dist * force);
                    displacement[i].0 += fx;
                    displacement[i].1 += fy;
                    displacement[j].0 -= fx;
                    displacement[j].1 -= fy;
                }
            }

            // Attraction along edges: d^2 / k
            for (i, neighbours) in adjacency.iter().enumerate() {
                for &j in neighbours.iter().filter(|&&j| j > i) {
                    let dx = positions[j].x - positions[i].x;
                    let dy = positions[j].y - positions[i].y;
                    let dist = (dx * dx + dy * dy).sqrt().max(MIN_DISTANCE);
                    let force = dist * dist / k;
                    let (fx, fy) = (dx / dist * force, dy / dist * force);
                    displacement[i].0 += fx;
                    displacement[i].1 += fy;
                    displacement[j].0 -= fx;
                    displacement[j].1 -= fy;
                }
            }

            // Move each node at most `temperature`
            for (position, (fx, fy)) in positions.iter_mut().zip(displacement) {
                let magnitude = (fx * fx + fy * fy).sqrt().max(MIN_DISTANCE);
                let step = magnitude.min(temperature);
                position.x += fx / magnitude * step;
                position.y += fy / magnitude * step;
            }

            temperature *= self.config.cooling;
        }

        positions
    }

    /// Breadth-first depth from the roots; nodes no root reaches get `None`
    fn depths_from_roots(&self, ids: &[NodeId]) -> Vec<Option<usize>> {
        let index = Self::index_of(ids);
        let mut depth = vec![None; ids.len()];
        let mut queue: VecDeque<NodeId> = VecDeque::new();

        for root in self.graph.roots() {
            if let Some(&i) = index.get(&root) {
                depth[i] = Some(0);
                queue.push_back(root);
            }
        }

        while let Some(id) = queue.pop_front() {
            let Some(current) = index.get(&id).and_then(|&i| depth[i]) else {
                continue;
            };
            for next in self
                .graph
                .topology()
                .neighbors_directed(id, Direction::Outgoing)
            {
                if let Some(&j) = index.get(&next) {
                    if depth[j].is_none() {
                        depth[j] = Some(current + 1);
                        queue.push_back(next);
                    }
                }
            }
        }

        depth
    }

    /// Concentric shells by distance from the roots; unreachable nodes form the outermost shell
    fn shell(&self, ids: &[NodeId]) -> Vec<Position> {
        let depths = self.depths_from_roots(ids);
        let outer = depths.iter().flatten().max().map_or(0, |&d| d + 1);

        let mut shells: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        for (i, depth) in depths.iter().enumerate() {
            shells.entry(depth.unwrap_or(outer)).or_default().push(i);
        }

        let shell_count = shells.len() as f64;
        let first_is_single = shells.values().next().is_some_and(|s| s.len() == 1);

        let mut positions = vec![Position::default(); ids.len()];
        for (ring, members) in shells.values().enumerate() {
            let radius = if first_is_single {
                ring as f64 / shell_count
            } else {
                (ring + 1) as f64 / shell_count
            };
            for (slot, &i) in members.iter().enumerate() {
                let angle = 2.0 * PI * slot as f64 / members.len() as f64;
                positions[i] = Position::new(radius * angle.cos(), radius * angle.sin());
            }
        }
        positions
    }

    /// Spectral layout - eigenvectors of the 2nd and 3rd smallest Laplacian eigenvalues
    fn spectral(&self, ids: &[NodeId]) -> Vec<Position> {
        let n = ids.len();
        if n < 3 {
            return circular(n);
        }

        let adjacency = self.undirected_adjacency(ids);
        let mut laplacian = vec![vec![0.0; n]; n];
        for (i, neighbours) in adjacency.iter().enumerate() {
            laplacian[i][i] = neighbours.len() as f64;
            for &j in neighbours {
                laplacian[i][j] = -1.0;
            }
        }

        let (values, vectors) = symmetric_eigen(laplacian);
        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

        let (first, second) = (order[1], order[2]);
        (0..n)
            .map(|i| Position::new(vectors[i][first], vectors[i][second]))
            .collect()
    }

    /// Layered layout - longest-path layers from the roots, top to bottom
    fn dot(&self, ids: &[NodeId]) -> Vec<Position> {
        let index = Self::index_of(ids);
        let n = ids.len();

        // Kahn's algorithm; each node sits one layer below its deepest parent
        let mut in_degree = vec![0usize; n];
        let mut children = vec![Vec::new(); n];
        for (head, tail) in self.graph.edges() {
            if let (Some(&h), Some(&t)) = (index.get(&head), index.get(&tail)) {
                if h != t {
                    in_degree[t] += 1;
                    children[h].push(t);
                }
            }
        }

        let mut layer: Vec<Option<usize>> = vec![None; n];
        let mut queue: VecDeque<usize> = (0..n).filter(|&i| in_degree[i] == 0).collect();
        for &i in &queue {
            layer[i] = Some(0);
        }

        while let Some(i) = queue.pop_front() {
            let below = layer[i].unwrap_or(0) + 1;
            for &child in &children[i] {
                layer[child] = Some(layer[child].map_or(below, |l| l.max(below)));
                in_degree[child] -= 1;
                if in_degree[child] == 0 {
                    queue.push_back(child);
                }
            }
        }

        // Nodes on or behind a cycle never reach in-degree zero
        let cyclic_layer = layer.iter().flatten().max().map_or(0, |&l| l + 1);
        let mut layers: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        for i in 0..n {
            let assigned = if in_degree[i] == 0 {
                layer[i].unwrap_or(0)
            } else {
                cyclic_layer
            };
            layers.entry(assigned).or_default().push(i);
        }

        let mut positions = vec![Position::default(); n];
        for (depth, members) in &layers {
            let offset = (members.len() as f64 - 1.0) / 2.0;
            for (slot, &i) in members.iter().enumerate() {
                positions[i] = Position::new(slot as f64 - offset, *depth as f64);
            }
        }
        positions
    }
}

impl DocumentGraph {
    /// Layout view using this graph's layout config
    pub fn layout(&self) -> LayoutAdapter<'_> {
        LayoutAdapter::new(self, &self.config().layout)
    }
}

/// Unit-circle positions, first node at angle 0
fn circular(n: usize) -> Vec<Position> {
    if n == 1 {
        return vec![Position::default()];
    }
    (0..n)
        .map(|i| {
            let angle = 2.0 * PI * i as f64 / n as f64;
            Position::new(angle.cos(), angle.sin())
        })
        .collect()
}

/// Centre raw positions on `center` and scale the largest deviation to `scale`
fn rescale(mut positions: Vec<Position>, center: Position, scale: f64) -> Vec<Position> {
    if positions.is_empty() {
        return positions;
    }

    let n = positions.len() as f64;
    let mean_x = positions.iter().map(|p| p.x).sum::<f64>() / n;
    let mean_y = positions.iter().map(|p| p.y).sum::<f64>() / n;

    let mut limit: f64 = 0.0;
    for position in positions.iter_mut() {
        position.x -= mean_x;
        position.y -= mean_y;
        limit = limit.max(position.x.abs()).max(position.y.abs());
    }

    for position in positions.iter_mut() {
        if limit > 0.0 {
            position.x = position.x / limit * scale;
            position.y = position.y / limit * scale;
        }
        position.x += center.x;
        position.y += center.y;
    }
    positions
}

/// Eigen-decomposition of a symmetric matrix by cyclic Jacobi rotations.
///
/// Returns the eigenvalues and a matrix whose column `k` is the eigenvector
/// for eigenvalue `k`.
fn symmetric_eigen(mut a: Vec<Vec<f64>>) -> (Vec<f64>, Vec<Vec<f64>>) {
    let n = a.len();
    let mut v: Vec<Vec<f64>> = (0..n)
        .map(|i| (0..n).map(|j| if i == j { 1.0 } else { 0.0 }).collect())
        .collect();

    for _ in 0..MAX_JACOBI_SWEEPS {
        let off_diagonal: f64 = (0..n)
            .flat_map(|p| ((p + 1)..n).map(move |q| (p, q)))
            .map(|(p, q)| a[p][q] * a[p][q])
            .sum();
        if off_diagonal < 1e-20 {
            break;
        }

        for p in 0..n {
            for q in (p + 1)..n {
                if a[p][q].abs() < 1e-15 {
                    continue;
                }

                let theta = (a[q][q] - a[p][p]) / (2.0 * a[p][q]);
                let t = theta.signum() / (theta.abs() + (theta * theta + 1.0).sqrt());
                let c = 1.0 / (t * t + 1.0).sqrt();
                let s = t * c;

                for row in a.iter_mut() {
                    let (kp, kq) = (row[p], row[q]);
                    row[p] = c * kp - s * kq;
                    row[q] = s * kp + c * kq;
                }
                for k in 0..n {
                    let (pk, qk) = (a[p][k], a[q][k]);
                    a[p][k] = c * pk - s * qk;
                    a[q][k] = s * pk + c * qk;
                }
                for row in v.iter_mut() {
                    let (kp, kq) = (row[p], row[q]);
                    row[p] = c * kp - s * kq;
                    row[q] = s * kp + c * kq;
                }
            }
        }
    }

    let values = (0..n).map(|i| a[i][i]).collect();
    (values, v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::ErrorKind;

    const EPS: f64 = 1e-6;

    fn sample_graph() -> DocumentGraph {
        let mut graph = DocumentGraph::new();
        let ids: Vec<NodeId> = (0..6).map(|i| graph.add_node(i, None)).collect();
        for (h, t) in [(0, 1), (1, 2), (1, 3), (2, 4), (3, 4), (4, 5)] {
            graph.add_edge(ids[h], ids[t]).unwrap();
        }
        graph
    }

    fn max_deviation(positions: &BTreeMap<NodeId, Position>, center: Position) -> f64 {
        positions
            .values()
            .map(|p| (p.x - center.x).abs().max((p.y - center.y).abs()))
            .fold(0.0, f64::max)
    }

    #[test]
    fn test_method_parsing() {
        assert_eq!("circular".parse::<LayoutMethod>().unwrap(), LayoutMethod::Circular);
        assert_eq!("force-directed".parse::<LayoutMethod>().unwrap(), LayoutMethod::Spring);
        assert_eq!("Hierarchical".parse::<LayoutMethod>().unwrap(), LayoutMethod::Dot);

        let err = "kamada_kawai".parse::<LayoutMethod>().unwrap_err();
        assert_eq!(err, GraphError::unsupported_layout("kamada_kawai"));
        assert_eq!(err.kind(), ErrorKind::UnsupportedLayout);

        for method in LayoutMethod::ALL {
            assert_eq!(method.as_str().parse::<LayoutMethod>().unwrap(), method);
        }
    }

    #[test]
    fn test_every_method_centres_and_fits_canvas() {
        let graph = sample_graph();
        let (width, height) = (800.0, 600.0);
        let center = Position::new(400.0, 300.0);

        for method in LayoutMethod::ALL {
            let positions = graph.layout().compute_positions(width, height, method).unwrap();
            assert_eq!(positions.len(), 6, "{}", method);

            let mean_x = positions.values().map(|p| p.x).sum::<f64>() / 6.0;
            let mean_y = positions.values().map(|p| p.y).sum::<f64>() / 6.0;
            assert!((mean_x - center.x).abs() < EPS, "{} mean x {}", method, mean_x);
            assert!((mean_y - center.y).abs() < EPS, "{} mean y {}", method, mean_y);

            let expected = method.scale_factor() * 600.0;
            assert!((max_deviation(&positions, center) - expected).abs() < EPS, "{}", method);

            for p in positions.values() {
                assert!((0.0..=width).contains(&p.x) && (0.0..=height).contains(&p.y));
            }
        }
    }

    #[test]
    fn test_circular_radius() {
        let graph = sample_graph();
        let positions = graph
            .layout()
            .compute_positions(1000.0, 400.0, LayoutMethod::Circular)
            .unwrap();
        for p in positions.values() {
            let r = ((p.x - 500.0).powi(2) + (p.y - 200.0).powi(2)).sqrt();
            assert!((r - 180.0).abs() < EPS);
        }
    }

    #[test]
    fn test_single_node_sits_at_centre() {
        let mut graph = DocumentGraph::new();
        let id = graph.add_node("only", None);
        for method in LayoutMethod::ALL {
            let positions = graph.layout().compute_positions(200.0, 100.0, method).unwrap();
            assert_eq!(positions[&id], Position::new(100.0, 50.0));
        }
    }

    #[test]
    fn test_empty_graph_and_bad_canvas() {
        let graph = DocumentGraph::new();
        assert!(graph
            .layout()
            .compute_positions(10.0, 10.0, LayoutMethod::Spring)
            .unwrap()
            .is_empty());

        let err = graph
            .layout()
            .compute_positions(-1.0, 10.0, LayoutMethod::Spring)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);

        for (width, height) in [(0.0, 10.0), (10.0, 0.0), (f64::NAN, 10.0), (10.0, f64::INFINITY)] {
            let err = graph
                .layout()
                .compute_positions(width, height, LayoutMethod::Circular)
                .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        }

        let err = graph
            .layout()
            .compute_positions_by_name(10.0, 10.0, "random")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedLayout);
    }

    #[test]
    fn test_layout_is_deterministic() {
        let graph = sample_graph();
        for method in LayoutMethod::ALL {
            let first = graph.layout().compute_positions(300.0, 300.0, method).unwrap();
            let second = graph.layout().compute_positions(300.0, 300.0, method).unwrap();
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_dot_layers_flow_downwards() {
        let graph = sample_graph();
        let ids: Vec<NodeId> = graph.nodes().into_iter().collect();
        let positions = graph
            .layout()
            .compute_positions(500.0, 500.0, LayoutMethod::Dot)
            .unwrap();

        for (head, tail) in graph.edges() {
            assert!(positions[&head].y < positions[&tail].y);
        }
        // Siblings 2 and 3 share a layer
        assert!((positions[&ids[2]].y - positions[&ids[3]].y).abs() < EPS);
    }

    #[test]
    fn test_dot_handles_cycles() {
        let mut graph = sample_graph();
        let ids: Vec<NodeId> = graph.nodes().into_iter().collect();
        graph.add_edge(ids[5], ids[1]).unwrap();

        let positions = graph
            .layout()
            .compute_positions(500.0, 500.0, LayoutMethod::Dot)
            .unwrap();
        assert_eq!(positions.len(), 6);
        assert!(positions.values().all(|p| p.x.is_finite() && p.y.is_finite()));
    }

    #[test]
    fn test_shell_puts_single_root_at_centre() {
        let graph = sample_graph();
        let ids: Vec<NodeId> = graph.nodes().into_iter().collect();
        let raw = graph.layout().shell(&ids);
        assert_eq!(raw[0], Position::new(0.0, 0.0));
        assert!(raw[1..].iter().all(|p| (p.x * p.x + p.y * p.y).sqrt() > 0.0));
    }

    #[test]
    fn test_symmetric_eigen_diagonalises() {
        // Path graph Laplacian on 3 nodes: eigenvalues 0, 1, 3
        let laplacian = vec![
            vec![1.0, -1.0, 0.0],
            vec![-1.0, 2.0, -1.0],
            vec![0.0, -1.0, 1.0],
        ];
        let (mut values, _) = symmetric_eigen(laplacian);
        values.sort_by(f64::total_cmp);
        assert!((values[0] - 0.0).abs() < EPS);
        assert!((values[1] - 1.0).abs() < EPS);
        assert!((values[2] - 3.0).abs() < EPS);
    }
}
