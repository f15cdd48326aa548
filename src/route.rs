//! Closed-tour search over a sparse road graph.
//!
//! The graph is undirected and not complete: a move is only possible along a
//! listed road. `RouteGraph` expands the road list into dense distance and
//! adjacency matrices once, at construction, and the solver backtracks over
//! site orderings starting from the depot, abandoning an ordering as soon as
//! a step (or the final return to the depot) has no road.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::catalog::{self, NodeSpec};

/// Largest node count the visited-set bitmask supports.
pub const MAX_NODES: usize = 32;

/// An undirected road between two nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoadDefinition {
    pub a: usize,
    pub b: usize,
    pub distance: u32,
}

impl RoadDefinition {
    pub const fn new(a: usize, b: usize, distance: u32) -> Self {
        Self { a, b, distance }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    TooManyNodes { count: usize, max: usize },
    UnknownNode { node: usize, node_count: usize },
    SelfLoop { node: usize },
    ZeroLength { a: usize, b: usize },
    DuplicateRoad { a: usize, b: usize },
    /// Two consecutive nodes of a path are not joined by a road.
    MissingRoad { from: usize, to: usize },
    /// A path must begin at the depot.
    NotAtDepot { node: usize },
    IllegalMove { from: usize, to: usize },
}

impl fmt::Display for RouteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteError::TooManyNodes { count, max } => {
                write!(f, "{} nodes exceeds the limit of {}", count, max)
            }
            RouteError::UnknownNode { node, node_count } => {
                write!(f, "node {} does not exist in a graph of {} nodes", node, node_count)
            }
            RouteError::SelfLoop { node } => write!(f, "road from node {} to itself", node),
            RouteError::ZeroLength { a, b } => write!(f, "road {}-{} has zero length", a, b),
            RouteError::DuplicateRoad { a, b } => write!(f, "road {}-{} is listed twice", a, b),
            RouteError::MissingRoad { from, to } => write!(f, "no road from {} to {}", from, to),
            RouteError::NotAtDepot { node } => write!(f, "path starts at {} instead of the depot", node),
            RouteError::IllegalMove { from, to } => write!(f, "cannot move from {} to {}", from, to),
        }
    }
}

impl std::error::Error for RouteError {}

/// A closed tour: depot, every site once, depot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tour {
    pub nodes: Vec<usize>,
    pub tour_length: u32,
}

#[derive(Debug, Clone)]
pub struct RouteGraph {
    node_count: usize,
    depot: usize,
    distances: Vec<Vec<u32>>,
    adjacency: Vec<Vec<bool>>,
    all_sites: u32,
}

impl RouteGraph {
    pub fn new(node_count: usize, roads: &[RoadDefinition], depot: usize) -> Result<Self, RouteError> {
        if node_count > MAX_NODES {
            return Err(RouteError::TooManyNodes {
                count: node_count,
                max: MAX_NODES,
            });
        }
        if depot >= node_count {
            return Err(RouteError::UnknownNode { node: depot, node_count });
        }

        let mut distances = vec![vec![0u32; node_count]; node_count];
        let mut adjacency = vec![vec![false; node_count]; node_count];

        for road in roads {
            let RoadDefinition { a, b, distance } = *road;
            for node in [a, b] {
                if node >= node_count {
                    return Err(RouteError::UnknownNode { node, node_count });
                }
            }
            if a == b {
                return Err(RouteError::SelfLoop { node: a });
            }
            if distance == 0 {
                return Err(RouteError::ZeroLength { a, b });
            }
            if adjacency[a][b] {
                return Err(RouteError::DuplicateRoad { a, b });
            }
            adjacency[a][b] = true;
            adjacency[b][a] = true;
            distances[a][b] = distance;
            distances[b][a] = distance;
        }

        let all_sites = (0..node_count)
            .filter(|&node| node != depot)
            .fold(0u32, |mask, node| mask | (1u32 << node));

        debug!(nodes = node_count, roads = roads.len(), depot, "route graph built");

        Ok(Self {
            node_count,
            depot,
            distances,
            adjacency,
            all_sites,
        })
    }

    /// The shipped town map.
    pub fn from_catalog() -> Result<Self, RouteError> {
        Self::new(catalog::NODES.len(), catalog::ROADS, catalog::DEPOT)
    }

    pub fn node_count(&self) -> usize {
        self.node_count
    }

    pub fn depot(&self) -> usize {
        self.depot
    }

    pub fn is_adjacent(&self, a: usize, b: usize) -> bool {
        a < self.node_count && b < self.node_count && self.adjacency[a][b]
    }

    /// Road length between `a` and `b`, if they are joined.
    pub fn distance(&self, a: usize, b: usize) -> Option<u32> {
        self.is_adjacent(a, b).then(|| self.distances[a][b])
    }

    pub fn neighbours(&self, node: usize) -> impl Iterator<Item = usize> + '_ {
        (0..self.node_count).filter(move |&other| self.is_adjacent(node, other))
    }

    /// Sum of road lengths along `nodes`.
    pub fn tour_length(&self, nodes: &[usize]) -> Result<u32, RouteError> {
        if let Some(&node) = nodes.iter().find(|&&node| node >= self.node_count) {
            return Err(RouteError::UnknownNode {
                node,
                node_count: self.node_count,
            });
        }
        nodes.windows(2).try_fold(0u32, |total, step| {
            self.distance(step[0], step[1])
                .map(|d| total + d)
                .ok_or(RouteError::MissingRoad {
                    from: step[0],
                    to: step[1],
                })
        })
    }

    /// Shortest closed tour from the depot, or `None` if no ordering of the
    /// sites can be driven along existing roads.
    pub fn solve(&self) -> Option<Tour> {
        let tour = self.best_completion(&TourBuilder::new(self));
        match &tour {
            Some(tour) => debug!(tour_length = tour.tour_length, "route solved"),
            None => debug!("no closed tour exists"),
        }
        tour
    }

    /// Shortest closed tour that starts with the builder's current path.
    pub fn best_completion(&self, builder: &TourBuilder) -> Option<Tour> {
        if builder.is_complete(self) {
            return Some(Tour {
                nodes: builder.path().to_vec(),
                tour_length: builder.distance(),
            });
        }

        let mut path = builder.path().to_vec();
        let mut best = None;
        self.search(&mut path, builder.visited, builder.distance(), &mut best);
        best
    }

    fn search(&self, path: &mut Vec<usize>, visited: u32, length: u32, best: &mut Option<Tour>) {
        if best.as_ref().is_some_and(|tour: &Tour| length >= tour.tour_length) {
            return;
        }
        let Some(&current) = path.last() else {
            return;
        };

        if visited == self.all_sites {
            let Some(back) = self.distance(current, self.depot) else {
                return;
            };
            let total = length + back;
            if best.as_ref().is_none_or(|tour| total < tour.tour_length) {
                path.push(self.depot);
                trace!(?path, total, "improved tour");
                *best = Some(Tour {
                    nodes: path.clone(),
                    tour_length: total,
                });
                path.pop();
            }
            return;
        }

        for next in 0..self.node_count {
            if next == self.depot || visited & (1u32 << next) != 0 || !self.adjacency[current][next] {
                continue;
            }
            path.push(next);
            self.search(path, visited | (1u32 << next), length + self.distances[current][next], best);
            path.pop();
        }
    }
}

// ============================================================================
// Player path
// ============================================================================

/// The route the player is drawing, one click at a time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TourBuilder {
    depot: usize,
    path: Vec<usize>,
    legs: Vec<u32>,
    #[serde(skip)]
    visited: u32,
}

impl TourBuilder {
    /// A path standing at the graph's depot.
    pub fn new(graph: &RouteGraph) -> Self {
        Self {
            depot: graph.depot(),
            path: vec![graph.depot()],
            legs: Vec::new(),
            visited: 0,
        }
    }

    /// Replay `nodes` as a sequence of moves.
    pub fn from_path(graph: &RouteGraph, nodes: &[usize]) -> Result<Self, RouteError> {
        let mut builder = Self::new(graph);
        match nodes.first() {
            Some(&first) if first == graph.depot() => {}
            Some(&node) => return Err(RouteError::NotAtDepot { node }),
            None => return Ok(builder),
        }
        for &node in &nodes[1..] {
            builder.move_to(graph, node)?;
        }
        Ok(builder)
    }

    pub fn path(&self) -> &[usize] {
        &self.path
    }

    /// Node the player is standing on.
    pub fn position(&self) -> usize {
        self.path.last().copied().unwrap_or(self.depot)
    }

    pub fn distance(&self) -> u32 {
        self.legs.iter().sum()
    }

    pub fn has_visited(&self, node: usize) -> bool {
        node < MAX_NODES && self.visited & (1u32 << node) != 0
    }

    pub fn all_sites_visited(&self, graph: &RouteGraph) -> bool {
        self.visited == graph.all_sites
    }

    pub fn is_complete(&self, graph: &RouteGraph) -> bool {
        self.all_sites_visited(graph)
            && self.position() == self.depot
            && (self.path.len() > 1 || graph.node_count() == 1)
    }

    pub fn can_move_to(&self, graph: &RouteGraph, node: usize) -> bool {
        if self.is_complete(graph) || !graph.is_adjacent(self.position(), node) {
            return false;
        }
        if node == self.depot {
            self.all_sites_visited(graph)
        } else {
            !self.has_visited(node)
        }
    }

    pub fn move_to(&mut self, graph: &RouteGraph, node: usize) -> Result<(), RouteError> {
        let from = self.position();
        let leg = graph
            .distance(from, node)
            .filter(|_| self.can_move_to(graph, node))
            .ok_or(RouteError::IllegalMove { from, to: node })?;

        self.path.push(node);
        self.legs.push(leg);
        if node != self.depot {
            self.visited |= 1u32 << node;
        }
        Ok(())
    }

    /// Take back the last move, returning the node that was left.
    pub fn undo(&mut self) -> Option<usize> {
        if self.path.len() <= 1 {
            return None;
        }
        let node = self.path.pop()?;
        self.legs.pop();
        if node != self.depot {
            self.visited &= !(1u32 << node);
        }
        Some(node)
    }

    pub fn reset(&mut self) {
        self.path.truncate(1);
        self.legs.clear();
        self.visited = 0;
    }
}

// ============================================================================
// Hints
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "node", rename_all = "camelCase")]
pub enum RouteHint {
    MoveTo(usize),
    ReturnToDepot,
    /// The current path is off every shortest tour; take back the move to
    /// this node.
    Undo(usize),
    Complete,
    NoTour,
}

impl RouteHint {
    pub fn message(&self, nodes: &[NodeSpec]) -> String {
        let name = |id: usize| {
            nodes
                .get(id)
                .map(|node| node.name.to_string())
                .unwrap_or_else(|| format!("node {}", id))
        };
        match *self {
            RouteHint::MoveTo(node) => format!("Head to the {} next.", name(node)),
            RouteHint::ReturnToDepot => "Every stop is done, return to the depot.".to_string(),
            RouteHint::Undo(node) => format!("Going to the {} was a detour; step back.", name(node)),
            RouteHint::Complete => "Route finished!".to_string(),
            RouteHint::NoTour => "This map has no round trip through every stop.".to_string(),
        }
    }
}

/// Suggest the next click for the player's path.
///
/// A finished tour longer than the optimum is walked back like any other
/// detour.
pub fn hint(graph: &RouteGraph, builder: &TourBuilder) -> RouteHint {
    let Some(optimal) = graph.solve() else {
        return RouteHint::NoTour;
    };

    match graph.best_completion(builder) {
        Some(tour) if tour.tour_length == optimal.tour_length => match tour.nodes.get(builder.path().len()) {
            None => RouteHint::Complete,
            Some(&next) if next == graph.depot() => RouteHint::ReturnToDepot,
            Some(&next) => RouteHint::MoveTo(next),
        },
        _ => RouteHint::Undo(builder.position()),
    }
}
