//! Test fixtures for puzzle-planner.
//!
//! Provides:
//! - Builders for ad-hoc items, couriers and orders
//! - Brute-force oracles the exact solvers are checked against

#![allow(dead_code)]

use puzzle_planner::route::RouteGraph;
use puzzle_planner::traits::{Courier, Item, Order};

// ============================================================================
// Builders
// ============================================================================

#[derive(Clone, Debug)]
pub struct TestItem {
    name: String,
    weight_kg: f64,
    value: u32,
}

impl TestItem {
    pub fn new(id: usize, weight_kg: f64, value: u32) -> Self {
        Self {
            name: format!("item-{}", id),
            weight_kg,
            value,
        }
    }
}

impl Item for TestItem {
    fn name(&self) -> &str {
        &self.name
    }

    fn weight_kg(&self) -> f64 {
        self.weight_kg
    }

    fn value(&self) -> u32 {
        self.value
    }
}

/// Items from `(weight_kg, value)` pairs.
pub fn items(pairs: &[(f64, u32)]) -> Vec<TestItem> {
    pairs
        .iter()
        .enumerate()
        .map(|(id, &(weight, value))| TestItem::new(id, weight, value))
        .collect()
}

#[derive(Clone, Debug)]
pub struct TestCourier {
    id: String,
    location: (f64, f64),
}

impl TestCourier {
    pub fn new(id: &str, x: f64, z: f64) -> Self {
        Self {
            id: id.to_string(),
            location: (x, z),
        }
    }
}

impl Courier for TestCourier {
    fn name(&self) -> &str {
        &self.id
    }

    fn location(&self) -> (f64, f64) {
        self.location
    }
}

#[derive(Clone, Debug)]
pub struct TestOrder {
    id: String,
    pickup: (f64, f64),
    dropoff: (f64, f64),
}

impl TestOrder {
    pub fn new(id: &str, pickup: (f64, f64), dropoff: (f64, f64)) -> Self {
        Self {
            id: id.to_string(),
            pickup,
            dropoff,
        }
    }
}

impl Order for TestOrder {
    fn restaurant(&self) -> &str {
        &self.id
    }

    fn customer(&self) -> &str {
        &self.id
    }

    fn pickup_location(&self) -> (f64, f64) {
        self.pickup
    }

    fn dropoff_location(&self) -> (f64, f64) {
        self.dropoff
    }
}

// ============================================================================
// Oracles
// ============================================================================

/// Every permutation of `0..n`.
pub fn permutations(n: usize) -> Vec<Vec<usize>> {
    fn extend(current: &mut Vec<usize>, used: &mut Vec<bool>, out: &mut Vec<Vec<usize>>) {
        if current.len() == used.len() {
            out.push(current.clone());
            return;
        }
        for i in 0..used.len() {
            if used[i] {
                continue;
            }
            used[i] = true;
            current.push(i);
            extend(current, used, out);
            current.pop();
            used[i] = false;
        }
    }

    let mut out = Vec::new();
    extend(&mut Vec::with_capacity(n), &mut vec![false; n], &mut out);
    out
}

/// Minimum assignment cost over all permutations.
pub fn brute_force_assignment(cost: &[Vec<f64>]) -> f64 {
    permutations(cost.len())
        .iter()
        .map(|perm| perm.iter().enumerate().map(|(row, &col)| cost[row][col]).sum::<f64>())
        .fold(f64::INFINITY, f64::min)
}

/// Best value over every subset that fits.
pub fn brute_force_knapsack(items: &[TestItem], capacity_kg: f64) -> u64 {
    (0..1u32 << items.len())
        .filter_map(|mask| {
            let chosen: Vec<&TestItem> = items
                .iter()
                .enumerate()
                .filter(|&(i, _)| mask & (1u32 << i) != 0)
                .map(|(_, item)| item)
                .collect();
            let weight: f64 = chosen.iter().map(|item| item.weight_kg).sum();
            (weight <= capacity_kg + 1e-9).then(|| chosen.iter().map(|item| u64::from(item.value)).sum::<u64>())
        })
        .max()
        .unwrap_or(0)
}

/// Shortest closed tour by enumerating every site ordering, or `None`.
pub fn brute_force_tour(graph: &RouteGraph) -> Option<u32> {
    let sites: Vec<usize> = (0..graph.node_count()).filter(|&n| n != graph.depot()).collect();
    permutations(sites.len())
        .iter()
        .filter_map(|perm| {
            let mut nodes = vec![graph.depot()];
            nodes.extend(perm.iter().map(|&i| sites[i]));
            nodes.push(graph.depot());
            graph.tour_length(&nodes).ok()
        })
        .min()
}
