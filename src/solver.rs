//! Precomputation of every game's optimum (the answers the result screens
//! and hints compare against).

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::assignment::{self, AssignmentError};
use crate::catalog::{COURIERS, ITEMS, KNAPSACK_CAPACITY_KG, ORDERS};
use crate::euclidean::{DEFAULT_MINUTES_PER_UNIT, EuclideanMatrix};
use crate::knapsack::{self, KnapsackError, KnapsackSolution};
use crate::route::{RouteError, RouteGraph, Tour};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SolveOptions {
    /// Courier travel minutes per map unit.
    pub minutes_per_unit: f64,
    /// Knapsack capacity in kilograms.
    pub capacity_kg: f64,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            minutes_per_unit: DEFAULT_MINUTES_PER_UNIT,
            capacity_kg: KNAPSACK_CAPACITY_KG,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimalAnswers {
    /// `assignment[courier] = order`.
    pub assignment: Vec<usize>,
    /// Minutes, rounded to one decimal place.
    pub assignment_cost: f64,
    pub knapsack: KnapsackSolution,
    /// `None` when the road map admits no closed tour.
    pub tour: Option<Tour>,
}

#[derive(Debug)]
pub enum PlannerError {
    Assignment(AssignmentError),
    Knapsack(KnapsackError),
    Route(RouteError),
}

impl fmt::Display for PlannerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlannerError::Assignment(err) => write!(f, "assignment: {}", err),
            PlannerError::Knapsack(err) => write!(f, "knapsack: {}", err),
            PlannerError::Route(err) => write!(f, "route: {}", err),
        }
    }
}

impl std::error::Error for PlannerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PlannerError::Assignment(err) => Some(err),
            PlannerError::Knapsack(err) => Some(err),
            PlannerError::Route(err) => Some(err),
        }
    }
}

impl From<AssignmentError> for PlannerError {
    fn from(err: AssignmentError) -> Self {
        PlannerError::Assignment(err)
    }
}

impl From<KnapsackError> for PlannerError {
    fn from(err: KnapsackError) -> Self {
        PlannerError::Knapsack(err)
    }
}

impl From<RouteError> for PlannerError {
    fn from(err: RouteError) -> Self {
        PlannerError::Route(err)
    }
}

/// The courier × order matrix for the shipped rosters.
pub fn catalog_cost_matrix(options: &SolveOptions) -> Vec<Vec<f64>> {
    let provider = EuclideanMatrix::new(options.minutes_per_unit);
    assignment::cost_matrix(COURIERS, ORDERS, &provider)
}

/// Solve all three games on the shipped catalogs.
pub fn solve_all(options: &SolveOptions) -> Result<OptimalAnswers, PlannerError> {
    let cost = catalog_cost_matrix(options);
    let assignment = assignment::solve(&cost)?;
    let assignment_cost = assignment::assignment_cost(&cost, &assignment);

    let knapsack = knapsack::solve(ITEMS, options.capacity_kg)?;

    let graph = RouteGraph::from_catalog()?;
    let tour = graph.solve();

    info!(
        assignment_cost,
        knapsack_value = knapsack.total_value,
        tour_length = ?tour.as_ref().map(|t| t.tour_length),
        "optimal answers computed"
    );

    Ok(OptimalAnswers {
        assignment,
        assignment_cost,
        knapsack,
        tour,
    })
}
