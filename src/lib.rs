//! puzzle-planner core solvers
//!
//! Exact optimizers behind the escape-room mini-games: courier assignment
//! (Hungarian algorithm), knapsack packing (subset enumeration) and the
//! delivery round trip (backtracking tour search), plus the hint logic that
//! compares a player's partial answer against the optimum.

pub mod traits;
pub mod catalog;
pub mod euclidean;
pub mod assignment;
pub mod knapsack;
pub mod route;
pub mod solver;
