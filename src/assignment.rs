//! Courier ↔ order assignment (Hungarian algorithm).
//!
//! `solve` finds a minimum-cost perfect matching on a square cost matrix via
//! successive shortest augmenting paths with row/column potentials. The
//! potentials keep `u[i] + v[j] <= cost[i][j]` at all times, with equality on
//! matched pairs, so every augmentation works on zero reduced-cost edges.

use std::fmt;

use serde::Serialize;
use tracing::{debug, trace};

use crate::euclidean::round_to_tenth;
use crate::traits::{CostMatrixProvider, Courier, Order};

/// Slack used when comparing summed costs.
const COST_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, PartialEq)]
pub enum AssignmentError {
    /// A row's length differs from the number of rows.
    RaggedMatrix { row: usize, expected: usize, found: usize },
    /// A cost is negative, NaN or infinite.
    InvalidCost { row: usize, column: usize, value: f64 },
    /// A courier or order index is outside the board.
    OutOfRange { index: usize, len: usize },
    /// The board and the cost matrix disagree on size.
    BoardMismatch { board: usize, matrix: usize },
}

impl fmt::Display for AssignmentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssignmentError::RaggedMatrix { row, expected, found } => write!(
                f,
                "cost matrix is not square: row {} has {} columns, expected {}",
                row, found, expected
            ),
            AssignmentError::InvalidCost { row, column, value } => {
                write!(f, "invalid cost {} at ({}, {})", value, row, column)
            }
            AssignmentError::OutOfRange { index, len } => {
                write!(f, "index {} out of range for {} entries", index, len)
            }
            AssignmentError::BoardMismatch { board, matrix } => write!(
                f,
                "board has {} couriers but the cost matrix has {} rows",
                board, matrix
            ),
        }
    }
}

impl std::error::Error for AssignmentError {}

/// Build the courier × order cost matrix through a provider.
pub fn cost_matrix<C, O, M>(couriers: &[C], orders: &[O], provider: &M) -> Vec<Vec<f64>>
where
    C: Courier,
    O: Order,
    M: CostMatrixProvider,
{
    provider.matrix_for(couriers, orders)
}

/// Minimum-cost perfect matching.
///
/// Returns `assignment` with `assignment[row] = column`.
pub fn solve(cost: &[Vec<f64>]) -> Result<Vec<usize>, AssignmentError> {
    validate(cost)?;

    let n = cost.len();
    if n == 0 {
        return Ok(Vec::new());
    }

    // Index 0 of the column arrays is a sentinel standing for "unmatched";
    // rows and columns are 1-based inside the loop.
    let mut u = vec![0.0_f64; n + 1];
    let mut v = vec![0.0_f64; n + 1];
    let mut matched_row = vec![0usize; n + 1];
    let mut way = vec![0usize; n + 1];

    for row in 1..=n {
        matched_row[0] = row;
        let mut col0 = 0usize;
        let mut min_reduced = vec![f64::INFINITY; n + 1];
        let mut used = vec![false; n + 1];

        loop {
            used[col0] = true;
            let row0 = matched_row[col0];
            let mut delta = f64::INFINITY;
            let mut col1 = 0usize;

            for col in 1..=n {
                if used[col] {
                    continue;
                }
                let reduced = cost[row0 - 1][col - 1] - u[row0] - v[col];
                if reduced < min_reduced[col] {
                    min_reduced[col] = reduced;
                    way[col] = col0;
                }
                if min_reduced[col] < delta {
                    delta = min_reduced[col];
                    col1 = col;
                }
            }

            for col in 0..=n {
                if used[col] {
                    u[matched_row[col]] += delta;
                    v[col] -= delta;
                } else {
                    min_reduced[col] -= delta;
                }
            }

            col0 = col1;
            if matched_row[col0] == 0 {
                break;
            }
        }

        // Flip the augmenting path back to the sentinel.
        loop {
            let col1 = way[col0];
            matched_row[col0] = matched_row[col1];
            col0 = col1;
            if col0 == 0 {
                break;
            }
        }
        trace!(row = row - 1, "augmented");
    }

    let mut assignment = vec![0usize; n];
    for col in 1..=n {
        let row = matched_row[col];
        if row != 0 {
            assignment[row - 1] = col - 1;
        }
    }

    debug!(n, total_cost = raw_cost(cost, &assignment), "assignment solved");
    Ok(assignment)
}

/// Total cost of an assignment, rounded to one decimal place.
pub fn assignment_cost(cost: &[Vec<f64>], assignment: &[usize]) -> f64 {
    round_to_tenth(raw_cost(cost, assignment))
}

fn raw_cost(cost: &[Vec<f64>], assignment: &[usize]) -> f64 {
    assignment
        .iter()
        .enumerate()
        .map(|(row, &col)| cost[row][col])
        .sum()
}

fn validate(cost: &[Vec<f64>]) -> Result<(), AssignmentError> {
    let n = cost.len();
    for (row, values) in cost.iter().enumerate() {
        if values.len() != n {
            return Err(AssignmentError::RaggedMatrix {
                row,
                expected: n,
                found: values.len(),
            });
        }
        for (column, &value) in values.iter().enumerate() {
            if !value.is_finite() || value < 0.0 {
                return Err(AssignmentError::InvalidCost { row, column, value });
            }
        }
    }
    Ok(())
}

// ============================================================================
// Player board
// ============================================================================

/// The player's partial assignment: each courier holds at most one order,
/// each order is held by at most one courier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssignmentBoard {
    slots: Vec<Option<usize>>,
}

impl AssignmentBoard {
    /// An empty board for `n` couriers and `n` orders.
    pub fn new(n: usize) -> Self {
        Self {
            slots: vec![None; n],
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Give `order` to `courier`.
    ///
    /// If another courier held the order it is released and that courier's
    /// index is returned.
    pub fn assign(&mut self, courier: usize, order: usize) -> Result<Option<usize>, AssignmentError> {
        let len = self.slots.len();
        if courier >= len {
            return Err(AssignmentError::OutOfRange { index: courier, len });
        }
        if order >= len {
            return Err(AssignmentError::OutOfRange { index: order, len });
        }

        let displaced = self.courier_for(order).filter(|&holder| holder != courier);
        if let Some(holder) = displaced {
            self.slots[holder] = None;
        }
        self.slots[courier] = Some(order);
        Ok(displaced)
    }

    /// Release the courier's order, returning it.
    pub fn unassign(&mut self, courier: usize) -> Option<usize> {
        self.slots.get_mut(courier).and_then(Option::take)
    }

    pub fn order_for(&self, courier: usize) -> Option<usize> {
        self.slots.get(courier).copied().flatten()
    }

    pub fn courier_for(&self, order: usize) -> Option<usize> {
        self.slots.iter().position(|slot| *slot == Some(order))
    }

    /// Assigned (courier, order) pairs in courier order.
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(courier, slot)| slot.map(|order| (courier, order)))
    }

    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    /// Cost of the current entries, rounded to one decimal place.
    pub fn total_cost(&self, cost: &[Vec<f64>]) -> f64 {
        round_to_tenth(self.pairs().map(|(courier, order)| cost[courier][order]).sum())
    }

    pub fn reset(&mut self) {
        self.slots.iter_mut().for_each(|slot| *slot = None);
    }
}

// ============================================================================
// Hints
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum AssignmentHint {
    /// Give this order to this (currently free) courier.
    Assign { courier: usize, order: usize },
    /// This courier's current order is not part of any optimum; switch to `to`.
    Reassign { courier: usize, to: usize },
    /// Every current entry belongs to an optimal assignment.
    NoErrors,
}

impl AssignmentHint {
    pub fn message<C, O>(&self, couriers: &[C], orders: &[O]) -> String
    where
        C: Courier,
        O: Order,
    {
        let courier_name = |i: usize| {
            couriers
                .get(i)
                .map(|c| c.name().to_string())
                .unwrap_or_else(|| format!("courier {}", i))
        };
        let order_name = |j: usize| {
            orders
                .get(j)
                .map(|o| format!("{} → {}", o.restaurant(), o.customer()))
                .unwrap_or_else(|| format!("order {}", j))
        };

        match *self {
            AssignmentHint::Assign { courier, order } => {
                format!("{} should take {}.", courier_name(courier), order_name(order))
            }
            AssignmentHint::Reassign { courier, to } => format!(
                "{} is on the wrong order; try {} instead.",
                courier_name(courier),
                order_name(to)
            ),
            AssignmentHint::NoErrors => "No mistakes so far, keep going!".to_string(),
        }
    }
}

/// Suggest the next step for the player's board.
///
/// The current entries are kept if some optimal assignment contains all of
/// them; the hint then extends them. Otherwise the first courier that
/// disagrees with the optimum is pointed at its optimal order.
pub fn hint(cost: &[Vec<f64>], board: &AssignmentBoard) -> Result<AssignmentHint, AssignmentError> {
    let optimal = solve(cost)?;
    let n = cost.len();
    if board.len() != n {
        return Err(AssignmentError::BoardMismatch {
            board: board.len(),
            matrix: n,
        });
    }

    let free_rows: Vec<usize> = (0..n).filter(|&row| board.order_for(row).is_none()).collect();
    let free_cols: Vec<usize> = (0..n).filter(|&col| board.courier_for(col).is_none()).collect();
    let sub_cost: Vec<Vec<f64>> = free_rows
        .iter()
        .map(|&row| free_cols.iter().map(|&col| cost[row][col]).collect())
        .collect();
    let completion = solve(&sub_cost)?;

    let fixed: f64 = board.pairs().map(|(row, col)| cost[row][col]).sum();
    let best_extension = fixed + raw_cost(&sub_cost, &completion);

    if best_extension > raw_cost(cost, &optimal) + COST_TOLERANCE {
        if let Some((courier, _)) = board.pairs().find(|&(row, col)| optimal[row] != col) {
            return Ok(AssignmentHint::Reassign {
                courier,
                to: optimal[courier],
            });
        }
    }

    Ok(match free_rows.first() {
        Some(&courier) => AssignmentHint::Assign {
            courier,
            order: free_cols[completion[0]],
        },
        None => AssignmentHint::NoErrors,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Vec<f64>> {
        vec![
            vec![4.0, 1.0, 3.0],
            vec![2.0, 0.0, 5.0],
            vec![3.0, 2.0, 2.0],
        ]
    }

    #[test]
    fn test_solve_small_matrix() {
        let assignment = solve(&sample()).unwrap();
        assert_eq!(assignment, vec![1, 0, 2]);
        assert_eq!(assignment_cost(&sample(), &assignment), 5.0);
    }

    #[test]
    fn test_solve_identity_is_cheapest_on_diagonal() {
        let cost = vec![
            vec![0.0, 9.0, 9.0, 9.0],
            vec![9.0, 0.0, 9.0, 9.0],
            vec![9.0, 9.0, 0.0, 9.0],
            vec![9.0, 9.0, 9.0, 0.0],
        ];
        assert_eq!(solve(&cost).unwrap(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_solve_empty_matrix() {
        assert_eq!(solve(&[]).unwrap(), Vec::<usize>::new());
    }

    #[test]
    fn test_solve_single_cell() {
        assert_eq!(solve(&[vec![7.5]]).unwrap(), vec![0]);
    }

    #[test]
    fn test_rejects_ragged_matrix() {
        let cost = vec![vec![1.0, 2.0], vec![3.0]];
        assert_eq!(
            solve(&cost),
            Err(AssignmentError::RaggedMatrix { row: 1, expected: 2, found: 1 })
        );
    }

    #[test]
    fn test_rejects_negative_cost() {
        let cost = vec![vec![1.0, -2.0], vec![3.0, 4.0]];
        assert!(matches!(
            solve(&cost),
            Err(AssignmentError::InvalidCost { row: 0, column: 1, .. })
        ));
    }

    #[test]
    fn test_rejects_nan_cost() {
        let cost = vec![vec![1.0, 2.0], vec![f64::NAN, 4.0]];
        assert!(matches!(solve(&cost), Err(AssignmentError::InvalidCost { row: 1, column: 0, .. })));
    }

    #[test]
    fn test_board_moves_order_between_couriers() {
        let mut board = AssignmentBoard::new(3);
        assert_eq!(board.assign(0, 2).unwrap(), None);
        assert_eq!(board.assign(1, 2).unwrap(), Some(0));
        assert_eq!(board.order_for(0), None);
        assert_eq!(board.order_for(1), Some(2));
        assert_eq!(board.courier_for(2), Some(1));
    }

    #[test]
    fn test_board_reassigning_same_pair_is_noop() {
        let mut board = AssignmentBoard::new(2);
        board.assign(0, 1).unwrap();
        assert_eq!(board.assign(0, 1).unwrap(), None);
        assert_eq!(board.pairs().collect::<Vec<_>>(), vec![(0, 1)]);
    }

    #[test]
    fn test_board_rejects_out_of_range() {
        let mut board = AssignmentBoard::new(2);
        assert_eq!(board.assign(2, 0), Err(AssignmentError::OutOfRange { index: 2, len: 2 }));
        assert_eq!(board.assign(0, 5), Err(AssignmentError::OutOfRange { index: 5, len: 2 }));
    }

    #[test]
    fn test_board_complete_and_cost() {
        let cost = sample();
        let mut board = AssignmentBoard::new(3);
        board.assign(0, 1).unwrap();
        board.assign(1, 0).unwrap();
        assert!(!board.is_complete());
        board.assign(2, 2).unwrap();
        assert!(board.is_complete());
        assert_eq!(board.total_cost(&cost), 5.0);

        board.reset();
        assert_eq!(board.pairs().count(), 0);
    }

    #[test]
    fn test_hint_on_empty_board_follows_optimum() {
        let hint = hint(&sample(), &AssignmentBoard::new(3)).unwrap();
        assert_eq!(hint, AssignmentHint::Assign { courier: 0, order: 1 });
    }

    #[test]
    fn test_hint_flags_wrong_entry() {
        let mut board = AssignmentBoard::new(3);
        board.assign(0, 0).unwrap();
        let hint = hint(&sample(), &board).unwrap();
        assert_eq!(hint, AssignmentHint::Reassign { courier: 0, to: 1 });
    }

    #[test]
    fn test_hint_no_errors_on_optimal_board() {
        let mut board = AssignmentBoard::new(3);
        board.assign(0, 1).unwrap();
        board.assign(1, 0).unwrap();
        board.assign(2, 2).unwrap();
        assert_eq!(hint(&sample(), &board).unwrap(), AssignmentHint::NoErrors);
    }

    #[test]
    fn test_hint_accepts_alternative_optimum() {
        // Both diagonals cost 2; either entry set is fine.
        let cost = vec![vec![1.0, 1.0], vec![1.0, 1.0]];
        let mut board = AssignmentBoard::new(2);
        board.assign(0, 1).unwrap();
        assert_eq!(hint(&cost, &board).unwrap(), AssignmentHint::Assign { courier: 1, order: 0 });
    }

    #[test]
    fn test_hint_board_mismatch() {
        assert_eq!(
            hint(&sample(), &AssignmentBoard::new(2)),
            Err(AssignmentError::BoardMismatch { board: 2, matrix: 3 })
        );
    }
}
