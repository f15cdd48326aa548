//! Core domain traits for the puzzle solvers.
//!
//! The solvers only need positions, weights and values. Concrete games
//! implement these traits for their own data models; the shipped catalog
//! lives in [`crate::catalog`].

/// A courier that can be matched to exactly one order.
pub trait Courier {
    fn name(&self) -> &str;

    /// Map coordinate (x, z).
    fn location(&self) -> (f64, f64);
}

/// A delivery order: pick up at a restaurant, drop off at a customer.
pub trait Order {
    fn restaurant(&self) -> &str;

    fn customer(&self) -> &str;

    /// Restaurant coordinate (x, z).
    fn pickup_location(&self) -> (f64, f64);

    /// Customer coordinate (x, z).
    fn dropoff_location(&self) -> (f64, f64);
}

/// An item that can be packed into the knapsack.
pub trait Item {
    fn name(&self) -> &str;

    /// Weight in kilograms, strictly positive.
    fn weight_kg(&self) -> f64;

    /// Value in currency units.
    fn value(&self) -> u32;
}

/// Provides a courier × order cost matrix (minutes).
///
/// Row `i` belongs to `couriers[i]`, column `j` to `orders[j]`.
pub trait CostMatrixProvider {
    fn matrix_for<C, O>(&self, couriers: &[C], orders: &[O]) -> Vec<Vec<f64>>
    where
        C: Courier,
        O: Order;
}
