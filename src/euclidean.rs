//! Euclidean cost matrix provider for the courier assignment game.
//!
//! The game map is flat, so travel time is straight-line distance on the
//! (x, z) plane scaled by a fixed number of minutes per map unit.

use crate::traits::{CostMatrixProvider, Courier, Order};

/// Minutes of travel per map unit.
pub const DEFAULT_MINUTES_PER_UNIT: f64 = 0.1;

/// Euclidean travel-time provider.
///
/// A courier's cost for an order is the time to ride to the restaurant plus
/// the time from the restaurant to the customer, rounded to one decimal.
#[derive(Debug, Clone)]
pub struct EuclideanMatrix {
    /// Minutes per map unit.
    pub minutes_per_unit: f64,
}

impl Default for EuclideanMatrix {
    fn default() -> Self {
        Self {
            minutes_per_unit: DEFAULT_MINUTES_PER_UNIT,
        }
    }
}

impl EuclideanMatrix {
    pub fn new(minutes_per_unit: f64) -> Self {
        Self { minutes_per_unit }
    }

    /// Straight-line distance between two map points.
    fn distance(from: (f64, f64), to: (f64, f64)) -> f64 {
        (to.0 - from.0).hypot(to.1 - from.1)
    }

    /// Minutes for a courier at `start` to deliver from `pickup` to `dropoff`.
    pub fn delivery_minutes(&self, start: (f64, f64), pickup: (f64, f64), dropoff: (f64, f64)) -> f64 {
        let units = Self::distance(start, pickup) + Self::distance(pickup, dropoff);
        round_to_tenth(units * self.minutes_per_unit)
    }
}

impl CostMatrixProvider for EuclideanMatrix {
    fn matrix_for<C, O>(&self, couriers: &[C], orders: &[O]) -> Vec<Vec<f64>>
    where
        C: Courier,
        O: Order,
    {
        couriers
            .iter()
            .map(|courier| {
                orders
                    .iter()
                    .map(|order| {
                        self.delivery_minutes(
                            courier.location(),
                            order.pickup_location(),
                            order.dropoff_location(),
                        )
                    })
                    .collect()
            })
            .collect()
    }
}

/// Round to one decimal place.
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
