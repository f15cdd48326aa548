//! Compiled-in game data.
//!
//! Ids equal the position in each table, so solver indices and catalog ids
//! are interchangeable.

use serde::{Deserialize, Serialize};

use crate::route::RoadDefinition;
use crate::traits::{Courier, Item, Order};

/// Knapsack capacity in kilograms.
pub const KNAPSACK_CAPACITY_KG: f64 = 5.0;

/// Route depot node id.
pub const DEPOT: usize = 0;

// ============================================================================
// Courier assignment
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct CourierSpec {
    pub id: usize,
    pub name: &'static str,
    pub location: (f64, f64),
}

impl CourierSpec {
    pub const fn new(id: usize, name: &'static str, x: f64, z: f64) -> Self {
        Self {
            id,
            name,
            location: (x, z),
        }
    }
}

impl Courier for CourierSpec {
    fn name(&self) -> &str {
        self.name
    }

    fn location(&self) -> (f64, f64) {
        self.location
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderSpec {
    pub id: usize,
    pub restaurant: &'static str,
    pub customer: &'static str,
    pub restaurant_location: (f64, f64),
    pub customer_location: (f64, f64),
}

impl OrderSpec {
    pub const fn new(
        id: usize,
        restaurant: &'static str,
        customer: &'static str,
        restaurant_location: (f64, f64),
        customer_location: (f64, f64),
    ) -> Self {
        Self {
            id,
            restaurant,
            customer,
            restaurant_location,
            customer_location,
        }
    }
}

impl Order for OrderSpec {
    fn restaurant(&self) -> &str {
        self.restaurant
    }

    fn customer(&self) -> &str {
        self.customer
    }

    fn pickup_location(&self) -> (f64, f64) {
        self.restaurant_location
    }

    fn dropoff_location(&self) -> (f64, f64) {
        self.customer_location
    }
}

pub const COURIERS: &[CourierSpec] = &[
    CourierSpec::new(0, "Anna", -38.0, -28.0),
    CourierSpec::new(1, "Ben", 40.0, -28.0),
    CourierSpec::new(2, "Clara", -38.0, 28.0),
    CourierSpec::new(3, "David", 40.0, 28.0),
];

pub const ORDERS: &[OrderSpec] = &[
    OrderSpec::new(0, "Burger Barn", "Family Miller", (-10.0, 20.0), (-30.0, 40.0)),
    OrderSpec::new(1, "Pizzeria Napoli", "Family Rossi", (-20.0, -10.0), (-45.0, 5.0)),
    OrderSpec::new(2, "Taco Loco", "Family Garcia", (15.0, 25.0), (35.0, 45.0)),
    OrderSpec::new(3, "Sushi Bar Koi", "Family Tanaka", (25.0, -15.0), (45.0, 10.0)),
];

// ============================================================================
// Knapsack
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct ItemSpec {
    pub id: usize,
    pub name: &'static str,
    pub weight_kg: f64,
    pub value: u32,
}

impl ItemSpec {
    pub const fn new(id: usize, name: &'static str, weight_kg: f64, value: u32) -> Self {
        Self {
            id,
            name,
            weight_kg,
            value,
        }
    }
}

impl Item for ItemSpec {
    fn name(&self) -> &str {
        self.name
    }

    fn weight_kg(&self) -> f64 {
        self.weight_kg
    }

    fn value(&self) -> u32 {
        self.value
    }
}

pub const ITEMS: &[ItemSpec] = &[
    ItemSpec::new(0, "Laptop", 3.0, 800),
    ItemSpec::new(1, "Camera", 0.5, 600),
    ItemSpec::new(2, "Smartphone", 0.3, 400),
    ItemSpec::new(3, "Tablet", 2.0, 500),
    ItemSpec::new(4, "Headphones", 0.8, 500),
    ItemSpec::new(5, "Smartwatch", 0.4, 300),
];

// ============================================================================
// Route
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Depot,
    Site,
}

#[derive(Debug, Clone, Serialize)]
pub struct NodeSpec {
    pub id: usize,
    pub name: &'static str,
    pub kind: NodeKind,
    pub position: (f64, f64),
}

impl NodeSpec {
    pub const fn new(id: usize, name: &'static str, kind: NodeKind, x: f64, z: f64) -> Self {
        Self {
            id,
            name,
            kind,
            position: (x, z),
        }
    }
}

pub const NODES: &[NodeSpec] = &[
    NodeSpec::new(0, "Depot", NodeKind::Depot, 0.0, 0.0),
    NodeSpec::new(1, "Bakery", NodeKind::Site, -20.0, 10.0),
    NodeSpec::new(2, "Library", NodeKind::Site, -30.0, 35.0),
    NodeSpec::new(3, "Harbor", NodeKind::Site, -5.0, 45.0),
    NodeSpec::new(4, "Market", NodeKind::Site, 15.0, 30.0),
    NodeSpec::new(5, "Station", NodeKind::Site, 35.0, 40.0),
    NodeSpec::new(6, "Museum", NodeKind::Site, 40.0, 10.0),
    NodeSpec::new(7, "Park", NodeKind::Site, 20.0, -10.0),
];

pub const ROADS: &[RoadDefinition] = &[
    RoadDefinition::new(0, 1, 4),
    RoadDefinition::new(0, 2, 6),
    RoadDefinition::new(0, 4, 9),
    RoadDefinition::new(0, 7, 5),
    RoadDefinition::new(1, 2, 3),
    RoadDefinition::new(1, 3, 5),
    RoadDefinition::new(1, 7, 6),
    RoadDefinition::new(2, 3, 4),
    RoadDefinition::new(2, 4, 7),
    RoadDefinition::new(3, 4, 3),
    RoadDefinition::new(3, 5, 6),
    RoadDefinition::new(4, 5, 4),
    RoadDefinition::new(4, 6, 8),
    RoadDefinition::new(5, 6, 3),
    RoadDefinition::new(5, 7, 7),
    RoadDefinition::new(6, 7, 4),
];
