//! 0/1 knapsack by exhaustive subset enumeration.
//!
//! Subsets are visited as bitmasks in increasing order; a subset replaces the
//! incumbent only when it is strictly more valuable, so among equally
//! valuable subsets the lowest mask wins.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;
use tracing::{debug, trace};

use crate::traits::Item;

/// Largest item count the bitmask enumeration accepts.
pub const MAX_ITEMS: usize = 20;

/// Slack for weight sums that land exactly on the capacity.
const WEIGHT_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone, PartialEq)]
pub enum KnapsackError {
    TooManyItems { count: usize, max: usize },
    InvalidCapacity(f64),
    /// Weight is zero, negative or not finite.
    InvalidItem { index: usize },
    ItemOutOfRange { index: usize, len: usize },
    /// Adding the item would exceed the capacity.
    OverCapacity { index: usize, weight: f64, capacity: f64 },
}

impl fmt::Display for KnapsackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KnapsackError::TooManyItems { count, max } => {
                write!(f, "{} items exceeds the enumeration limit of {}", count, max)
            }
            KnapsackError::InvalidCapacity(capacity) => write!(f, "invalid capacity {}", capacity),
            KnapsackError::InvalidItem { index } => write!(f, "item {} has an invalid weight", index),
            KnapsackError::ItemOutOfRange { index, len } => {
                write!(f, "item {} out of range for {} items", index, len)
            }
            KnapsackError::OverCapacity { index, weight, capacity } => write!(
                f,
                "adding item {} brings the weight to {} kg, over the {} kg capacity",
                index, weight, capacity
            ),
        }
    }
}

impl std::error::Error for KnapsackError {}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KnapsackSolution {
    /// Indices into the item list, ascending.
    pub selected_indices: Vec<usize>,
    pub total_value: u64,
    /// Total weight in kilograms, rounded to grams.
    pub total_weight: f64,
}

/// Most valuable subset of `items` whose weight fits in `capacity_kg`.
pub fn solve<I: Item>(items: &[I], capacity_kg: f64) -> Result<KnapsackSolution, KnapsackError> {
    validate(items, capacity_kg)?;

    // The empty subset always fits a validated capacity.
    let best = best_superset(items, capacity_kg, 0).unwrap_or_default();

    debug!(
        items = items.len(),
        capacity_kg,
        total_value = best.value,
        "knapsack solved"
    );

    Ok(best.into_solution(items.len()))
}

#[derive(Debug, Clone, Copy, Default)]
struct Subset {
    mask: u32,
    value: u64,
    weight: f64,
}

impl Subset {
    fn indices(self, len: usize) -> impl Iterator<Item = usize> {
        (0..len).filter(move |&index| self.mask & (1u32 << index) != 0)
    }

    fn into_solution(self, len: usize) -> KnapsackSolution {
        KnapsackSolution {
            selected_indices: self.indices(len).collect(),
            total_value: self.value,
            total_weight: round_to_grams(self.weight),
        }
    }
}

/// Best fitting subset that contains every item of `fixed`, scanning masks
/// in increasing order and keeping the first strictly better one.
fn best_superset<I: Item>(items: &[I], capacity_kg: f64, fixed: u32) -> Option<Subset> {
    let mut best: Option<Subset> = None;

    for mask in 0..(1u32 << items.len()) {
        if mask & fixed != fixed {
            continue;
        }
        let mut weight = 0.0_f64;
        let mut value = 0u64;
        for (index, item) in items.iter().enumerate() {
            if mask & (1u32 << index) != 0 {
                weight += item.weight_kg();
                value += u64::from(item.value());
            }
        }

        if fits(weight, capacity_kg) && best.is_none_or(|incumbent| value > incumbent.value) {
            trace!(mask, value, weight, "new best subset");
            best = Some(Subset { mask, value, weight });
        }
    }

    best
}

fn validate<I: Item>(items: &[I], capacity_kg: f64) -> Result<(), KnapsackError> {
    if items.len() > MAX_ITEMS {
        return Err(KnapsackError::TooManyItems {
            count: items.len(),
            max: MAX_ITEMS,
        });
    }
    if !capacity_kg.is_finite() || capacity_kg < 0.0 {
        return Err(KnapsackError::InvalidCapacity(capacity_kg));
    }
    if let Some(index) = items
        .iter()
        .position(|item| !item.weight_kg().is_finite() || item.weight_kg() <= 0.0)
    {
        return Err(KnapsackError::InvalidItem { index });
    }
    Ok(())
}

fn fits(weight: f64, capacity_kg: f64) -> bool {
    weight <= capacity_kg + WEIGHT_TOLERANCE
}

fn round_to_grams(weight: f64) -> f64 {
    (weight * 1000.0).round() / 1000.0
}

// ============================================================================
// Player selection
// ============================================================================

/// Items the player has packed so far.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Selection {
    chosen: BTreeSet<usize>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, index: usize) -> bool {
        self.chosen.contains(&index)
    }

    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.chosen.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.chosen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chosen.is_empty()
    }

    pub fn total_value<I: Item>(&self, items: &[I]) -> u64 {
        self.chosen
            .iter()
            .filter_map(|&index| items.get(index))
            .map(|item| u64::from(item.value()))
            .sum()
    }

    /// Total weight in kilograms, rounded to grams.
    pub fn total_weight<I: Item>(&self, items: &[I]) -> f64 {
        round_to_grams(self.raw_weight(items))
    }

    fn raw_weight<I: Item>(&self, items: &[I]) -> f64 {
        self.chosen
            .iter()
            .filter_map(|&index| items.get(index))
            .map(|item| item.weight_kg())
            .sum()
    }

    /// Whether packing `index` keeps the weight within `capacity_kg`.
    ///
    /// An item that is already packed always "fits".
    pub fn can_add<I: Item>(&self, items: &[I], capacity_kg: f64, index: usize) -> Result<bool, KnapsackError> {
        let item = items.get(index).ok_or(KnapsackError::ItemOutOfRange {
            index,
            len: items.len(),
        })?;
        if self.contains(index) {
            return Ok(true);
        }
        Ok(fits(self.raw_weight(items) + item.weight_kg(), capacity_kg))
    }

    /// Pack `index`. Returns `false` if it was already packed.
    pub fn add<I: Item>(&mut self, items: &[I], capacity_kg: f64, index: usize) -> Result<bool, KnapsackError> {
        if !self.can_add(items, capacity_kg, index)? {
            return Err(KnapsackError::OverCapacity {
                index,
                weight: round_to_grams(self.raw_weight(items) + items[index].weight_kg()),
                capacity: capacity_kg,
            });
        }
        Ok(self.chosen.insert(index))
    }

    /// Unpack `index`. Returns `false` if it was not packed.
    pub fn remove(&mut self, index: usize) -> bool {
        self.chosen.remove(&index)
    }

    pub fn clear(&mut self) {
        self.chosen.clear();
    }
}

// ============================================================================
// Hints
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "item", rename_all = "camelCase")]
pub enum KnapsackHint {
    Add(usize),
    Remove(usize),
    NoErrors,
}

impl KnapsackHint {
    pub fn message<I: Item>(&self, items: &[I]) -> String {
        let name = |index: usize| {
            items
                .get(index)
                .map(|item| item.name().to_string())
                .unwrap_or_else(|| format!("item {}", index))
        };
        match *self {
            KnapsackHint::Add(index) => format!("Try packing the {}.", name(index)),
            KnapsackHint::Remove(index) => format!("The {} is not worth its weight.", name(index)),
            KnapsackHint::NoErrors => "No mistakes so far, keep going!".to_string(),
        }
    }
}

/// Suggest the next step for the player's selection.
///
/// A selection that some optimal subset contains is kept and extended along
/// the best completion; otherwise the first item outside the solver's optimum
/// has to go.
pub fn hint<I: Item>(items: &[I], capacity_kg: f64, selection: &Selection) -> Result<KnapsackHint, KnapsackError> {
    let optimal = solve(items, capacity_kg)?;

    let mut fixed = 0u32;
    for index in selection.indices() {
        if index >= items.len() {
            return Err(KnapsackError::ItemOutOfRange {
                index,
                len: items.len(),
            });
        }
        fixed |= 1u32 << index;
    }

    if let Some(completion) = best_superset(items, capacity_kg, fixed)
        .filter(|completion| completion.value == optimal.total_value)
    {
        return Ok(match completion.indices(items.len()).find(|&index| !selection.contains(index)) {
            Some(index) => KnapsackHint::Add(index),
            None => KnapsackHint::NoErrors,
        });
    }

    // Every selection inside the solver's optimum completes to it, so some
    // selected item lies outside.
    Ok(selection
        .indices()
        .find(|index| !optimal.selected_indices.contains(index))
        .map_or(KnapsackHint::NoErrors, KnapsackHint::Remove))
}
