//! Volatility-futures term structures and their shape classification.
//!
//! A [`TermStructure`] holds the labeled closing prices of successive monthly
//! contracts on one date. Its [`shape`](TermStructure::shape) compares only
//! the boundary values:
//! - Contango: front month strictly below the last month
//! - Backwardation: front month strictly above the last month
//! - Undefined: fewer than 2 points, or boundary values exactly equal
//!
//! Intermediate points are ignored; a non-monotonic curve is still classified
//! by its endpoints.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Term structure shape classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TermStructureShape {
    /// Longer-dated contracts price above near-dated ones.
    Contango,
    /// Near-dated contracts price above longer-dated ones.
    Backwardation,
    /// Not enough points, or flat boundary values.
    Undefined,
}

impl TermStructureShape {
    /// Classify a price curve by its boundary values alone.
    pub fn classify(prices: &[f64]) -> Self {
        if prices.len() < 2 {
            return Self::Undefined;
        }
        let first = prices[0];
        let last = prices[prices.len() - 1];
        if first < last {
            Self::Contango
        } else if first > last {
            Self::Backwardation
        } else {
            Self::Undefined
        }
    }
}

impl fmt::Display for TermStructureShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Contango => "contango",
            Self::Backwardation => "backwardation",
            Self::Undefined => "undefined",
        };
        write!(f, "{s}")
    }
}

/// One labeled contract price on the curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermStructurePoint {
    /// Position label, `"Month 1"` onwards in contract order.
    ///
    /// Labels renumber over the contracts that actually had data: a missing
    /// month shifts the labels of everything behind it. Callers must not
    /// assume `"Month 3"` is the third calendar contract.
    pub label: String,

    /// Closing price of the contract on the structure's date.
    pub price: f64,
}

/// Futures closing prices for successive contract months on a fixed date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermStructure {
    /// The date the curve was observed.
    pub date: NaiveDate,

    /// Labeled prices in contract-month order.
    pub points: Vec<TermStructurePoint>,
}

impl TermStructure {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Prices in contract-month order.
    pub fn prices(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.price).collect()
    }

    /// Classify this curve by its boundary values.
    pub fn shape(&self) -> TermStructureShape {
        TermStructureShape::classify(&self.prices())
    }
}

/// A date-indexed sequence of term-structure shapes.
///
/// This is the classification counterpart of a numeric series: one shape per
/// source timestamp, in source order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeSeries {
    points: Vec<(DateTime<Utc>, TermStructureShape)>,
}

impl ShapeSeries {
    pub fn new(points: Vec<(DateTime<Utc>, TermStructureShape)>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[(DateTime<Utc>, TermStructureShape)] {
        &self.points
    }

    pub fn iter(&self) -> impl Iterator<Item = &(DateTime<Utc>, TermStructureShape)> {
        self.points.iter()
    }
}
