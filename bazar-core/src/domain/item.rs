//! Item domain model

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Measurement unit for a shopping item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Pcs,
    Kg,
    Liter,
    Dz,
    Gram,
}

impl Unit {
    /// All units, in the order they are offered to the user
    pub const ALL: [Unit; 5] = [Unit::Pcs, Unit::Kg, Unit::Liter, Unit::Dz, Unit::Gram];

    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::Pcs => "pcs",
            Unit::Kg => "kg",
            Unit::Liter => "liter",
            Unit::Dz => "dz",
            Unit::Gram => "gram",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Unit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pcs" => Ok(Unit::Pcs),
            "kg" => Ok(Unit::Kg),
            "liter" => Ok(Unit::Liter),
            "dz" => Ok(Unit::Dz),
            "gram" => Ok(Unit::Gram),
            other => Err(format!("unknown unit '{}'", other)),
        }
    }
}

/// A single line item on a shopping list.
///
/// Invariant: `is_checked` is true if and only if `price` is present.
/// All mutation goes through [`Item::check`] and [`Item::uncheck`],
/// which maintain it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: Uuid,
    pub name: String,
    /// Serialized as a plain JSON number to match the stored document shape
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub unit: Unit,
    /// Purchase price, recorded when the item is checked off.
    /// Serialized as `null` while the item is unchecked.
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub price: Option<Decimal>,
    pub is_checked: bool,
}

impl Item {
    /// Create a new unchecked item with a fresh client-side id
    pub fn new(name: impl Into<String>, amount: Decimal, unit: Unit) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            amount,
            unit,
            price: None,
            is_checked: false,
        }
    }

    /// Check the item off, recording its purchase price
    pub fn check(&mut self, price: Decimal) {
        self.price = Some(price);
        self.is_checked = true;
    }

    /// Uncheck the item. The recorded price is cleared; no history of
    /// prior prices is kept.
    pub fn uncheck(&mut self) {
        self.price = None;
        self.is_checked = false;
    }

    /// Whether the checked/price invariant holds for this item
    pub fn is_consistent(&self) -> bool {
        self.is_checked == self.price.is_some()
    }
}
