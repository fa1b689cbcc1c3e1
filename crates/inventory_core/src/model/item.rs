//! Item domain model.
//!
//! # Responsibility
//! - Define the single inventory record persisted in the `items` table.
//! - Own the record invariant shared by storage and presentation layers.
//!
//! # Invariants
//! - `id` is assigned by storage and never changes after creation.
//! - `name` and `category` are non-blank.
//! - `price` is finite and non-negative; `quantity` is unsigned by type.
//! - Duplicate name/category pairs are legal.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage-generated identifier of a persisted item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub i64);

impl ItemId {
    pub fn get(self) -> i64 {
        self.0
    }
}

impl Display for ItemId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for ItemId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// Invariant violation detected on an item value.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemValidationError {
    EmptyName,
    EmptyCategory,
    InvalidPrice(f64),
}

impl Display for ItemValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "item name cannot be empty"),
            Self::EmptyCategory => write!(f, "item category cannot be empty"),
            Self::InvalidPrice(price) => {
                write!(f, "item price must be finite and non-negative, got {price}")
            }
        }
    }
}

impl Error for ItemValidationError {}

/// Item fields before storage has assigned an id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewItem {
    pub name: String,
    pub category: String,
    pub quantity: u32,
    pub price: f64,
}

impl NewItem {
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        quantity: u32,
        price: f64,
    ) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            quantity,
            price,
        }
    }

    /// Checks the record invariant.
    ///
    /// # Errors
    /// - First violated rule in order: name, category, price.
    pub fn validate(&self) -> Result<(), ItemValidationError> {
        validate_fields(&self.name, &self.category, self.price)
    }

    /// Binds these fields to a storage id.
    pub fn with_id(self, id: ItemId) -> Item {
        Item {
            id,
            name: self.name,
            category: self.category,
            quantity: self.quantity,
            price: self.price,
        }
    }
}

/// Persisted inventory record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub category: String,
    pub quantity: u32,
    pub price: f64,
}

impl Item {
    /// Checks the record invariant. Same rules as [`NewItem::validate`].
    pub fn validate(&self) -> Result<(), ItemValidationError> {
        validate_fields(&self.name, &self.category, self.price)
    }
}

fn validate_fields(name: &str, category: &str, price: f64) -> Result<(), ItemValidationError> {
    if name.trim().is_empty() {
        return Err(ItemValidationError::EmptyName);
    }
    if category.trim().is_empty() {
        return Err(ItemValidationError::EmptyCategory);
    }
    if !price.is_finite() || price < 0.0 {
        return Err(ItemValidationError::InvalidPrice(price));
    }
    Ok(())
}
