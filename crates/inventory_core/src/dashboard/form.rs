//! Data-entry form fields and their validation.
//!
//! # Invariants
//! - Checks run in a fixed order and the first failure wins: name, category,
//!   quantity format, quantity sign, price format, price sign.
//! - A form that validates always produces a `NewItem` whose own
//!   `validate()` succeeds.

use crate::model::item::{Item, NewItem};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// One editable form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Category,
    Quantity,
    Price,
}

impl Field {
    pub const ALL: [Field; 4] = [Field::Name, Field::Category, Field::Quantity, Field::Price];

    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Category => "category",
            Self::Quantity => "quantity",
            Self::Price => "price",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|field| field.label().eq_ignore_ascii_case(value.trim()))
    }
}

/// Raw text currently typed into the form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields {
    pub name: String,
    pub category: String,
    pub quantity: String,
    pub price: String,
}

impl FormFields {
    /// Pre-fills the form from a stored row.
    pub fn from_item(item: &Item) -> Self {
        Self {
            name: item.name.clone(),
            category: item.category.clone(),
            quantity: item.quantity.to_string(),
            price: item.price.to_string(),
        }
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Category => &self.category,
            Field::Quantity => &self.quantity,
            Field::Price => &self.price,
        }
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let slot = match field {
            Field::Name => &mut self.name,
            Field::Category => &mut self.category,
            Field::Quantity => &mut self.quantity,
            Field::Price => &mut self.price,
        };
        *slot = value.into();
    }

    pub fn is_empty(&self) -> bool {
        Field::ALL.into_iter().all(|field| self.get(field).is_empty())
    }
}

/// First rule a form violates, worded for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    EmptyName,
    EmptyCategory,
    InvalidQuantity,
    NegativeQuantity,
    InvalidPrice,
    NegativePrice,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let message = match self {
            Self::EmptyName => "Name cannot be empty!",
            Self::EmptyCategory => "Category cannot be empty!",
            Self::InvalidQuantity => "Invalid quantity format!",
            Self::NegativeQuantity => "Quantity cannot be negative!",
            Self::InvalidPrice => "Invalid price format!",
            Self::NegativePrice => "Price cannot be negative!",
        };
        f.write_str(message)
    }
}

impl Error for ValidationError {}

/// Turns form text into an insertable item.
///
/// Name and category are stored trimmed. Quantity must be a whole number
/// that fits in `u32`; price must be a finite decimal.
pub fn validate(fields: &FormFields) -> Result<NewItem, ValidationError> {
    let name = fields.name.trim();
    if name.is_empty() {
        return Err(ValidationError::EmptyName);
    }

    let category = fields.category.trim();
    if category.is_empty() {
        return Err(ValidationError::EmptyCategory);
    }

    let quantity: i64 = fields
        .quantity
        .trim()
        .parse()
        .map_err(|_| ValidationError::InvalidQuantity)?;
    if quantity < 0 {
        return Err(ValidationError::NegativeQuantity);
    }
    let quantity = u32::try_from(quantity).map_err(|_| ValidationError::InvalidQuantity)?;

    let price: f64 = fields
        .price
        .trim()
        .parse()
        .map_err(|_| ValidationError::InvalidPrice)?;
    if !price.is_finite() {
        return Err(ValidationError::InvalidPrice);
    }
    if price < 0.0 {
        return Err(ValidationError::NegativePrice);
    }

    Ok(NewItem::new(name, category, quantity, price))
}
