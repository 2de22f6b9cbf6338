// src/dtos/product.rs
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Deserialize;

use crate::error::FieldErrors;

pub const NAME_MAX_CHARS: usize = 120;
pub const PRICE_SCALE: u32 = 2;

// NUMERIC(19, 2) leaves 17 digits before the point.
const PRICE_INTEGER_DIGITS: u32 = 17;

/// Body of POST and PUT. Every field is optional so a missing one is
/// reported as a field error instead of a deserialization failure.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ProductRequest {
    pub name: Option<String>,
    pub price: Option<Decimal>,
    pub stock: Option<i64>,
}

/// A request that passed validation, ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub name: String,
    pub price: Decimal,
    pub stock: i32,
}

impl ProductRequest {
    pub fn new(name: impl Into<String>, price: Decimal, stock: i64) -> Self {
        Self {
            name: Some(name.into()),
            price: Some(price),
            stock: Some(stock),
        }
    }

    /// Checks every field and, when all pass, converts to a [`NewProduct`]
    /// with the price rounded to two decimal places. On failure every
    /// offending field has one message.
    pub fn validate(self) -> Result<NewProduct, FieldErrors> {
        let mut errors = FieldErrors::new();

        let name = match self.name {
            Some(name) if name.trim().is_empty() => {
                errors.insert("name".into(), "must not be blank".into());
                None
            }
            Some(name) if name.chars().count() > NAME_MAX_CHARS => {
                errors.insert(
                    "name".into(),
                    format!("size must be between 1 and {NAME_MAX_CHARS}"),
                );
                None
            }
            Some(name) => Some(name),
            None => {
                errors.insert("name".into(), "must not be blank".into());
                None
            }
        };

        let price = match self.price.map(round_price) {
            Some(price) if price < Decimal::ZERO => {
                errors.insert("price".into(), "must be greater than or equal to 0.00".into());
                None
            }
            Some(price) if price >= max_price() => {
                errors.insert(
                    "price".into(),
                    format!(
                        "numeric value out of bounds (<{PRICE_INTEGER_DIGITS} digits>.<{PRICE_SCALE} digits> expected)"
                    ),
                );
                None
            }
            Some(price) => Some(price),
            None => {
                errors.insert("price".into(), "must not be null".into());
                None
            }
        };

        let stock = match self.stock {
            Some(stock) if stock < 0 => {
                errors.insert("stock".into(), "must be greater than or equal to 0".into());
                None
            }
            Some(stock) => match i32::try_from(stock) {
                Ok(stock) => Some(stock),
                Err(_) => {
                    errors.insert(
                        "stock".into(),
                        format!("must be less than or equal to {}", i32::MAX),
                    );
                    None
                }
            },
            None => {
                errors.insert("stock".into(), "must not be null".into());
                None
            }
        };

        match (name, price, stock) {
            (Some(name), Some(price), Some(stock)) => Ok(NewProduct { name, price, stock }),
            _ => Err(errors),
        }
    }
}

fn round_price(price: Decimal) -> Decimal {
    price.round_dp_with_strategy(PRICE_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

fn max_price() -> Decimal {
    Decimal::from(10_i64.pow(PRICE_INTEGER_DIGITS))
}
