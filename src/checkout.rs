//! Checkout Module
//!
//! Order totals with per-brand promo discounts. The order summary and the
//! notification payload both go through [`summarize`], so they always agree.
//!
//! Money is in integer minor units.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// == Cart Item ==
/// One line of a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub product_id: String,
    pub name: String,
    pub brand: String,
    /// Unit price
    pub price: u64,
    pub quantity: u32,
}

impl CartItem {
    /// Price times quantity.
    pub fn line_total(&self) -> u64 {
        self.price.saturating_mul(u64::from(self.quantity))
    }
}

// == Promo Code ==
/// A promo code granting a discount percentage per brand.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromoCode {
    pub code: String,
    /// Brand name to discount percent
    #[serde(default)]
    pub brand_discounts: HashMap<String, u32>,
}

impl PromoCode {
    /// Discount percent for `brand`, clamped to 100. Brands are matched
    /// ignoring case and surrounding whitespace; unknown brands get 0. If
    /// several keys match, the largest percent wins.
    pub fn percent_for(&self, brand: &str) -> u32 {
        let brand = brand.trim();
        self.brand_discounts
            .iter()
            .filter(|(name, _)| name.trim().eq_ignore_ascii_case(brand))
            .map(|(_, percent)| (*percent).min(100))
            .max()
            .unwrap_or(0)
    }
}

// == Order Totals ==
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderTotals {
    pub subtotal: u64,
    pub discount: u64,
    pub total: u64,
}

/// `round(price * quantity * percent / 100)`, halves rounded up.
pub fn line_discount(item: &CartItem, percent: u32) -> u64 {
    let scaled = u128::from(item.line_total()) * u128::from(percent.min(100));
    let rounded = (scaled + 50) / 100;
    u64::try_from(rounded).unwrap_or(u64::MAX)
}

// == Summarize ==
/// Computes subtotal, discount and total for a cart.
pub fn summarize(items: &[CartItem], promo: Option<&PromoCode>) -> OrderTotals {
    let subtotal = items
        .iter()
        .fold(0u64, |acc, item| acc.saturating_add(item.line_total()));

    let discount = match promo {
        Some(promo) => items.iter().fold(0u64, |acc, item| {
            acc.saturating_add(line_discount(item, promo.percent_for(&item.brand)))
        }),
        None => 0,
    };

    OrderTotals {
        subtotal,
        discount,
        total: subtotal.saturating_sub(discount),
    }
}

// == Order Notification ==
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub name: String,
    pub phone: String,
}

/// Payload handed to the external order notification sink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderNotification {
    pub order_id: String,
    pub customer: Customer,
    pub items: Vec<CartItem>,
    pub promo_code: Option<String>,
    pub totals: OrderTotals,
    pub created_at: DateTime<Utc>,
}

impl OrderNotification {
    pub fn new(
        order_id: impl Into<String>,
        customer: Customer,
        items: Vec<CartItem>,
        promo: Option<&PromoCode>,
    ) -> Self {
        let totals = summarize(&items, promo);
        Self {
            order_id: order_id.into(),
            customer,
            items,
            promo_code: promo.map(|p| p.code.clone()),
            totals,
            created_at: Utc::now(),
        }
    }
}
