//! Marketplace listing models.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DigiFarmError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Fruits,
    Vegetables,
    Flowers,
}

impl Category {
    /// All categories in display order.
    pub const ALL: [Category; 3] = [Category::Fruits, Category::Vegetables, Category::Flowers];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Fruits => "Fruits",
            Category::Vegetables => "Vegetables",
            Category::Flowers => "Flowers",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = DigiFarmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DigiFarmError::validation(format!("Unknown category '{}'", s.trim())))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seller {
    pub name: String,
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: u32,
    pub name: String,
    pub description: String,
    pub image: String,
    /// Price per unit in rupees.
    pub price: u32,
    pub unit: String,
    pub category: Category,
    pub rating: f32,
    pub seller: Seller,
}

/// Seller details shown on the product page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SellerContact {
    pub name: String,
    pub location: String,
    pub joined_date: String,
    pub phone: String,
    pub email: String,
    pub response_rate: String,
    pub other_products: u32,
}

/// Everything the product page needs beyond the listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetail {
    pub product: Product,
    pub long_description: String,
    pub reviews: u32,
    pub available_quantity: u32,
    pub farming_method: String,
    pub harvest_date: String,
    pub seller: SellerContact,
}
