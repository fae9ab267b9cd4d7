//! In-memory product listing with search and category filtering.

use super::model::{Category, Product, ProductDetail, Seller, SellerContact};
use crate::error::{DigiFarmError, Result};

/// Search criteria for the listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductQuery {
    /// Matched case-insensitively against name and description.
    pub term: String,
    pub category: Option<Category>,
}

impl ProductQuery {
    pub fn new(term: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            category: None,
        }
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn matches(&self, product: &Product) -> bool {
        let term = self.term.to_lowercase();
        let matches_search = product.name.to_lowercase().contains(&term)
            || product.description.to_lowercase().contains(&term);
        let matches_category = self.category.is_none_or(|c| c == product.category);
        matches_search && matches_category
    }
}

/// Read-only product listing plus per-product page details.
#[derive(Debug, Clone)]
pub struct ProductCatalog {
    products: Vec<Product>,
    details: Vec<ProductDetail>,
}

impl ProductCatalog {
    pub fn new(products: Vec<Product>, details: Vec<ProductDetail>) -> Self {
        Self { products, details }
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn categories(&self) -> &'static [Category] {
        &Category::ALL
    }

    pub fn get(&self, id: u32) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Products matching `query`, in listing order.
    pub fn search(&self, query: &ProductQuery) -> Vec<&Product> {
        self.products.iter().filter(|p| query.matches(p)).collect()
    }

    /// Full page data for product `id`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no page exists for `id`. Every product of the
    /// built-in listing has one.
    pub fn detail(&self, id: u32) -> Result<&ProductDetail> {
        self.details
            .iter()
            .find(|d| d.product.id == id)
            .ok_or_else(|| DigiFarmError::not_found("product", id.to_string()))
    }

    /// The built-in listing of six products.
    pub fn builtin() -> Self {
        let products = vec![
            product(
                1,
                "Organic Apples",
                "Fresh organic apples grown without pesticides. Sweet and juicy.",
                "https://images.pexels.com/photos/1510392/pexels-photo-1510392.jpeg?auto=compress&cs=tinysrgb&w=800",
                120,
                "kg",
                Category::Fruits,
                4.7,
                ("Green Valley Farms", "Karnataka"),
            ),
            product(
                2,
                "Fresh Tomatoes",
                "Ripe and juicy tomatoes, perfect for salads and cooking.",
                "https://images.pexels.com/photos/1327838/pexels-photo-1327838.jpeg?auto=compress&cs=tinysrgb&w=800",
                60,
                "kg",
                Category::Vegetables,
                4.5,
                ("Sunshine Organic Farm", "Tamil Nadu"),
            ),
            product(
                3,
                "Fresh Carrots",
                "Crisp and sweet carrots, freshly harvested.",
                "https://images.pexels.com/photos/143133/pexels-photo-143133.jpeg?auto=compress&cs=tinysrgb&w=800",
                40,
                "kg",
                Category::Vegetables,
                4.3,
                ("Greenfields", "Kerala"),
            ),
            product(
                4,
                "Organic Strawberries",
                "Sweet and aromatic strawberries grown organically.",
                "https://images.pexels.com/photos/46174/strawberries-berries-fruit-freshness-46174.jpeg?auto=compress&cs=tinysrgb&w=800",
                180,
                "kg",
                Category::Fruits,
                4.8,
                ("Berry Good Farms", "Himachal Pradesh"),
            ),
            product(
                5,
                "Fresh Spinach",
                "Nutrient-rich spinach leaves, freshly harvested.",
                "https://images.pexels.com/photos/2325843/pexels-photo-2325843.jpeg?auto=compress&cs=tinysrgb&w=800",
                30,
                "bunch",
                Category::Vegetables,
                4.4,
                ("Green Earth Farms", "Punjab"),
            ),
            product(
                6,
                "Fresh Marigold Flowers",
                "Vibrant marigold flowers for decoration and religious purposes.",
                "https://images.pexels.com/photos/19373325/pexels-photo-19373325/free-photo-of-marigold-flowers-in-bloom.jpeg?auto=compress&cs=tinysrgb&w=800",
                50,
                "bunch",
                Category::Flowers,
                4.6,
                ("Blooming Fields", "Gujarat"),
            ),
        ];

        let apples = ProductDetail {
            product: Product {
                description: "Fresh organic apples grown without pesticides. These sweet and juicy apples are harvested from our family-owned orchard. We prioritize sustainable farming practices to ensure the highest quality produce while protecting the environment.".to_string(),
                ..products[0].clone()
            },
            long_description: "Our organic apples are grown using traditional farming methods without the use of synthetic pesticides or fertilizers. We use natural compost to nourish the soil and beneficial insects to control pests. These apples are harvested at peak ripeness to ensure maximum flavor and nutritional value. Perfect for eating fresh, baking, or making homemade applesauce.".to_string(),
            reviews: 24,
            available_quantity: 50,
            farming_method: "Organic".to_string(),
            harvest_date: "3 days ago".to_string(),
            seller: SellerContact {
                name: "Green Valley Farms".to_string(),
                location: "Shivamogga, Karnataka".to_string(),
                joined_date: "Member since March 2023".to_string(),
                phone: "+91 98765 43210".to_string(),
                email: "contact@greenvalleyfarms.com".to_string(),
                response_rate: "95%".to_string(),
                other_products: 12,
            },
        };

        let details = products
            .iter()
            .map(|listed| {
                if listed.id == apples.product.id {
                    apples.clone()
                } else {
                    page_from_template(listed, &apples)
                }
            })
            .collect();

        Self::new(products, details)
    }
}

impl Default for ProductCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Page for a listed product that has no hand-written page: listing fields
/// and seller identity come from `listed`, the rest from `template`.
fn page_from_template(listed: &Product, template: &ProductDetail) -> ProductDetail {
    ProductDetail {
        product: listed.clone(),
        seller: SellerContact {
            name: listed.seller.name.clone(),
            location: listed.seller.location.clone(),
            ..template.seller.clone()
        },
        ..template.clone()
    }
}

#[allow(clippy::too_many_arguments)]
fn product(
    id: u32,
    name: &str,
    description: &str,
    image: &str,
    price: u32,
    unit: &str,
    category: Category,
    rating: f32,
    (seller_name, seller_location): (&str, &str),
) -> Product {
    Product {
        id,
        name: name.to_string(),
        description: description.to_string(),
        image: image.to_string(),
        price,
        unit: unit.to_string(),
        category,
        rating,
        seller: Seller {
            name: seller_name.to_string(),
            location: seller_location.to_string(),
        },
    }
}
