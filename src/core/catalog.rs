//! Catalog business logic - Marketplace filtering, sorting and pricing.
//!
//! Everything here is a pure function over a snapshot of the fetched product
//! list. The lists are small (tens of items), so results are recomputed on every
//! filter change rather than cached.

use crate::entities::Product;
use rand::Rng;
use rand::seq::SliceRandom;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Upper bound of the price slider when there are no products to derive it from.
pub const DEFAULT_MAX_PRICE: f64 = 20_000.0;

/// Number of suggestions in the "You may also like" strip.
pub const RELATED_LIMIT: usize = 3;

/// Price a buyer actually pays for a product, in GHS.
///
/// Free products cost 0 regardless of their list price or promotion. Otherwise an
/// active promotion's discount price wins over the list price. A paid product
/// with no price resolves to 0.
#[must_use]
pub fn effective_price(product: &Product) -> f64 {
    if product.is_free {
        return 0.0;
    }
    product
        .promotion
        .as_ref()
        .and_then(crate::entities::Promotion::applicable_discount)
        .or(product.price)
        .unwrap_or(0.0)
}

/// Marketplace filter state owned by the marketplace view.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterState {
    /// Free-text search over title and short description
    pub search_query: String,
    /// Selected sector slug; `None` means all sectors
    pub sector_slug: Option<String>,
    /// Inclusive `(min, max)` effective-price range
    pub price_range: (f64, f64),
}

impl Default for FilterState {
    /// No search, all sectors, and a price range of `0..=DEFAULT_MAX_PRICE`.
    ///
    /// Products priced above [`DEFAULT_MAX_PRICE`] are outside this range; use
    /// [`FilterState::for_catalog`] to open the range to the whole catalog.
    fn default() -> Self {
        Self {
            search_query: String::new(),
            sector_slug: None,
            price_range: (0.0, DEFAULT_MAX_PRICE),
        }
    }
}

impl FilterState {
    /// Unfiltered state whose price range spans every product in `products`.
    #[must_use]
    pub fn for_catalog(products: &[Product]) -> Self {
        Self {
            price_range: (0.0, max_catalog_price(products)),
            ..Self::default()
        }
    }

    /// Whether `product` passes all three predicates.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        matches_search(product, &self.search_query)
            && matches_sector(product, self.sector_slug.as_deref())
            && matches_price(product, self.price_range)
    }
}

fn matches_search(product: &Product, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let needle = query.to_lowercase();
    product.title.to_lowercase().contains(&needle)
        || product
            .short_description
            .as_deref()
            .is_some_and(|d| d.to_lowercase().contains(&needle))
}

fn matches_sector(product: &Product, sector_slug: Option<&str>) -> bool {
    sector_slug.is_none_or(|slug| product.in_sector(slug))
}

// A degenerate range (min > max) matches nothing.
fn matches_price(product: &Product, (min, max): (f64, f64)) -> bool {
    let price = effective_price(product);
    min <= price && price <= max
}

/// Returns the products matching `filter`, preserving their original order.
#[must_use]
pub fn filter_products(products: &[Product], filter: &FilterState) -> Vec<Product> {
    products
        .iter()
        .filter(|p| filter.matches(p))
        .cloned()
        .collect()
}

/// Sort orders offered by the marketplace sort select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortKey {
    /// Oldest first; undated products lead
    DateAsc,
    /// Newest first
    #[default]
    DateDesc,
    /// Cheapest effective price first
    PriceAsc,
    /// Dearest effective price first
    PriceDesc,
    /// Title A to Z, ignoring case
    NameAsc,
    /// Title Z to A, ignoring case
    NameDesc,
}

impl SortKey {
    /// Every sort key, in the order the select lists them.
    pub const ALL: [Self; 6] = [
        Self::DateDesc,
        Self::DateAsc,
        Self::PriceDesc,
        Self::PriceAsc,
        Self::NameAsc,
        Self::NameDesc,
    ];

    /// Select value used by the shell (`date-desc`, `price-asc`, ...).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DateAsc => "date-asc",
            Self::DateDesc => "date-desc",
            Self::PriceAsc => "price-asc",
            Self::PriceDesc => "price-desc",
            Self::NameAsc => "name-asc",
            Self::NameDesc => "name-desc",
        }
    }

    /// Human-readable label of the select option.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::DateAsc => "Oldest First",
            Self::DateDesc => "Newest First",
            Self::PriceAsc => "Price: Low to High",
            Self::PriceDesc => "Price: High to Low",
            Self::NameAsc => "Name: A-Z",
            Self::NameDesc => "Name: Z-A",
        }
    }

    fn compare(self, a: &Product, b: &Product) -> Ordering {
        match self {
            // Undated products sort before dated ones ascending.
            Self::DateAsc => a.published_at.cmp(&b.published_at),
            Self::DateDesc => b.published_at.cmp(&a.published_at),
            Self::PriceAsc => effective_price(a).total_cmp(&effective_price(b)),
            Self::PriceDesc => effective_price(b).total_cmp(&effective_price(a)),
            Self::NameAsc => compare_titles(a, b),
            Self::NameDesc => compare_titles(b, a),
        }
    }
}

fn compare_titles(a: &Product, b: &Product) -> Ordering {
    a.title.to_lowercase().cmp(&b.title.to_lowercase())
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = crate::errors::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| crate::errors::Error::Config {
                message: format!("Unknown sort key: {s}"),
            })
    }
}

/// Sorts products in place; the sort is stable, so equal keys keep their order.
pub fn sort_products(products: &mut [Product], key: SortKey) {
    products.sort_by(|a, b| key.compare(a, b));
}

/// Filters then sorts, the way the marketplace grid is derived.
#[must_use]
pub fn browse(products: &[Product], filter: &FilterState, sort: SortKey) -> Vec<Product> {
    let mut visible = filter_products(products, filter);
    sort_products(&mut visible, sort);
    visible
}

/// Upper bound for the price slider: the highest effective price in the catalog.
#[must_use]
pub fn max_catalog_price(products: &[Product]) -> f64 {
    products
        .iter()
        .map(effective_price)
        .max_by(f64::total_cmp)
        .unwrap_or(DEFAULT_MAX_PRICE)
}

/// Picks up to [`RELATED_LIMIT`] other products to suggest next to `current_id`.
///
/// Products sharing `sector_id` come first. When fewer than the limit share it,
/// the rest is padded with other products in random order.
pub fn related_products<R: Rng + ?Sized>(
    products: &[Product],
    current_id: &str,
    sector_id: Option<&str>,
    rng: &mut R,
) -> Vec<Product> {
    let (mut same_sector, mut others): (Vec<&Product>, Vec<&Product>) = products
        .iter()
        .filter(|p| p.id != current_id)
        .partition(|p| sector_id.is_some_and(|id| p.sectors.iter().any(|s| s.id == id)));

    same_sector.shuffle(rng);
    others.shuffle(rng);
    same_sector
        .into_iter()
        .chain(others)
        .take(RELATED_LIMIT)
        .cloned()
        .collect()
}
