//! GROQ queries against the content store.
//!
//! Every product projection resolves slugs to plain strings and image assets
//! to URLs, so results decode straight into [`crate::entities::Product`].

/// Full product, selected by `$slug`
pub const PRODUCT_BY_SLUG: &str = r#"
*[_type == "premiumApp" && slug.current == $slug][0] {
  _id,
  title,
  "slug": slug.current,
  price,
  isFree,
  requiresAccount,
  hasTrialUsage,
  publishedAt,
  isPublished,
  shortDescription,
  description,
  "mainImage": mainImage.asset->url,
  "screenshots": screenshots[].asset->url,
  "sectors": sectors[]->{ _id, name, "slug": slug.current, icon },
  features,
  platforms,
  video,
  tags,
  promotion { hasPromotion, discountPrice, startDate, endDate, isActive }
}
"#;

/// Full product, selected by `$id`; used by the checkout route
pub const PRODUCT_BY_ID: &str = r#"
*[_type == "premiumApp" && _id == $id][0] {
  _id,
  title,
  "slug": slug.current,
  price,
  isFree,
  requiresAccount,
  hasTrialUsage,
  publishedAt,
  isPublished,
  shortDescription,
  "mainImage": mainImage.asset->url,
  "sectors": sectors[]->{ _id, name, "slug": slug.current, icon },
  platforms,
  promotion { hasPromotion, discountPrice, startDate, endDate, isActive }
}
"#;

/// Marketplace listing, ordered by title
pub const PUBLISHED_PRODUCTS: &str = r#"
*[_type == "premiumApp" && isPublished == true] | order(title asc) {
  _id,
  title,
  "slug": slug.current,
  price,
  isFree,
  requiresAccount,
  hasTrialUsage,
  publishedAt,
  isPublished,
  shortDescription,
  "mainImage": mainImage.asset->url,
  "sectors": sectors[]->{ _id, name, "slug": slug.current, icon },
  features,
  platforms,
  tags,
  promotion { hasPromotion, discountPrice, startDate, endDate, isActive }
}
"#;

/// The three most recently published products
pub const FEATURED_PRODUCTS: &str = r#"
*[_type == "premiumApp" && isPublished == true] | order(publishedAt desc)[0...3] {
  _id,
  title,
  "slug": slug.current,
  price,
  isFree,
  publishedAt,
  isPublished,
  shortDescription,
  "mainImage": mainImage.asset->url,
  "sectors": sectors[]->{ _id, name, "slug": slug.current, icon },
  features,
  platforms,
  tags,
  promotion { hasPromotion, discountPrice, isActive }
}
"#;

/// Every sector, by name.
pub const SECTORS: &str = r#"
*[_type == "sector"] | order(name asc) {
  _id,
  name,
  "slug": slug.current,
  icon
}
"#;

/// Id and title of every published product, for the review form's app picker
pub const APP_LIST: &str = r#"
*[_type == "premiumApp" && isPublished == true] | order(title asc) {
  _id,
  title
}
"#;
