//! Diagnostic help catalog
//!
//! Every issue the validator or the run engine can report maps to a topic
//! with a title, a longer description, a concrete fix, an example and
//! reference links. Issues carry the `fix` text as their explanation; the
//! dashboard can show the full entry via [`lookup`].

use serde::{Deserialize, Serialize};

/// One catalog entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HelpEntry {
    pub title: &'static str,
    pub description: &'static str,
    pub fix: &'static str,
    pub example: &'static str,
    pub resources: &'static [&'static str],
}

/// Catalog keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HelpTopic {
    SchemaValidation,
    MissingName,
    MissingImage,
    MissingOffers,
    MissingPrice,
    MissingPriceCurrency,
    MissingAvailability,
    OffersNotObject,
    InvalidPrice,
    InvalidCurrency,
    InvalidAvailability,
    InvalidImageUrl,
    MissingDescription,
    MissingBrand,
    MissingSku,
    MissingGtin,
    MissingAggregateRating,
    MissingReview,
    InvalidRating,
    InvalidReviewCount,
    NoSchemaData,
    NoProductSchema,
    Http404,
    Http500,
    Timeout,
    Blocked,
}

impl HelpTopic {
    #[must_use]
    pub fn missing_required(field: &str) -> Option<Self> {
        match field {
            "name" => Some(Self::MissingName),
            "image" => Some(Self::MissingImage),
            "offers" => Some(Self::MissingOffers),
            _ => None,
        }
    }

    #[must_use]
    pub fn missing_recommended(field: &str) -> Option<Self> {
        match field {
            "description" => Some(Self::MissingDescription),
            "brand" => Some(Self::MissingBrand),
            "sku" => Some(Self::MissingSku),
            "gtin" => Some(Self::MissingGtin),
            "aggregateRating" => Some(Self::MissingAggregateRating),
            "review" => Some(Self::MissingReview),
            _ => None,
        }
    }

    #[must_use]
    pub fn missing_offer_field(field: &str) -> Option<Self> {
        match field {
            "price" => Some(Self::MissingPrice),
            "priceCurrency" => Some(Self::MissingPriceCurrency),
            "availability" => Some(Self::MissingAvailability),
            _ => None,
        }
    }

    /// Topic for a malformed value, keyed by the offending field name
    #[must_use]
    pub fn invalid_value(field: &str) -> Self {
        match field {
            "price" => Self::InvalidPrice,
            "priceCurrency" => Self::InvalidCurrency,
            "availability" => Self::InvalidAvailability,
            "image" => Self::InvalidImageUrl,
            "ratingValue" => Self::InvalidRating,
            "reviewCount" => Self::InvalidReviewCount,
            "offers" => Self::OffersNotObject,
            _ => Self::SchemaValidation,
        }
    }

    /// Topic for a failed navigation with this HTTP status
    #[must_use]
    pub fn for_http_status(status: u16) -> Option<Self> {
        match status {
            404 | 410 => Some(Self::Http404),
            403 | 429 => Some(Self::Blocked),
            500..=599 => Some(Self::Http500),
            _ => None,
        }
    }

    #[must_use]
    pub fn entry(self) -> &'static HelpEntry {
        lookup(self)
    }
}

/// Full catalog entry for a topic
#[must_use]
pub fn lookup(topic: HelpTopic) -> &'static HelpEntry {
    match topic {
        HelpTopic::SchemaValidation => &SCHEMA_VALIDATION,
        HelpTopic::MissingName => &MISSING_NAME,
        HelpTopic::MissingImage => &MISSING_IMAGE,
        HelpTopic::MissingOffers => &MISSING_OFFERS,
        HelpTopic::MissingPrice => &MISSING_PRICE,
        HelpTopic::MissingPriceCurrency => &MISSING_PRICE_CURRENCY,
        HelpTopic::MissingAvailability => &MISSING_AVAILABILITY,
        HelpTopic::OffersNotObject => &OFFERS_NOT_OBJECT,
        HelpTopic::InvalidPrice => &INVALID_PRICE,
        HelpTopic::InvalidCurrency => &INVALID_CURRENCY,
        HelpTopic::InvalidAvailability => &INVALID_AVAILABILITY,
        HelpTopic::InvalidImageUrl => &INVALID_IMAGE_URL,
        HelpTopic::MissingDescription => &MISSING_DESCRIPTION,
        HelpTopic::MissingBrand => &MISSING_BRAND,
        HelpTopic::MissingSku => &MISSING_SKU,
        HelpTopic::MissingGtin => &MISSING_GTIN,
        HelpTopic::MissingAggregateRating => &MISSING_AGGREGATE_RATING,
        HelpTopic::MissingReview => &MISSING_REVIEW,
        HelpTopic::InvalidRating => &INVALID_RATING,
        HelpTopic::InvalidReviewCount => &INVALID_REVIEW_COUNT,
        HelpTopic::NoSchemaData => &NO_SCHEMA_DATA,
        HelpTopic::NoProductSchema => &NO_PRODUCT_SCHEMA,
        HelpTopic::Http404 => &HTTP_404,
        HelpTopic::Http500 => &HTTP_500,
        HelpTopic::Timeout => &TIMEOUT,
        HelpTopic::Blocked => &BLOCKED,
    }
}

const PRODUCT_DOCS: &str = "https://schema.org/Product";
const GOOGLE_PRODUCT_DOCS: &str =
    "https://developers.google.com/search/docs/appearance/structured-data/product";

static SCHEMA_VALIDATION: HelpEntry = HelpEntry {
    title: "Schema Validation Error",
    description: "The structured data on this page does not conform to the schema.org Product format.",
    fix: "Check the marked field against the schema.org Product format: value types, nesting and allowed values.",
    example: r#"{"@type": "Product", "name": "Product Name", "image": "https://example.com/p.jpg", "offers": {"@type": "Offer", "price": "29.99", "priceCurrency": "USD", "availability": "InStock"}}"#,
    resources: &[PRODUCT_DOCS, GOOGLE_PRODUCT_DOCS],
};

static MISSING_NAME: HelpEntry = HelpEntry {
    title: "Missing Product Name",
    description: "Every Product needs a name; it is the field that identifies the product.",
    fix: "Add a 'name' property with the product name exactly as it appears on the page.",
    example: r#""name": "iPhone 15 Pro Max 256GB - Natural Titanium""#,
    resources: &["https://schema.org/name"],
};

static MISSING_IMAGE: HelpEntry = HelpEntry {
    title: "Missing Product Image",
    description: "Search engines need at least one product image to show rich results.",
    fix: "Add an 'image' property with an absolute image URL, or an array of URLs.",
    example: r#""image": ["https://example.com/product1.jpg", "https://example.com/product2.jpg"]"#,
    resources: &["https://schema.org/image"],
};

static MISSING_OFFERS: HelpEntry = HelpEntry {
    title: "Missing Product Offers",
    description: "Price and availability are required for a product to qualify for rich results.",
    fix: "Add an 'offers' object of type Offer with price, priceCurrency and availability.",
    example: r#""offers": {"@type": "Offer", "price": "29.99", "priceCurrency": "USD", "availability": "InStock"}"#,
    resources: &["https://schema.org/offers", "https://schema.org/Offer"],
};

static MISSING_PRICE: HelpEntry = HelpEntry {
    title: "Missing Price",
    description: "The offer does not say what the product costs.",
    fix: "Add a 'price' property inside 'offers', written as a string.",
    example: r#""price": "29.99""#,
    resources: &["https://schema.org/price"],
};

static MISSING_PRICE_CURRENCY: HelpEntry = HelpEntry {
    title: "Missing Price Currency",
    description: "The offer does not say which currency its price is in.",
    fix: "Add a 'priceCurrency' property with a 3-letter ISO 4217 code such as USD, EUR or GBP.",
    example: r#""priceCurrency": "USD""#,
    resources: &[
        "https://schema.org/priceCurrency",
        "https://en.wikipedia.org/wiki/ISO_4217",
    ],
};

static MISSING_AVAILABILITY: HelpEntry = HelpEntry {
    title: "Missing Availability",
    description: "The offer does not say whether the product can be bought.",
    fix: "Add an 'availability' property set to InStock, OutOfStock, PreOrder or LimitedAvailability.",
    example: r#""availability": "InStock""#,
    resources: &["https://schema.org/ItemAvailability"],
};

static OFFERS_NOT_OBJECT: HelpEntry = HelpEntry {
    title: "Invalid Offers Format",
    description: "The 'offers' property must be a single Offer object.",
    fix: "Replace the value of 'offers' with an object carrying the Offer properties.",
    example: r#""offers": {"@type": "Offer", "price": "29.99", "priceCurrency": "USD", "availability": "InStock"}"#,
    resources: &["https://schema.org/Offer"],
};

static INVALID_PRICE: HelpEntry = HelpEntry {
    title: "Invalid Price Format",
    description: "Prices must be plain decimal strings with no currency symbol and zero or two decimals.",
    fix: "Write the price as digits with an optional two-digit fraction, e.g. '29.99' or '100'.",
    example: r#""price": "29.99" (not 29.99 or "$29.99")"#,
    resources: &["https://schema.org/price"],
};

static INVALID_CURRENCY: HelpEntry = HelpEntry {
    title: "Invalid Currency Code",
    description: "Currency codes must be three uppercase ISO 4217 letters.",
    fix: "Use a code like USD, EUR, GBP, CAD or AUD instead of a symbol.",
    example: r#""priceCurrency": "USD" (not "$" or "US$")"#,
    resources: &["https://en.wikipedia.org/wiki/ISO_4217"],
};

static INVALID_AVAILABILITY: HelpEntry = HelpEntry {
    title: "Invalid Availability Value",
    description: "Availability must be one of the predefined schema.org values.",
    fix: "Use exactly one of: InStock, OutOfStock, PreOrder, LimitedAvailability.",
    example: r#""availability": "InStock" (not "in stock" or "available")"#,
    resources: &["https://schema.org/ItemAvailability"],
};

static INVALID_IMAGE_URL: HelpEntry = HelpEntry {
    title: "Invalid Image URL",
    description: "Image values must be absolute URLs.",
    fix: "Use absolute URLs starting with http:// or https://, as a single string or an array.",
    example: r#""image": "https://example.com/images/product.jpg""#,
    resources: &["https://schema.org/image"],
};

static MISSING_DESCRIPTION: HelpEntry = HelpEntry {
    title: "Missing Product Description",
    description: "A description helps search engines and shoppers understand the product.",
    fix: "Add a 'description' property, typically 150 to 300 characters.",
    example: r#""description": "Wireless headphones with active noise cancellation and 30-hour battery life.""#,
    resources: &["https://schema.org/description"],
};

static MISSING_BRAND: HelpEntry = HelpEntry {
    title: "Missing Brand",
    description: "Brand information helps shoppers recognise and trust the product.",
    fix: "Add a 'brand' property with the brand name or a Brand object.",
    example: r#""brand": {"@type": "Brand", "name": "Apple"}"#,
    resources: &["https://schema.org/brand", "https://schema.org/Brand"],
};

static MISSING_SKU: HelpEntry = HelpEntry {
    title: "Missing SKU",
    description: "A stock keeping unit identifies the product in your catalog.",
    fix: "Add a 'sku' property with the product's unique merchant identifier.",
    example: r#""sku": "IPHONE-15-PRO-256-NATURAL""#,
    resources: &["https://schema.org/sku"],
};

static MISSING_GTIN: HelpEntry = HelpEntry {
    title: "Missing GTIN",
    description: "Global Trade Item Numbers identify the product across retailers.",
    fix: "Add a 'gtin' property with the barcode number (UPC, EAN or ISBN).",
    example: r#""gtin": "0123456789012""#,
    resources: &["https://schema.org/gtin"],
};

static MISSING_AGGREGATE_RATING: HelpEntry = HelpEntry {
    title: "Missing Product Ratings",
    description: "Ratings can appear as stars in search results.",
    fix: "Add an 'aggregateRating' object with ratingValue and reviewCount.",
    example: r#""aggregateRating": {"@type": "AggregateRating", "ratingValue": "4.5", "reviewCount": "127"}"#,
    resources: &["https://schema.org/AggregateRating"],
};

static MISSING_REVIEW: HelpEntry = HelpEntry {
    title: "Missing Product Reviews",
    description: "Individual reviews give shoppers detailed feedback about the product.",
    fix: "Add a 'review' array of Review objects, each with a reviewRating.",
    example: r#""review": [{"@type": "Review", "author": "Jane Doe", "reviewRating": {"@type": "Rating", "ratingValue": "5"}}]"#,
    resources: &["https://schema.org/Review"],
};

static INVALID_RATING: HelpEntry = HelpEntry {
    title: "Invalid Rating Value",
    description: "Rating values must be numbers between 1 and 5.",
    fix: "Use a plain number within the rating scale, without units or words.",
    example: r#""ratingValue": "4.5" (not "4.5 stars")"#,
    resources: &["https://schema.org/ratingValue"],
};

static INVALID_REVIEW_COUNT: HelpEntry = HelpEntry {
    title: "Invalid Review Count",
    description: "Review counts must be whole numbers of 0 or more.",
    fix: "Use a non-negative integer for 'reviewCount'.",
    example: r#""reviewCount": "127" (not "127 reviews")"#,
    resources: &["https://schema.org/reviewCount"],
};

static NO_SCHEMA_DATA: HelpEntry = HelpEntry {
    title: "No Product Schema Found",
    description: "No Product structured data was found on this page.",
    fix: "Add schema.org Product markup using JSON-LD, microdata or RDFa.",
    example: r#"<script type="application/ld+json">{"@context": "https://schema.org", "@type": "Product", ...}</script>"#,
    resources: &[PRODUCT_DOCS, GOOGLE_PRODUCT_DOCS],
};

static NO_PRODUCT_SCHEMA: HelpEntry = HelpEntry {
    title: "No Product Schema Detected",
    description: "The page loaded but declares no Product.",
    fix: "Add Product markup to product pages so search engines understand them.",
    example: "Test the page with the Rich Results Test after adding markup.",
    resources: &[GOOGLE_PRODUCT_DOCS, "https://search.google.com/test/rich-results"],
};

static HTTP_404: HelpEntry = HelpEntry {
    title: "Page Not Found (404)",
    description: "The URL returned 404; the page does not exist.",
    fix: "Check that the URL is correct and update or remove broken links.",
    example: "Open the URL in a browser to confirm it exists.",
    resources: &["https://support.google.com/webmasters/answer/9370220"],
};

static HTTP_500: HelpEntry = HelpEntry {
    title: "Server Error (5xx)",
    description: "The server failed while generating the page.",
    fix: "Check the site's server logs; this is a server-side problem.",
    example: "Retry later or contact the hosting provider.",
    resources: &["https://support.google.com/webmasters/answer/9370220"],
};

static TIMEOUT: HelpEntry = HelpEntry {
    title: "Page Load Timeout",
    description: "The page did not finish loading within the navigation timeout.",
    fix: "Speed up the page or raise the navigation timeout in the run settings.",
    example: "Measure the page with PageSpeed Insights.",
    resources: &["https://pagespeed.web.dev/"],
};

static BLOCKED: HelpEntry = HelpEntry {
    title: "Crawler Blocked",
    description: "Bot protection or rate limiting refused the request.",
    fix: "Allow-list the validator in the site's bot protection, or lower concurrency and raise delays.",
    example: "Review the bot protection and robots.txt settings.",
    resources: &["https://developers.google.com/search/docs/crawling-indexing/robots/intro"],
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product_schema::{RECOMMENDED_FIELDS, REQUIRED_FIELDS, REQUIRED_OFFER_FIELDS};

    #[test]
    fn every_schema_field_has_a_topic() {
        for field in REQUIRED_FIELDS {
            assert!(HelpTopic::missing_required(field).is_some(), "{field}");
        }
        for field in RECOMMENDED_FIELDS {
            assert!(HelpTopic::missing_recommended(field).is_some(), "{field}");
        }
        for field in REQUIRED_OFFER_FIELDS {
            assert!(HelpTopic::missing_offer_field(field).is_some(), "{field}");
        }
    }

    #[test]
    fn entries_are_complete() {
        let topics = [
            HelpTopic::SchemaValidation,
            HelpTopic::InvalidPrice,
            HelpTopic::NoSchemaData,
            HelpTopic::Blocked,
            HelpTopic::Timeout,
        ];
        for topic in topics {
            let entry = lookup(topic);
            assert!(!entry.title.is_empty());
            assert!(!entry.fix.is_empty());
            assert!(!entry.resources.is_empty());
        }
    }

    #[test]
    fn http_statuses_map_to_topics() {
        assert_eq!(HelpTopic::for_http_status(404), Some(HelpTopic::Http404));
        assert_eq!(HelpTopic::for_http_status(503), Some(HelpTopic::Http500));
        assert_eq!(HelpTopic::for_http_status(429), Some(HelpTopic::Blocked));
        assert_eq!(HelpTopic::for_http_status(418), None);
    }
}
