//! Field extraction rules.
//!
//! Every field is located through a structural marker on the search results
//! markup (a tag, a class pair or a data attribute). These markers are not a
//! contract from the site, so each one lives behind its own [`FieldRule`] and
//! can be replaced without touching the extraction loop.

use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};

use crate::results::{NOT_AVAILABLE, ProductRecord};
use crate::utils::unescape_html;

/// The five extracted product fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Price,
    Rating,
    Link,
    Image,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Field::Name,
        Field::Price,
        Field::Rating,
        Field::Link,
        Field::Image,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

/// Which fields an extractor run attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSelection {
    pub name: bool,
    pub price: bool,
    pub rating: bool,
    pub link: bool,
    pub image: bool,
}

impl Default for FieldSelection {
    fn default() -> Self {
        Self {
            name: true,
            price: true,
            rating: true,
            link: true,
            image: true,
        }
    }
}

impl FieldSelection {
    pub fn is_enabled(&self, field: Field) -> bool {
        match field {
            Field::Name => self.name,
            Field::Price => self.price,
            Field::Rating => self.rating,
            Field::Link => self.link,
            Field::Image => self.image,
        }
    }

    /// Copy of this selection with `field` switched off
    pub fn without(mut self, field: Field) -> Self {
        match field {
            Field::Name => self.name = false,
            Field::Price => self.price = false,
            Field::Rating => self.rating = false,
            Field::Link => self.link = false,
            Field::Image => self.image = false,
        }
        self
    }
}

/// Locates one field inside a parsed fragment
pub trait FieldRule: Send + Sync {
    /// The field this rule fills
    fn field(&self) -> Field;

    /// Value of the field, or `None` when the marker element or attribute is absent.
    /// An empty value is still a value.
    fn extract(&self, doc: &Html) -> Option<String>;
}

/// Trimmed text content of the first element matching a selector
pub struct TextRule {
    field: Field,
    selector: Selector,
}

impl TextRule {
    pub fn new(field: Field, selector: Selector) -> Self {
        Self { field, selector }
    }
}

impl FieldRule for TextRule {
    fn field(&self) -> Field {
        self.field
    }

    fn extract(&self, doc: &Html) -> Option<String> {
        let element = doc.select(&self.selector).next()?;
        Some(element.text().collect::<String>().trim().to_string())
    }
}

/// Attribute value of the first element matching a selector
pub struct AttrRule {
    field: Field,
    selector: Selector,
    attr: String,
}

impl AttrRule {
    pub fn new(field: Field, selector: Selector, attr: &str) -> Self {
        Self {
            field,
            selector,
            attr: attr.to_string(),
        }
    }
}

impl FieldRule for AttrRule {
    fn field(&self) -> Field {
        self.field
    }

    fn extract(&self, doc: &Html) -> Option<String> {
        let element = doc.select(&self.selector).next()?;
        element.value().attr(&self.attr).map(str::to_string)
    }
}

/// Product link: first anchor's `href`, unescaped and made absolute
pub struct LinkRule {
    selector: Selector,
    base_origin: String,
}

impl LinkRule {
    pub fn new(selector: Selector, base_origin: &str) -> Self {
        Self {
            selector,
            base_origin: base_origin.trim_end_matches('/').to_string(),
        }
    }
}

impl FieldRule for LinkRule {
    fn field(&self) -> Field {
        Field::Link
    }

    fn extract(&self, doc: &Html) -> Option<String> {
        let element = doc.select(&self.selector).next()?;
        let href = unescape_html(element.value().attr("href")?);
        Some(format!("{}{}", self.base_origin, href))
    }
}

/// Markers used on the marketplace's search result tiles
pub mod markers {
    pub const NAME: &str = "h2";
    pub const PRICE: &str = "[data-csa-c-price-to-pay]";
    pub const PRICE_ATTR: &str = "data-csa-c-price-to-pay";
    pub const RATING: &str = "div.a-row.a-size-small";
    pub const LINK: &str = "a.a-link-normal.s-no-outline";
    pub const IMAGE: &str = "img.s-image";
}

fn selector(css: &str) -> Selector {
    Selector::parse(css).unwrap()
}

/// One rule per field, replaceable individually
pub struct RuleSet {
    rules: [Box<dyn FieldRule>; 5],
}

impl RuleSet {
    /// Rules for the marketplace's current markup
    pub fn marketplace(base_origin: &str) -> Self {
        Self {
            rules: [
                Box::new(TextRule::new(Field::Name, selector(markers::NAME))),
                Box::new(AttrRule::new(
                    Field::Price,
                    selector(markers::PRICE),
                    markers::PRICE_ATTR,
                )),
                Box::new(TextRule::new(Field::Rating, selector(markers::RATING))),
                Box::new(LinkRule::new(selector(markers::LINK), base_origin)),
                Box::new(AttrRule::new(Field::Image, selector(markers::IMAGE), "src")),
            ],
        }
    }

    /// Replace the rule for `rule.field()`
    pub fn set(&mut self, rule: Box<dyn FieldRule>) {
        let index = rule.field().index();
        self.rules[index] = rule;
    }

    /// Apply every enabled rule to a parsed fragment
    pub fn apply(&self, doc: &Html, fields: FieldSelection) -> ParsedFragment {
        let mut parsed = ParsedFragment::default();
        for rule in &self.rules {
            let field = rule.field();
            if fields.is_enabled(field) {
                parsed.values[field.index()] =
                    rule.extract(doc).filter(|value| value != NOT_AVAILABLE);
            }
        }
        parsed
    }
}

/// Field values of one fragment; `None` stands for "N/A"
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedFragment {
    values: [Option<String>; 5],
}

impl ParsedFragment {
    pub fn get(&self, field: Field) -> Option<&str> {
        self.values[field.index()].as_deref()
    }

    /// Value as exported, with the sentinel for missing fields
    pub fn display(&self, field: Field) -> &str {
        self.get(field).unwrap_or(NOT_AVAILABLE)
    }

    pub fn is_missing(&self, field: Field) -> bool {
        self.get(field).is_none()
    }

    pub fn is_complete(&self) -> bool {
        self.values.iter().all(Option::is_some)
    }

    /// Record for the output table, only when every field is present
    pub fn into_record(self, source_file: &str) -> Option<ProductRecord> {
        let [name, price, rating, product_url, image_url] = self.values;
        Some(ProductRecord {
            name: name?,
            price: price?,
            rating: rating?,
            product_url: product_url?,
            image_url: image_url?,
            source_file: source_file.to_string(),
        })
    }
}
