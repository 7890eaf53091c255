use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

/// A product record as it arrives from the catalog.
///
/// Every field is kept as raw JSON so that nulls, numeric ids and string
/// prices survive deserialization; [`normalize`] turns them into [`Product`]s.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawProduct {
    #[serde(default)]
    pub id: Value,
    #[serde(default)]
    pub name: Value,
    #[serde(default)]
    pub brand: Value,
    #[serde(default)]
    pub category: Value,
    #[serde(default)]
    pub description: Value,
    #[serde(default)]
    pub price: Value,
}

impl RawProduct {
    /// Convenience constructor for well-formed records
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        brand: impl Into<String>,
        category: impl Into<String>,
        description: impl Into<String>,
        price: f64,
    ) -> Self {
        Self {
            id: Value::String(id.into()),
            name: Value::String(name.into()),
            brand: Value::String(brand.into()),
            category: Value::String(category.into()),
            description: Value::String(description.into()),
            price: serde_json::json!(price),
        }
    }
}

/// A normalized product: all text fields present, price finite and non-negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub brand: String,
    pub category: String,
    pub description: String,
    pub price: f64,
}

impl Product {
    /// The "soup" used for vectorization: name, brand, category, description.
    pub fn composite_text(&self) -> String {
        format!(
            "{} {} {} {}",
            self.name, self.brand, self.category, self.description
        )
    }

    /// Normalize one raw record. Returns `None` when the record has no usable id.
    pub fn from_raw(raw: &RawProduct) -> Option<Self> {
        let id = text_field(&raw.id);
        if id.is_empty() {
            return None;
        }

        Some(Self {
            id,
            name: text_field(&raw.name),
            brand: text_field(&raw.brand),
            category: text_field(&raw.category),
            description: text_field(&raw.description),
            price: price_field(&raw.price),
        })
    }
}

/// Normalize a whole fetch. Malformed fields are defaulted, never rejected;
/// only records without an id are dropped.
pub fn normalize(records: &[RawProduct]) -> Vec<Product> {
    let mut dropped = 0usize;
    let products: Vec<Product> = records
        .iter()
        .filter_map(|raw| {
            let product = Product::from_raw(raw);
            if product.is_none() {
                dropped += 1;
            }
            product
        })
        .collect();

    if dropped > 0 {
        warn!("Dropped {} catalog records without an id", dropped);
    }
    products
}

fn text_field(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

fn price_field(value: &Value) -> f64 {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match parsed {
        Some(p) if p.is_finite() => p.max(0.0),
        _ => 0.0,
    }
}
