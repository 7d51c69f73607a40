//! Raw vendor catalog records
//!
//! These mirror the JSON delivered by the catalog API (PascalCase keys). Every
//! field is optional: the mapper must cope with sparse records.

use serde::{Deserialize, Serialize};

/// One product record from the catalog
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct CatalogProduct {
    pub description: Option<ProductDescription>,
    pub manufacturer: Option<CatalogManufacturer>,
    pub manufacturer_product_number: Option<String>,
    pub unit_price: Option<f64>,
    pub product_url: Option<String>,
    pub datasheet_url: Option<String>,
    pub photo_url: Option<String>,
    pub product_variations: Vec<ProductVariation>,
    pub quantity_available: Option<u64>,
    pub product_status: Option<ProductStatus>,
    pub category: Option<CatalogCategory>,
    pub series: Option<NamedValue>,
    pub parameters: Vec<CatalogParameter>,
}

impl CatalogProduct {
    /// Manufacturer part number, trimmed; empty when absent
    pub fn mpn(&self) -> &str {
        self.manufacturer_product_number
            .as_deref()
            .map(str::trim)
            .unwrap_or("")
    }

    /// First vendor part number across the product variations
    pub fn vendor_part_number(&self) -> Option<&str> {
        self.product_variations
            .iter()
            .find_map(|v| v.vendor_product_number.as_deref())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ProductDescription {
    pub product_description: Option<String>,
    pub detailed_description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct CatalogManufacturer {
    pub id: Option<u64>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ProductVariation {
    #[serde(alias = "DigiKeyProductNumber")]
    pub vendor_product_number: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ProductStatus {
    pub id: Option<u32>,
    pub status: Option<String>,
}

/// Category node; catalogs nest these several levels deep
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct CatalogCategory {
    pub category_id: Option<u64>,
    pub name: Option<String>,
    pub child_categories: Vec<CatalogCategory>,
}

impl CatalogCategory {
    /// Category names from this node down to the deepest first child
    pub fn path(&self) -> Vec<&str> {
        let mut names = Vec::new();
        let mut node = self;
        loop {
            if let Some(name) = node.name.as_deref() {
                names.push(name);
            }
            match node.child_categories.first() {
                Some(child) => node = child,
                None => break,
            }
        }
        names
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct NamedValue {
    pub id: Option<u64>,
    pub name: Option<String>,
}

/// One name/value parametric attribute
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct CatalogParameter {
    pub parameter_id: Option<u64>,
    pub parameter_text: Option<String>,
    pub value_text: Option<String>,
}

/// Keyword search response: exact hits plus a broader product list
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct KeywordSearchResponse {
    pub products_count: Option<u64>,
    pub exact_matches: Vec<CatalogProduct>,
    pub products: Vec<CatalogProduct>,
}
