//! Attribute mapper: raw catalog records → canonical parts
//!
//! Mapping is total. Every record produces a `Part`, however sparse; values
//! that cannot be parsed keep their text and lose only the numeric field.

pub mod category;
pub mod params;
pub mod record;
pub mod search;
pub mod status;
pub mod transform;

use std::collections::HashSet;
use tracing::debug;

use crate::entities::{ParametricAttribute, Part, PartAttributes, UNKNOWN_MANUFACTURER};
use crate::yaml::YamlError;

pub use category::resolve_category;
pub use params::{ParamMap, ParamMapping, UnitFamily};
pub use record::{CatalogCategory, CatalogParameter, CatalogProduct, KeywordSearchResponse};
pub use search::{reduce_search, SearchOutcome};
pub use status::normalize_status;
pub use transform::{RecoveryCategory, ValueTransform};

/// Values catalogs use to mean "not specified"
const BLANK_VALUES: &[&str] = &["", "-", "N/A"];

fn is_blank(value: &str) -> bool {
    BLANK_VALUES.iter().any(|b| b.eq_ignore_ascii_case(value))
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Converts catalog records using a parameter map
#[derive(Debug, Clone)]
pub struct AttributeMapper {
    params: ParamMap,
}

impl AttributeMapper {
    pub fn new(params: ParamMap) -> Self {
        Self { params }
    }

    /// Mapper over the embedded parameter map
    pub fn with_defaults() -> Result<Self, YamlError> {
        Ok(Self::new(ParamMap::embedded()?))
    }

    pub fn params(&self) -> &ParamMap {
        &self.params
    }

    /// Identity and descriptive fields of a record
    pub fn map_part(&self, product: &CatalogProduct) -> Part {
        let (category, subcategory) = resolve_category(product.category.as_ref());
        let description = product.description.as_ref();

        let manufacturer = non_empty(
            product
                .manufacturer
                .as_ref()
                .and_then(|m| m.name.as_deref()),
        )
        .unwrap_or_else(|| UNKNOWN_MANUFACTURER.to_string());

        Part {
            mpn: product.mpn().to_string(),
            manufacturer,
            description: non_empty(description.and_then(|d| d.product_description.as_deref()))
                .unwrap_or_default(),
            detailed_description: non_empty(
                description.and_then(|d| d.detailed_description.as_deref()),
            ),
            category,
            subcategory,
            status: normalize_status(
                product
                    .product_status
                    .as_ref()
                    .and_then(|s| s.status.as_deref()),
            ),
            vendor_part_number: product.vendor_part_number().map(str::to_string),
            unit_price: product.unit_price,
            quantity_available: product.quantity_available,
            product_url: non_empty(product.product_url.as_deref()),
            datasheet_url: non_empty(product.datasheet_url.as_deref()),
            image_url: non_empty(product.photo_url.as_deref()),
            series: non_empty(product.series.as_ref().and_then(|s| s.name.as_deref())),
        }
    }

    /// Part plus canonical attributes, ordered by the parameter map
    pub fn map_attributes(&self, product: &CatalogProduct) -> PartAttributes {
        let part = self.map_part(product);
        let mapped_count = self.params.len_for(part.category);

        let mut seen = HashSet::new();
        let mut parameters = Vec::new();
        let mut unmapped = 0u32;

        for param in &product.parameters {
            let Some(raw_name) = non_empty(param.parameter_text.as_deref()) else {
                continue;
            };
            let raw_value = param.value_text.as_deref().unwrap_or("").trim();

            match self.params.lookup(part.category, &part.subcategory, &raw_name) {
                Some((position, mapping)) => {
                    if seen.contains(&mapping.attribute_id) {
                        continue;
                    }
                    if let Some(attribute) = map_value(mapping, raw_value, position) {
                        seen.insert(mapping.attribute_id.clone());
                        parameters.push(attribute);
                    }
                }
                None => {
                    let attribute_id = params::slugify(&raw_name);
                    if attribute_id.is_empty() || is_blank(raw_value) || seen.contains(&attribute_id)
                    {
                        continue;
                    }
                    debug!(mpn = %part.mpn, parameter = %raw_name, "unmapped parameter");
                    unmapped += 1;
                    seen.insert(attribute_id.clone());
                    parameters.push(ParametricAttribute {
                        attribute_id,
                        attribute_name: raw_name,
                        value: raw_value.to_string(),
                        numeric_value: None,
                        sort_order: mapped_count + unmapped,
                    });
                }
            }
        }

        parameters.sort_by_key(|p| p.sort_order);
        PartAttributes::new(part, parameters)
    }
}

/// Build one attribute from a mapped parameter; `None` drops it
fn map_value(mapping: &ParamMapping, raw_value: &str, position: u32) -> Option<ParametricAttribute> {
    let (value, numeric_value) = match mapping.transform {
        Some(ValueTransform::AutomotiveFlag) => {
            transform::apply_transform(ValueTransform::AutomotiveFlag, raw_value)?
        }
        _ if is_blank(raw_value) => return None,
        Some(t) => transform::apply_transform(t, raw_value)?,
        None => (raw_value.to_string(), mapping.unit.extract(raw_value)),
    };

    Some(ParametricAttribute {
        attribute_id: mapping.attribute_id.clone(),
        attribute_name: mapping.attribute_name.clone(),
        value,
        numeric_value,
        sort_order: position,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{PartCategory, PartStatus};

    fn mlcc_record() -> CatalogProduct {
        serde_json::from_str(
            r#"{
                "Description": {"ProductDescription": "CAP CER 0.1UF 50V X7R 0603"},
                "Manufacturer": {"Id": 490, "Name": "Murata Electronics"},
                "ManufacturerProductNumber": "GRM188R71H104KA93D",
                "ProductStatus": {"Status": "Active"},
                "Category": {
                    "Name": "Capacitors",
                    "ChildCategories": [{"Name": "Ceramic Capacitors"}]
                },
                "Parameters": [
                    {"ParameterText": "Packaging", "ValueText": "Cut Tape (CT)"},
                    {"ParameterText": "Capacitance", "ValueText": "0.1 µF"},
                    {"ParameterText": "Voltage - Rated", "ValueText": "50V"},
                    {"ParameterText": "Temperature Coefficient", "ValueText": "X7R"},
                    {"ParameterText": "Ratings", "ValueText": "-"},
                    {"ParameterText": "Height - Seated (Max)", "ValueText": "-"},
                    {"ParameterText": "Thickness (Max)", "ValueText": "0.035\" (0.90mm)"},
                    {"ParameterText": "Failure Rate", "ValueText": "-"},
                    {"ParameterText": "Applications", "ValueText": "General Purpose"}
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_map_part_fields() {
        let mapper = AttributeMapper::with_defaults().unwrap();
        let part = mapper.map_part(&mlcc_record());
        assert_eq!(part.mpn, "GRM188R71H104KA93D");
        assert_eq!(part.manufacturer, "Murata Electronics");
        assert_eq!(part.category, PartCategory::Capacitors);
        assert_eq!(part.subcategory, "MLCC");
        assert_eq!(part.status, PartStatus::Active);
    }

    #[test]
    fn test_missing_manufacturer_is_unknown() {
        let mapper = AttributeMapper::with_defaults().unwrap();
        let part = mapper.map_part(&CatalogProduct::default());
        assert_eq!(part.manufacturer, UNKNOWN_MANUFACTURER);
        assert_eq!(part.category, PartCategory::Ics);
    }

    #[test]
    fn test_map_attributes_numeric_values() {
        let mapper = AttributeMapper::with_defaults().unwrap();
        let attrs = mapper.map_attributes(&mlcc_record());

        let cap = attrs.get("capacitance").unwrap();
        assert!((cap.numeric_value.unwrap() - 1e-7).abs() < 1e-18);
        assert_eq!(attrs.get("voltage_rated").unwrap().numeric_value, Some(50.0));
        assert_eq!(attrs.get("dielectric").unwrap().value, "X7R");
        assert_eq!(attrs.get("dielectric").unwrap().numeric_value, None);
    }

    #[test]
    fn test_automotive_flag_survives_dash() {
        let mapper = AttributeMapper::with_defaults().unwrap();
        let attrs = mapper.map_attributes(&mlcc_record());
        assert_eq!(attrs.get("aec_q200").unwrap().value, "No");
    }

    #[test]
    fn test_first_spelling_wins_and_blank_dropped() {
        let mapper = AttributeMapper::with_defaults().unwrap();
        let attrs = mapper.map_attributes(&mlcc_record());
        let height = attrs.get("height").unwrap();
        assert_eq!(height.numeric_value, Some(0.90));
        assert!(!attrs.has("failure_rate"));
    }

    #[test]
    fn test_unmapped_kept_after_mapped() {
        let mapper = AttributeMapper::with_defaults().unwrap();
        let attrs = mapper.map_attributes(&mlcc_record());
        let applications = attrs.get("applications").unwrap();
        assert_eq!(applications.attribute_name, "Applications");
        assert_eq!(attrs.parameters.last().unwrap().attribute_id, "applications");

        let ids: HashSet<&str> = attrs.parameters.iter().map(|p| p.attribute_id.as_str()).collect();
        assert_eq!(ids.len(), attrs.parameters.len());
    }

    #[test]
    fn test_sort_order_follows_map() {
        let mapper = AttributeMapper::with_defaults().unwrap();
        let attrs = mapper.map_attributes(&mlcc_record());
        let orders: Vec<u32> = attrs.parameters.iter().map(|p| p.sort_order).collect();
        let mut sorted = orders.clone();
        sorted.sort();
        assert_eq!(orders, sorted);
        // capacitance is listed before packaging in the map
        assert!(attrs.get("capacitance").unwrap().sort_order < attrs.get("packaging").unwrap().sort_order);
    }
}
