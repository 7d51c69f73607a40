//! Keyword search response reduction

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::entities::{PartAttributes, PartSummary};
use crate::mapper::record::{CatalogProduct, KeywordSearchResponse};
use crate::mapper::AttributeMapper;

/// What a keyword search found, after deduplication by part number
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SearchOutcome {
    None,
    Single { part: Box<PartAttributes> },
    Multiple { parts: Vec<PartSummary> },
}

impl SearchOutcome {
    pub fn len(&self) -> usize {
        match self {
            SearchOutcome::None => 0,
            SearchOutcome::Single { .. } => 1,
            SearchOutcome::Multiple { parts } => parts.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Exact matches then general products, first occurrence of each part number kept
pub fn unique_products(response: &KeywordSearchResponse) -> Vec<&CatalogProduct> {
    let mut seen = HashSet::new();
    response
        .exact_matches
        .iter()
        .chain(response.products.iter())
        .filter(|p| seen.insert(p.mpn().to_string()))
        .collect()
}

/// Reduce a search response to none / single / multiple
pub fn reduce_search(mapper: &AttributeMapper, response: &KeywordSearchResponse) -> SearchOutcome {
    let products = unique_products(response);
    match products.as_slice() {
        [] => SearchOutcome::None,
        [only] => SearchOutcome::Single {
            part: Box::new(mapper.map_attributes(only)),
        },
        many => SearchOutcome::Multiple {
            parts: many
                .iter()
                .map(|p| PartSummary::from(&mapper.map_part(p)))
                .collect(),
        },
    }
}
