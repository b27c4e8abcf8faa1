//! Product detail rows

use serde::{Deserialize, Serialize};

use crate::domain::Product;

const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DetailField {
    Item,
    Brand,
    Category,
    Description,
    Notes,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailRow {
    pub field: DetailField,
    pub value: String,
    /// A mandatory value is blank
    pub missing: bool,
}

pub fn detail_rows(product: &Product, hide_blank: bool) -> Vec<DetailRow> {
    let mut rows = vec![
        mandatory(DetailField::Item, &product.item_name, "Mandatory item name is blank"),
        mandatory(DetailField::Brand, &product.brand_name, "Mandatory brand name is blank"),
        DetailRow {
            field: DetailField::Category,
            value: product.category_label().to_string(),
            missing: false,
        },
    ];

    for (field, value) in [
        (DetailField::Description, &product.description),
        (DetailField::Notes, &product.notes),
    ] {
        let text = value.as_deref().filter(|v| !v.is_empty());
        if text.is_none() && hide_blank {
            continue;
        }
        rows.push(DetailRow {
            field,
            value: text.unwrap_or(NOT_AVAILABLE).to_string(),
            missing: false,
        });
    }

    rows
}

fn mandatory(field: DetailField, value: &str, blank_message: &str) -> DetailRow {
    if value.is_empty() {
        DetailRow {
            field,
            value: blank_message.to_string(),
            missing: true,
        }
    } else {
        DetailRow {
            field,
            value: value.to_string(),
            missing: false,
        }
    }
}
