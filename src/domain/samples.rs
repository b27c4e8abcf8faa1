//! Sample data used to seed a fresh store

use super::product::ProductDraft;

pub fn sample_categories() -> Vec<&'static str> {
    vec![
        "Dairy",
        "Bakery",
        "Fruit and Vegetables",
        "Meat and Seafood",
        "Pantry",
        "Frozen",
    ]
}

/// Sample products paired with the name of the category they belong to
pub fn sample_products() -> Vec<(ProductDraft, Option<&'static str>)> {
    let make = |item: &str, brand: &str, desc: &str| ProductDraft {
        description: Some(desc.to_string()),
        notes: Some("Use by 25/2/2024".to_string()),
        ..ProductDraft::new(item, brand)
    };

    vec![
        (make("Milk", "Dairy Farmers", "Full cream milk"), Some("Dairy")),
        (make("Bread", "Wonder", "White"), Some("Bakery")),
        (make("Butter", "Flora Proactiv", "Salted"), Some("Dairy")),
        (make("Cheese", "Bega", "Tasty"), Some("Dairy")),
        (make("Yoghurt", "Farmers Union", "Greek"), None),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_samples_are_valid() {
        for (draft, category) in sample_products() {
            assert!(draft.validate().is_ok());
            if let Some(name) = category {
                assert!(sample_categories().contains(&name));
            }
        }
    }
}
