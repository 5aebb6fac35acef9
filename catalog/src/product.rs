//! Product records from the source dataset.

use serde::{Deserialize, Serialize};

/// One row of the product dataset.
///
/// Field names follow the CSV header of the source data; everything is
/// kept as text because the extra columns exist only for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Unique product identifier (Amazon-style ASIN).
    pub asin: String,

    /// Product title.
    #[serde(default)]
    pub title: String,

    /// Category label.
    #[serde(rename = "categoryName", default)]
    pub category_name: String,

    /// Display price.
    #[serde(default)]
    pub price: String,

    /// Product page URL.
    #[serde(rename = "productURL", default)]
    pub product_url: String,

    /// Product image URL.
    #[serde(rename = "imgUrl", default)]
    pub img_url: String,
}

impl Product {
    /// Text used as embedding input: title and category, space separated.
    ///
    /// Empty fields stay empty strings, so the result always has the same
    /// shape for a given schema.
    pub fn embedding_text(&self) -> String {
        format!("{} {}", self.title, self.category_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn product(title: &str, category: &str) -> Product {
        Product {
            asin: "B000000001".to_string(),
            title: title.to_string(),
            category_name: category.to_string(),
            price: String::new(),
            product_url: String::new(),
            img_url: String::new(),
        }
    }

    #[test]
    fn embedding_text_joins_title_and_category() {
        let p = product("Acoustic Guitar", "Musical Instruments");
        assert_eq!(p.embedding_text(), "Acoustic Guitar Musical Instruments");
    }

    #[test]
    fn embedding_text_keeps_empty_fields_as_empty_strings() {
        assert_eq!(product("Acoustic Guitar", "").embedding_text(), "Acoustic Guitar ");
        assert_eq!(product("", "").embedding_text(), " ");
    }
}
