//! Shopping list rendering.
//!
//! The database sums ingredient amounts per `(name, unit)` across every
//! recipe in a user's cart; this module turns those totals into the
//! downloadable plain-text document.

use serde::Serialize;

pub const SHOPPING_LIST_HEADER: &str = "Shopping list:";
pub const SHOPPING_LIST_FOOTER: &str = "Foodgram, bon appetit!";
pub const SHOPPING_LIST_FILENAME: &str = "shopping_cart.txt";

/// One aggregated line: the total amount of an ingredient in one unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShoppingListItem {
    pub name: String,
    pub measurement_unit: String,
    pub total: i64,
}

impl ShoppingListItem {
    /// `"{name} - {total} {unit}"`.
    pub fn line(&self) -> String {
        format!("{} - {} {}", self.name, self.total, self.measurement_unit)
    }
}

/// Render the document: header, one line per item, a blank line, footer.
///
/// Items keep the order they were given in.
pub fn render(items: &[ShoppingListItem]) -> String {
    let mut lines = Vec::with_capacity(items.len() + 3);
    lines.push(SHOPPING_LIST_HEADER.to_string());
    lines.extend(items.iter().map(ShoppingListItem::line));
    lines.push(String::new());
    lines.push(SHOPPING_LIST_FOOTER.to_string());
    lines.join("\n")
}

/// `Content-Disposition` value for the download.
pub fn content_disposition() -> String {
    format!("attachment; filename=\"{SHOPPING_LIST_FILENAME}\"")
}
