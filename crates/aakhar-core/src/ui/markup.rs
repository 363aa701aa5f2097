//! Markup fragments shared by several views. All text arguments are escaped
//! here; `inner` arguments are trusted markup.

use crate::models::Category;
use crate::utils::escape_html;

use super::styles;

/// Inline message shown when a view fails to render.
pub const ROUTE_ERROR: &str = "Error: Could not load page. Please try again.";

pub const LOADING_CATEGORY: &str = "Loading category...";
pub const COULD_NOT_LOAD: &str = "Could not load data for this category.";
pub const COULD_NOT_LOAD_CATEGORIES: &str =
    "Could not load categories. Check your connection and try again.";

pub fn card(inner: &str) -> String {
    format!("<div class=\"{}\">{}</div>", styles::CARD, inner)
}

pub fn titled_card(title: &str, inner: &str) -> String {
    card(&format!("<h2>{}</h2>{}", escape_html(title), inner))
}

/// A card holding a single line of text, used for loading and failure states.
pub fn message_card(text: &str) -> String {
    card(&format!("<p>{}</p>", escape_html(text)))
}

pub fn route_error() -> String {
    format!("<p class=\"{}\">{}</p>", styles::ERROR, ROUTE_ERROR)
}

pub fn paragraph(text: &str) -> String {
    format!("<p>{}</p>", escape_html(text))
}

/// `label` is markup so arrows can use entities.
pub fn button(id: &str, label: &str, disabled: bool) -> String {
    format!(
        "<button class=\"{}\" id=\"{}\"{}>{}</button>",
        styles::BUTTON,
        id,
        if disabled { " disabled" } else { "" },
        label
    )
}

pub fn link(href: &str, label: &str, class: &str) -> String {
    format!("<a href=\"{}\" class=\"{}\">{}</a>", href, class, label)
}

/// Heading card followed by one selectable card per category. An empty list
/// means the manifest could not be loaded.
pub fn category_selector(heading: &str, prompt: &str, categories: &[Category]) -> String {
    let mut html = titled_card(heading, &paragraph(prompt));
    if categories.is_empty() {
        html.push_str(&message_card(COULD_NOT_LOAD_CATEGORIES));
        return html;
    }
    html.push_str("<div class=\"category-selector-grid\">");
    for category in categories {
        html.push_str(&format!(
            "<div class=\"category-card\" data-id=\"{}\"><h3>{}</h3></div>",
            escape_html(&category.id),
            escape_html(&category.title)
        ));
    }
    html.push_str("</div>");
    html
}
