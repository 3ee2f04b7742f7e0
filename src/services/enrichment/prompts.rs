//! Prompt construction and response parsing for chat-based enrichment

use crate::core::types::{CategoryRef, ProductDetails};
use crate::utils::error::{PipelineError, Result};
use serde_json::Value;

pub fn translate_system(language: &str) -> String {
    format!(
        "You translate product names for a retail catalog into {}. \
         Reply with the translated name only, without quotes or commentary. \
         Keep brand names, model numbers and sizes unchanged.",
        language
    )
}

pub fn details_system(language: &str) -> String {
    format!(
        "You write catalog entries in {}. Reply with a JSON object with the keys \
         \"description\" (two or three sentences), \"brand\" (string or null) and \
         \"unit\" (unit of measure such as pcs, kg, l, m or pack).",
        language
    )
}

pub fn details_user(name: &str, category: &CategoryRef) -> String {
    match &category.parent {
        Some(parent) => format!(
            "Product: {}\nCategory: {} / {}",
            name, parent, category.name
        ),
        None => format!("Product: {}\nCategory: {}", name, category.name),
    }
}

pub fn image_prompt(name: &str, description: &str) -> String {
    format!(
        "Studio product photo of {} on a plain white background. {}",
        name, description
    )
}

/// Parse the JSON object returned for a details request
///
/// Models sometimes wrap the object in a markdown fence; that is tolerated.
pub fn parse_details(content: &str) -> Result<ProductDetails> {
    let trimmed = content
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim();

    let value: Value = serde_json::from_str(trimmed)?;
    let field = |key: &str| {
        value
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    let description = field("description")
        .ok_or_else(|| PipelineError::enrichment("details response has no description"))?;

    Ok(ProductDetails {
        description,
        brand: field("brand"),
        unit: field("unit"),
    })
}

/// Strip quotes and surrounding whitespace a model may add to a bare answer
pub fn clean_name(content: &str) -> String {
    content
        .trim()
        .trim_matches(|c| c == '"' || c == '\'' || c == '`')
        .trim()
        .to_string()
}
