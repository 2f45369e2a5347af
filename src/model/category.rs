//! Supported categories and their storage codes

/// Categories the listing site partitions profiles by
pub const SUPPORTED_CATEGORIES: [&str; 5] = ["english", "spanish", "japanese", "italian", "russian"];

/// Returns true if the category can be crawled
pub fn is_supported(category: &str) -> bool {
    SUPPORTED_CATEGORIES.contains(&category)
}

/// Returns the short code a category is stored under
pub fn category_code(category: &str) -> Option<&'static str> {
    match category {
        "english" => Some("eng"),
        "spanish" => Some("sp"),
        "japanese" => Some("jpn"),
        "italian" => Some("it"),
        "russian" => Some("ru"),
        _ => None,
    }
}

/// Returns the human-readable name of a category ("english" -> "English")
pub fn display_name(category: &str) -> String {
    let mut chars = category.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
