/// Post-processing layer turning free-text labels into graph label identifiers.
///
/// Ontology labels are arbitrary text ("Red Wine", "3D-model"), but graph node
/// labels must be plain identifiers. The sanitizer produces strings made only of
/// ASCII letters, digits and underscores that never start with a digit.
pub struct LabelSanitizer;

/// Returned when a label has no usable characters left after sanitization.
pub const FALLBACK_LABEL: &str = "Unknown";

impl LabelSanitizer {
    /// Sanitizes a single label for use as a graph node label.
    ///
    /// # Sanitization rules
    ///
    /// - Replaces spaces and hyphens with underscores
    /// - Removes all characters except ASCII alphanumerics and underscores
    /// - Prefixes `L_` when the result starts with a digit
    /// - Returns `"Unknown"` when nothing is left
    ///
    /// # Examples
    ///
    /// ```
    /// use ontograph::LabelSanitizer;
    ///
    /// assert_eq!(LabelSanitizer::sanitize("Red Wine"), "Red_Wine");
    /// assert_eq!(LabelSanitizer::sanitize("sub-class"), "sub_class");
    /// assert_eq!(LabelSanitizer::sanitize("3D model"), "L_3D_model");
    /// assert_eq!(LabelSanitizer::sanitize("C++"), "C");
    /// assert_eq!(LabelSanitizer::sanitize("!!!"), "Unknown");
    /// ```
    #[must_use]
    pub fn sanitize(label: &str) -> String {
        let sanitized = label
            .replace([' ', '-'], "_")
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
            .collect::<String>();

        if sanitized.is_empty() {
            return FALLBACK_LABEL.to_string();
        }

        if sanitized.starts_with(|c: char| c.is_ascii_digit()) {
            format!("L_{sanitized}")
        } else {
            sanitized
        }
    }
}
