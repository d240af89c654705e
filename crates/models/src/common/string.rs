//! String conversion utilities.

/// Converts an empty `String` to `None`, otherwise returns `Some(value)`.
///
/// Optional labels such as a link relation treat the empty string as unset.
///
/// # Examples
///
/// ```
/// use rheactor_models::common::some_if_not_empty;
///
/// assert_eq!(some_if_not_empty("next".to_string()), Some("next".to_string()));
/// assert_eq!(some_if_not_empty(String::new()), None);
/// ```
pub fn some_if_not_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}
