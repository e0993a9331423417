#![deny(missing_docs)]

//! # Naming Utilities
//!
//! Derives stable operation ids for operations that do not declare one.

use crate::oas::models::HttpMethod;

/// Default id for an operation without `operationId`.
///
/// The lowercase method and the path template joined by `_`, with every `/`
/// in the template replaced by `_`. Braces are kept, so ids stay unique for
/// templates that differ only in parameter placement.
///
/// e.g. `GET /pets` -> `get__pets`
pub fn default_operation_id(method: HttpMethod, template: &str) -> String {
    format!("{}_{}", method.as_str(), template.replace('/', "_"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_operation_id() {
        assert_eq!(default_operation_id(HttpMethod::Get, "/pets"), "get__pets");
        assert_eq!(
            default_operation_id(HttpMethod::Post, "/users/{id}/activate"),
            "post__users_{id}_activate"
        );
        assert_eq!(default_operation_id(HttpMethod::Put, "newPet"), "put_newPet");
    }
}
