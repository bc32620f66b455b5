use crate::params::{Params, lookup_non_empty};

/// Compose the greeting returned for a recorded hit.
///
/// The visitor is named by the `name` parameter, falling back to `login`.
/// Without either the greeting keeps its empty slot, so the output reads
/// `"Hello , You have hit location: /foo !"`.
pub fn greeting(params: Option<&Params>, path: &str) -> String {
    let visitor = lookup_non_empty(params, "name")
        .or_else(|| lookup_non_empty(params, "login"))
        .unwrap_or("");
    format!("Hello {visitor}, You have hit location: {path} !")
}
