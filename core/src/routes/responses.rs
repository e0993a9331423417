#![deny(missing_docs)]

//! # Response Selection
//!
//! Picks the response an endpoint replies with, and the media type whose
//! schema describes a body.

use crate::oas::models::{HttpMethod, Response};
use crate::oas::refs::RefOr;
use indexmap::IndexMap;

const DEFAULT_STATUS: u16 = 200;

/// Status codes tried first for `method`, in order.
///
/// POST prefers 201 then 200, PUT and PATCH 200 then 204, DELETE 204 then
/// 200, everything else 200.
pub fn preferred_statuses(method: HttpMethod) -> &'static [&'static str] {
    match method {
        HttpMethod::Post => &["201", "200"],
        HttpMethod::Put | HttpMethod::Patch => &["200", "204"],
        HttpMethod::Delete => &["204", "200"],
        _ => &["200"],
    }
}

/// Selects the response for `method`.
///
/// Falls back from the preferred codes to the smallest numeric code, and
/// from there to the first declared entry (e.g. only `default`).
pub fn select_response(
    method: HttpMethod,
    responses: &IndexMap<String, RefOr<Response>>,
) -> Option<(&str, &RefOr<Response>)> {
    for code in preferred_statuses(method) {
        if let Some((key, response)) = responses.get_key_value(*code) {
            return Some((key.as_str(), response));
        }
    }

    let numeric = responses
        .iter()
        .filter_map(|(key, response)| key.parse::<u16>().ok().map(|n| (n, key, response)))
        .min_by_key(|(n, _, _)| *n);
    if let Some((_, key, response)) = numeric {
        return Some((key.as_str(), response));
    }

    responses
        .first()
        .map(|(key, response)| (key.as_str(), response))
}

/// The HTTP status for a Responses key: the code itself, the base of a
/// range like `2XX`, or 200 for `default`.
pub fn status_code(key: &str) -> u16 {
    if let Ok(code) = key.parse::<u16>() {
        return code;
    }
    let mut chars = key.chars();
    match (chars.next(), chars.as_str()) {
        (Some(digit @ '1'..='5'), "XX" | "xx") => {
            u16::from(digit as u8 - b'0') * 100
        }
        _ => DEFAULT_STATUS,
    }
}

/// Selects the most appropriate media type for JSON-like payloads.
///
/// Preference order:
/// 1. `application/json`
/// 2. Any `+json` media type (e.g. `application/vnd.api+json`)
/// 3. `application/*`
/// 4. `*/*`
/// 5. First available entry
pub fn select_media_type<T>(content: &IndexMap<String, T>) -> Option<(&str, &T)> {
    let pick = |key: &str| content.get_key_value(key).map(|(k, v)| (k.as_str(), v));

    pick("application/json")
        .or_else(|| {
            content
                .iter()
                .find(|(key, _)| key.ends_with("+json"))
                .map(|(k, v)| (k.as_str(), v))
        })
        .or_else(|| pick("application/*"))
        .or_else(|| pick("*/*"))
        .or_else(|| content.first().map(|(k, v)| (k.as_str(), v)))
}
