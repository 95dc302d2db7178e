use serde_json::Value;

/// Absolute URL for a media reference.
///
/// `media` is either a path/URL string or an object with a `url` field.
/// Absolute URLs pass through, relative paths get `media_origin` prepended,
/// anything else resolves to `None`.
pub fn strapi_media(media: Option<&Value>, media_origin: &str) -> Option<String> {
    let url = match media? {
        Value::String(url) => url.as_str(),
        Value::Object(fields) => fields.get("url")?.as_str()?,
        _ => return None,
    };
    resolve_media_path(url, media_origin)
}

/// Same as [`strapi_media`] for a bare path
pub fn resolve_media_path(url: &str, media_origin: &str) -> Option<String> {
    if url.is_empty() {
        return None;
    }
    if url.starts_with("http") {
        Some(url.to_string())
    } else {
        Some(format!("{}{}", media_origin, url))
    }
}
