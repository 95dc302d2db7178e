use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Category slug of regular articles
pub const STANDARD_POST: &str = "standard-post";
/// Category slug of podcast episodes
pub const PODCAST_POST: &str = "podcast-post";

/// Slug of the category a post belongs to (`category.Slug`)
pub fn category_slug(post: &Value) -> Option<&str> {
    post.get("category")?.get("Slug")?.as_str()
}

/// Posts whose category slug equals `slug` exactly.
///
/// Missing or empty input gives an empty list; the input is never modified.
pub fn filter_posts_by_category(posts: Option<&[Value]>, slug: &str) -> Vec<Value> {
    let posts = match posts {
        Some(posts) if !posts.is_empty() => posts,
        _ => return Vec::new(),
    };

    posts
        .iter()
        .filter(|post| category_slug(post) == Some(slug))
        .cloned()
        .collect()
}

pub fn standard_posts(posts: Option<&[Value]>) -> Vec<Value> {
    filter_posts_by_category(posts, STANDARD_POST)
}

pub fn podcast_posts(posts: Option<&[Value]>) -> Vec<Value> {
    filter_posts_by_category(posts, PODCAST_POST)
}

/// Typed view over the handful of post fields listings care about.
/// Entries are schema-less, so every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostSummary {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub category: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
}

impl PostSummary {
    pub fn from_value(post: &Value) -> Self {
        let published_at = text_field(post, &["publishedAt", "PublishedAt"]).and_then(|raw| {
            DateTime::parse_from_rfc3339(&raw)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| log::debug!("Ignoring unparsable publishedAt '{}': {}", raw, e))
                .ok()
        });

        Self {
            title: text_field(post, &["Title", "title"]),
            slug: text_field(post, &["Slug", "slug"]),
            category: category_slug(post).map(str::to_string),
            published_at,
        }
    }
}

// Content types mix "Title" and "title" style field names
fn text_field(post: &Value, names: &[&str]) -> Option<String> {
    names
        .iter()
        .find_map(|name| post.get(*name).and_then(Value::as_str))
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_posts() -> Vec<Value> {
        vec![
            json!({ "id": 1, "category": { "Slug": "standard-post" } }),
            json!({ "id": 2, "category": { "Slug": "podcast-post" } }),
        ]
    }

    #[test]
    fn test_filter_by_category() {
        let posts = sample_posts();
        let filtered = filter_posts_by_category(Some(&posts), "standard-post");
        assert_eq!(filtered, vec![posts[0].clone()]);
    }

    #[test]
    fn test_filter_missing_input() {
        assert!(filter_posts_by_category(None, "standard-post").is_empty());
        assert!(filter_posts_by_category(Some(&[]), "standard-post").is_empty());
    }

    #[test]
    fn test_posts_without_category_are_skipped() {
        let posts = vec![
            json!({ "id": 1 }),
            json!({ "id": 2, "category": null }),
            json!({ "id": 3, "category": { "slug": "standard-post" } }),
            json!({ "id": 4, "category": { "Slug": "standard-post" } }),
        ];
        let filtered = standard_posts(Some(&posts));
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0]["id"], 4);
    }

    #[test]
    fn test_named_wrappers() {
        let posts = sample_posts();
        assert_eq!(standard_posts(Some(&posts))[0]["id"], 1);
        assert_eq!(podcast_posts(Some(&posts))[0]["id"], 2);
        assert_eq!(posts.len(), 2);
    }

    #[test]
    fn test_post_summary() {
        let post = json!({
            "Title": "Shipping on Fridays",
            "Slug": "shipping-on-fridays",
            "publishedAt": "2024-03-01T09:30:00.000Z",
            "category": { "Slug": "standard-post" }
        });
        let summary = PostSummary::from_value(&post);

        assert_eq!(summary.title.as_deref(), Some("Shipping on Fridays"));
        assert_eq!(summary.slug.as_deref(), Some("shipping-on-fridays"));
        assert_eq!(summary.category.as_deref(), Some(STANDARD_POST));
        assert_eq!(
            summary.published_at.map(|dt| dt.to_rfc3339()),
            Some("2024-03-01T09:30:00+00:00".to_string())
        );
    }

    #[test]
    fn test_post_summary_tolerates_garbage() {
        let summary = PostSummary::from_value(&json!({ "publishedAt": "yesterday", "title": 5 }));
        assert_eq!(summary, PostSummary::default());
    }
}
