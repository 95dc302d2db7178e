use cms_site_cloud::{absorb, BlogPostQuery};
use cms_site_core::{podcast_posts, standard_posts, Locale, PostSummary};
use serde::Serialize;
use serde_json::Value;

use crate::SiteContext;

/// Navigation keys shown in the site header, in display order
pub const NAV_KEYS: [&str; 6] = ["welcome", "services", "solutions", "about", "blog", "contact"];

/// Translated label for one header entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NavLabel {
    pub key: String,
    pub label: String,
}

pub fn nav_labels(ctx: &SiteContext) -> Vec<NavLabel> {
    NAV_KEYS
        .iter()
        .map(|key| NavLabel {
            key: key.to_string(),
            label: ctx.t(key),
        })
        .collect()
}

/// Everything the landing page shows. Sections that could not be loaded
/// are `None` or empty and render as absent.
#[derive(Debug, Clone, Serialize)]
pub struct HomePage {
    pub locale: Locale,
    pub logo: Option<String>,
    pub labels: Vec<NavLabel>,
    pub nav_items: Vec<Value>,
    pub hero: Option<Value>,
    pub services: Option<Value>,
    pub consultation: Option<Value>,
    pub standard_posts: Vec<Value>,
    pub podcast_posts: Vec<Value>,
    pub read_more: String,
}

impl HomePage {
    /// Fetch every section concurrently for the current language
    pub async fn load(ctx: &SiteContext) -> HomePage {
        let locale = ctx.locale();
        let content = &ctx.content;
        let posts_limit = ctx.posts_per_section.saturating_mul(2);

        let (logo, nav_items, hero, services, consultation, posts) = futures::join!(
            content.try_logo(),
            content.try_nav_items(&locale),
            content.try_hero_content(&locale),
            content.try_services_content(&locale),
            content.try_consultation_content(&locale),
            content.try_all_blog_posts(posts_limit, &locale),
        );

        let posts = absorb(posts, "home page posts");
        let mut standard = standard_posts(posts.as_deref());
        let mut podcasts = podcast_posts(posts.as_deref());
        standard.truncate(ctx.posts_per_section as usize);
        podcasts.truncate(ctx.posts_per_section as usize);

        HomePage {
            logo: absorb(logo, "logo"),
            labels: nav_labels(ctx),
            nav_items: absorb(nav_items, "navigation items").unwrap_or_default(),
            hero: absorb(hero, "hero content"),
            services: absorb(services, "services content"),
            consultation: absorb(consultation, "consultation content"),
            standard_posts: standard,
            podcast_posts: podcasts,
            read_more: ctx.t("readMore"),
            locale,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.hero.is_none()
            && self.services.is_none()
            && self.consultation.is_none()
            && self.nav_items.is_empty()
            && self.standard_posts.is_empty()
            && self.podcast_posts.is_empty()
    }
}

/// Blog listing, optionally for a single category
#[derive(Debug, Clone, Serialize)]
pub struct BlogPage {
    pub locale: Locale,
    pub title: String,
    pub category: Option<String>,
    pub posts: Vec<PostSummary>,
}

impl BlogPage {
    pub async fn load(ctx: &SiteContext, category: Option<&str>) -> BlogPage {
        let locale = ctx.locale();
        let mut query = BlogPostQuery::new().with_limit(ctx.posts_per_section);
        if let Some(slug) = category {
            query = query.in_category(slug);
        }

        let posts = ctx.content.blog_posts(query, &locale).await;
        BlogPage {
            title: ctx.t("blog"),
            category: category.map(str::to_string),
            posts: posts.iter().map(PostSummary::from_value).collect(),
            locale,
        }
    }
}
