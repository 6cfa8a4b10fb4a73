//! Blog post model.

use serde::{Deserialize, Serialize};

use crate::validation::{
    choice, max_chars, required_text, supplied_text, trimmed_list, Choice, ValidationErrors,
};

pub const DEFAULT_AUTHOR: &str = "Team";

/// Editorial section a post belongs to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum PostCategory {
    #[serde(rename = "Land Lab")]
    LandLab,
    #[serde(rename = "Digital Forge")]
    DigitalForge,
    Homestead,
    Research,
    #[default]
    Journey,
}

impl Choice for PostCategory {
    const ALL: &'static [Self] = &[
        PostCategory::LandLab,
        PostCategory::DigitalForge,
        PostCategory::Homestead,
        PostCategory::Research,
        PostCategory::Journey,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            PostCategory::LandLab => "Land Lab",
            PostCategory::DigitalForge => "Digital Forge",
            PostCategory::Homestead => "Homestead",
            PostCategory::Research => "Research",
            PostCategory::Journey => "Journey",
        }
    }
}

/// A blog post.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub content: String,
    pub category: PostCategory,
    pub tags: Vec<String>,
    pub featured: bool,
    pub cover_image: String,
    pub author: String,
    pub published: bool,
    pub views: i64,
    pub created_at: String,
    pub updated_at: String,
}

/// Request body for creating a new post.
///
/// Required fields are optional here so a missing field is reported as a
/// validation error alongside every other violation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub featured: Option<bool>,
    #[serde(default)]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub published: Option<bool>,
}

/// A validated post ready to be inserted. The slug is derived on insert.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub category: PostCategory,
    pub tags: Vec<String>,
    pub featured: bool,
    pub cover_image: String,
    pub author: String,
    pub published: bool,
}

impl CreatePostRequest {
    pub fn validate(&self) -> Result<NewPost, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let title = required_text(
            &mut errors,
            "title",
            self.title.as_deref(),
            true,
            "Post title is required",
        );
        max_chars(
            &mut errors,
            "title",
            title.as_deref(),
            200,
            "Title cannot exceed 200 characters",
        );
        let excerpt = required_text(
            &mut errors,
            "excerpt",
            self.excerpt.as_deref(),
            false,
            "Excerpt is required",
        );
        max_chars(
            &mut errors,
            "excerpt",
            excerpt.as_deref(),
            500,
            "Excerpt cannot exceed 500 characters",
        );
        let content = required_text(
            &mut errors,
            "content",
            self.content.as_deref(),
            false,
            "Content is required",
        );
        let category = choice::<PostCategory>(&mut errors, "category", self.category.as_deref());

        let (Some(title), Some(excerpt), Some(content)) = (title, excerpt, content) else {
            return Err(errors);
        };

        errors.finish(NewPost {
            title,
            excerpt,
            content,
            category: category.unwrap_or_default(),
            tags: self.tags.as_deref().map(trimmed_list).unwrap_or_default(),
            featured: self.featured.unwrap_or(false),
            cover_image: self.cover_image.clone().unwrap_or_default(),
            author: self
                .author
                .clone()
                .unwrap_or_else(|| DEFAULT_AUTHOR.to_string()),
            published: self.published.unwrap_or(true),
        })
    }
}

/// Request body for a partial post update.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePostRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub featured: Option<bool>,
    #[serde(default)]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub published: Option<bool>,
}

/// Validated subset of post fields to overwrite.
#[derive(Debug, Clone, Default)]
pub struct PostChanges {
    pub title: Option<String>,
    pub excerpt: Option<String>,
    pub content: Option<String>,
    pub category: Option<PostCategory>,
    pub tags: Option<Vec<String>>,
    pub featured: Option<bool>,
    pub cover_image: Option<String>,
    pub author: Option<String>,
    pub published: Option<bool>,
}

impl UpdatePostRequest {
    /// Checks only the fields present in the request.
    pub fn validate(&self) -> Result<PostChanges, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let title = supplied_text(
            &mut errors,
            "title",
            self.title.as_deref(),
            true,
            "Post title is required",
        );
        max_chars(
            &mut errors,
            "title",
            title.as_deref(),
            200,
            "Title cannot exceed 200 characters",
        );
        let excerpt = supplied_text(
            &mut errors,
            "excerpt",
            self.excerpt.as_deref(),
            false,
            "Excerpt is required",
        );
        max_chars(
            &mut errors,
            "excerpt",
            excerpt.as_deref(),
            500,
            "Excerpt cannot exceed 500 characters",
        );
        let content = supplied_text(
            &mut errors,
            "content",
            self.content.as_deref(),
            false,
            "Content is required",
        );
        let category = choice::<PostCategory>(&mut errors, "category", self.category.as_deref());

        errors.finish(PostChanges {
            title,
            excerpt,
            content,
            category,
            tags: self.tags.as_deref().map(trimmed_list),
            featured: self.featured,
            cover_image: self.cover_image.clone(),
            author: self.author.clone(),
            published: self.published,
        })
    }
}

/// Query parameters for the public post listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostListParams {
    pub category: Option<String>,
    pub featured: Option<String>,
    pub limit: Option<String>,
}
