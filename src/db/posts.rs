//! Post storage operations.

use sqlx::{sqlite::SqliteRow, QueryBuilder, Row};

use super::repository::{
    new_id, parse_id, parse_json_list, stored_choice, timestamp, to_json_list,
};
use super::{FindOptions, Repository};
use crate::errors::AppError;
use crate::models::{NewPost, Post, PostChanges};
use crate::slug::derive_slug;
use crate::validation::{Choice, ValidationErrors};

const POST_COLUMNS: &str = "id, title, slug, excerpt, content, category, tags, featured, \
     cover_image, author, published, views, created_at, updated_at";

impl Repository {
    // ==================== POST OPERATIONS ====================

    /// Posts matching `options`, newest first.
    pub async fn find_posts(&self, options: &FindOptions) -> Result<Vec<Post>, AppError> {
        let mut qb = QueryBuilder::new(format!("SELECT {} FROM posts", POST_COLUMNS));
        options.push_where(&mut qb);
        qb.push(" ORDER BY created_at DESC, rowid DESC");
        options.push_limit(&mut qb);

        let rows = qb.build().fetch_all(&self.pool).await?;
        rows.iter().map(post_from_row).collect()
    }

    /// The published post with this slug.
    pub async fn find_published_post(&self, slug: &str) -> Result<Option<Post>, AppError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM posts WHERE slug = ? AND published = 1",
            POST_COLUMNS
        ))
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(post_from_row).transpose()
    }

    /// Get a post by ID.
    pub async fn get_post(&self, id: &str) -> Result<Option<Post>, AppError> {
        let id = parse_id(id)?;
        let row = sqlx::query(&format!("SELECT {} FROM posts WHERE id = ?", POST_COLUMNS))
            .bind(&id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(post_from_row).transpose()
    }

    /// Insert a validated post, deriving its slug from the title.
    pub async fn create_post(&self, post: &NewPost) -> Result<Post, AppError> {
        let id = new_id();
        let now = timestamp();
        let slug = checked_slug(derive_slug(&post.title, true))?;
        let tags_json = to_json_list(&post.tags)?;

        sqlx::query(
            r#"INSERT INTO posts (
                id, title, slug, excerpt, content, category, tags, featured,
                cover_image, author, published, views, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 0, ?, ?)"#,
        )
        .bind(&id)
        .bind(&post.title)
        .bind(&slug)
        .bind(&post.excerpt)
        .bind(&post.content)
        .bind(post.category.as_str())
        .bind(&tags_json)
        .bind(post.featured)
        .bind(&post.cover_image)
        .bind(&post.author)
        .bind(post.published)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        tracing::info!(post_id = %id, slug = %slug, "Created post");

        Ok(Post {
            id,
            title: post.title.clone(),
            slug,
            excerpt: post.excerpt.clone(),
            content: post.content.clone(),
            category: post.category,
            tags: post.tags.clone(),
            featured: post.featured,
            cover_image: post.cover_image.clone(),
            author: post.author.clone(),
            published: post.published,
            views: 0,
            created_at: now.clone(),
            updated_at: now,
        })
    }

    /// Apply a partial update. The slug is re-derived only if the title changes.
    pub async fn update_post(&self, id: &str, changes: &PostChanges) -> Result<Post, AppError> {
        let existing = self
            .get_post(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;

        let title = changes.title.clone().unwrap_or(existing.title.clone());
        let title_changed = title != existing.title;
        let slug = match derive_slug(&title, title_changed) {
            Some(slug) => checked_slug(Some(slug))?,
            None => existing.slug.clone(),
        };
        if slug != existing.slug {
            tracing::debug!(
                post_id = %existing.id,
                from = %existing.slug,
                to = %slug,
                "Post slug changed"
            );
        }

        let updated = Post {
            title,
            slug,
            excerpt: changes.excerpt.clone().unwrap_or(existing.excerpt),
            content: changes.content.clone().unwrap_or(existing.content),
            category: changes.category.unwrap_or(existing.category),
            tags: changes.tags.clone().unwrap_or(existing.tags),
            featured: changes.featured.unwrap_or(existing.featured),
            cover_image: changes.cover_image.clone().unwrap_or(existing.cover_image),
            author: changes.author.clone().unwrap_or(existing.author),
            published: changes.published.unwrap_or(existing.published),
            updated_at: timestamp(),
            ..existing
        };
        let tags_json = to_json_list(&updated.tags)?;

        let result = sqlx::query(
            r#"UPDATE posts SET
                title = ?, slug = ?, excerpt = ?, content = ?, category = ?, tags = ?,
                featured = ?, cover_image = ?, author = ?, published = ?, updated_at = ?
            WHERE id = ?"#,
        )
        .bind(&updated.title)
        .bind(&updated.slug)
        .bind(&updated.excerpt)
        .bind(&updated.content)
        .bind(updated.category.as_str())
        .bind(&tags_json)
        .bind(updated.featured)
        .bind(&updated.cover_image)
        .bind(&updated.author)
        .bind(updated.published)
        .bind(&updated.updated_at)
        .bind(&updated.id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            // Deleted between read and write
            return Err(AppError::NotFound("Post not found".to_string()));
        }

        Ok(updated)
    }

    /// Add one to a post's view counter and return the post as stored.
    pub async fn increment_post_views(&self, id: &str) -> Result<Post, AppError> {
        let id = parse_id(id)?;
        let result = sqlx::query("UPDATE posts SET views = views + 1 WHERE id = ?")
            .bind(&id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Post not found".to_string()));
        }

        tracing::debug!(post_id = %id, "Incremented post views");

        self.get_post(&id)
            .await?
            .ok_or_else(|| AppError::NotFound("Post not found".to_string()))
    }

    /// Delete a post, returning what was removed.
    pub async fn delete_post(&self, id: &str) -> Result<Post, AppError> {
        let existing = self
            .get_post(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;

        let result = sqlx::query("DELETE FROM posts WHERE id = ?")
            .bind(&existing.id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Post not found".to_string()));
        }

        tracing::info!(post_id = %existing.id, "Deleted post");
        Ok(existing)
    }

    /// Remove every post. Used by the seed command.
    pub async fn delete_all_posts(&self) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM posts").execute(&self.pool).await?;
        Ok(result.rows_affected())
    }
}

fn checked_slug(slug: Option<String>) -> Result<String, AppError> {
    match slug {
        Some(slug) if !slug.is_empty() => Ok(slug),
        _ => {
            let mut errors = ValidationErrors::new();
            errors.push("slug", "Title must contain at least one letter or digit");
            Err(errors.into())
        }
    }
}

fn post_from_row(row: &SqliteRow) -> Result<Post, AppError> {
    let tags: String = row.get("tags");
    Ok(Post {
        id: row.get("id"),
        title: row.get("title"),
        slug: row.get("slug"),
        excerpt: row.get("excerpt"),
        content: row.get("content"),
        category: stored_choice(row, "category")?,
        tags: parse_json_list(&tags),
        featured: row.get("featured"),
        cover_image: row.get("cover_image"),
        author: row.get("author"),
        published: row.get("published"),
        views: row.get("views"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}
