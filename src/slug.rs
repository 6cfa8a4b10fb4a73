//! URL slugs for posts.

use std::sync::LazyLock;

use regex::Regex;

static RE_NON_SLUG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("slug pattern is valid"));

/// Lowercased, hyphen-separated form of `title`.
///
/// Every run of characters outside `a-z0-9` becomes one `-` and the result
/// never starts or ends with `-`. Non-ASCII characters are dropped.
pub fn slugify(title: &str) -> String {
    let lowered = title.to_lowercase();
    RE_NON_SLUG
        .replace_all(&lowered, "-")
        .trim_matches('-')
        .to_string()
}

/// The slug to store for a write, or `None` when the stored slug stays as is.
///
/// Only writes that change the title re-derive the slug. Uniqueness is not
/// checked here; the `posts.slug` unique index rejects collisions.
pub fn derive_slug(title: &str, title_changed: bool) -> Option<String> {
    title_changed.then(|| slugify(title))
}
