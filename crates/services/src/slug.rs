//! Slug derivation for post titles.

use domains::Post;

/// Lowercases the title, drops everything but ASCII letters, digits and
/// whitespace, turns each whitespace run into a single `-` and truncates
/// the result to 60 characters.
///
/// Leading or trailing whitespace yields a leading or trailing hyphen.
/// No uniqueness check happens here or anywhere else.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_hyphen = false;

    for c in title.to_lowercase().chars() {
        if c.is_whitespace() {
            pending_hyphen = true;
        } else if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_hyphen {
                slug.push('-');
                pending_hyphen = false;
            }
            slug.push(c);
        }
    }
    if pending_hyphen {
        slug.push('-');
    }

    // Only ASCII survives the filter, so byte truncation is char-safe.
    slug.truncate(Post::MAX_SLUG_LEN);
    slug
}

/// A slug a client may submit: `[a-z0-9-]`, at most 60 characters.
pub fn is_valid_slug(slug: &str) -> bool {
    slug.len() <= Post::MAX_SLUG_LEN
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}
