/// Derives a public username from a display name.
///
/// Lowercases, trims, collapses every run of non-alphanumeric characters to a
/// single hyphen, and strips leading/trailing hyphens. Pure and idempotent:
/// `slugify(slugify(x)) == slugify(x)`.
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_separator = false;

    for c in input.trim().to_lowercase().chars() {
        if c.is_ascii_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.push(c);
        } else {
            pending_separator = true;
        }
    }

    slug
}
