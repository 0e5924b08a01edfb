//! Filename sanitization for untrusted client-supplied names.

/// Characters allowed in a staged file name besides ASCII alphanumerics.
/// Everything else (path separators, spaces, quotes, shell metacharacters)
/// is removed outright rather than escaped.
const EXTRA_ALLOWED: &[char] = &['.', '_', '-', '+', ',', '=', '@'];

/// Reduce a client-supplied base name to allow-listed characters only.
///
/// The result may be empty; callers prepend a role-specific prefix, so an
/// empty result still yields a usable, collision-free staging name.
/// Idempotent: sanitizing an already-sanitized name is a no-op.
pub fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric() || EXTRA_ALLOWED.contains(c))
        .collect()
}
