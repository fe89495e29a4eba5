//! Access modifier normalization for generated extensions.

use copywith_syntax::ast::Modifier;

/// Access levels an extension may carry unchanged.
const PASSTHROUGH: &[&str] = &["public", "package", "internal", "fileprivate"];

/// Keeps the access modifiers that are valid on an extension.
///
/// `open` is not allowed on extensions and becomes `public`. `private` becomes
/// `fileprivate`: members of a `private extension` are file-visible while a
/// nested `private enum OR` would not be, and a signature may not expose it.
/// Modifiers with a detail such as `private(set)` only restrict setters and
/// are dropped, as is everything that is not an access level.
#[must_use]
pub fn normalize(modifiers: &[Modifier]) -> Vec<Modifier> {
    modifiers
        .iter()
        .filter(|modifier| modifier.detail.is_none())
        .filter_map(|modifier| match modifier.name.as_str() {
            "open" => Some(Modifier::new("public")),
            "private" => Some(Modifier::new("fileprivate")),
            name if PASSTHROUGH.contains(&name) => Some(Modifier::new(name)),
            _ => None,
        })
        .collect()
}
