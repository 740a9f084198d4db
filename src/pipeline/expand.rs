//! Multi-class expansion.
//!
//! A COG can belong to several functional categories at once; its class
//! string is then a concatenation of letters (`KL`). Category-level counts
//! need one token per (hit, category) pair.

/// One category instance. `None` stands for a hit whose class string is
/// empty; it still contributes exactly one instance.
pub type CategoryToken = Option<char>;

/// Expands class strings into category tokens.
///
/// A single letter yields itself, longer strings yield one token per
/// character in their original order, and an empty string yields a single
/// `None`. Tokens from one string are contiguous and follow input order.
pub fn expand_classes<'a, I>(class_codes: I) -> Vec<CategoryToken>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut tokens = Vec::new();
    for codes in class_codes {
        if codes.is_empty() {
            tokens.push(None);
        } else {
            tokens.extend(codes.chars().map(Some));
        }
    }
    tokens
}
