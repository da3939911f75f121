//! Text normalization for stored product fields.
//!
//! Titles, categories, types, and colors are stored Title-Cased so that
//! category search is an exact match on a canonical form; descriptions are
//! stored with only their first letter capitalized.

/// Title-case a string: every letter that follows a non-letter is uppercased,
/// every other letter is lowercased.
#[must_use]
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_boundary = true;

    for c in s.chars() {
        if c.is_alphabetic() {
            if at_boundary {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_boundary = false;
        } else {
            out.push(c);
            at_boundary = true;
        }
    }

    out
}

/// Capitalize a string: first character uppercased, the rest lowercased.
#[must_use]
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => {
            let mut out = String::with_capacity(s.len());
            out.extend(first.to_uppercase());
            out.extend(chars.flat_map(char::to_lowercase));
            out
        }
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_case_words() {
        assert_eq!(title_case("blue denim jacket"), "Blue Denim Jacket");
        assert_eq!(title_case("SHOES"), "Shoes");
        assert_eq!(title_case("t-shirt"), "T-Shirt");
    }

    #[test]
    fn test_title_case_empty() {
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn test_title_case_idempotent() {
        let once = title_case("winter coats");
        assert_eq!(title_case(&once), once);
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("hand stitched leather"), "Hand stitched leather");
        assert_eq!(capitalize("ALL CAPS"), "All caps");
        assert_eq!(capitalize(""), "");
    }
}
