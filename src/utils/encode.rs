//! Percent-encoding and name-mangling helpers for registry endpoints and
//! generated task names.
//!
//! Registry endpoints embed human-supplied path segments (project paths
//! like `group/project`, package paths like `generic/build`). Those
//! segments pass through [`percent_encode`] before being spliced into an
//! endpoint URL so that separator characters survive as data instead of
//! structure. Task names are assembled from coordinate fragments with
//! [`capitalized`], which keeps repeated lookups for the same coordinates
//! producing the same task identity.

/// Characters that must not appear literally inside a URL path segment.
const RESERVED: &str = ":/?#[]@!$&'()*+,;=";

/// Percent-encodes every reserved character in `raw` as an uppercase,
/// zero-padded two-digit hex escape. All other characters pass through
/// unchanged.
///
/// This is deliberately narrower than a general-purpose URL encoder: only
/// the reserved set is escaped, so already-safe strings round-trip
/// byte-for-byte.
///
/// # Examples
///
/// ```
/// use bindrig::utils::encode::percent_encode;
///
/// assert_eq!(percent_encode("group/project"), "group%2Fproject");
/// assert_eq!(percent_encode("build-linux-x64.zip"), "build-linux-x64.zip");
/// ```
#[must_use]
pub fn percent_encode(raw: &str) -> String {
    let mut encoded = String::with_capacity(raw.len());
    for ch in raw.chars() {
        if RESERVED.contains(ch) {
            // The reserved set is pure ASCII, so the 8-bit code point is exact.
            encoded.push_str(&format!("%{:02X}", ch as u8));
        } else {
            encoded.push(ch);
        }
    }
    encoded
}

/// Uppercases the first character of `s`, leaving the rest untouched.
///
/// Used when concatenating coordinate fragments into task names, e.g.
/// project `sdl` + suffix `linuxX64` become `downloadSdlLinuxX64`.
#[must_use]
pub fn capitalized(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn safe_input_passes_through_unchanged() {
        assert_eq!(percent_encode("build-linux-x64-debug.zip"), "build-linux-x64-debug.zip");
        assert_eq!(percent_encode(""), "");
        assert_eq!(percent_encode("v1.2.3"), "v1.2.3");
    }

    #[test]
    fn slash_is_escaped() {
        assert_eq!(percent_encode("a/b"), "a%2Fb");
        assert_eq!(percent_encode("grp/sub/proj"), "grp%2Fsub%2Fproj");
    }

    #[test]
    fn at_sign_is_escaped_but_dots_and_digits_are_not() {
        assert_eq!(percent_encode("@v1.0"), "%40v1.0");
    }

    #[test]
    fn full_reserved_set_is_escaped() {
        assert_eq!(
            percent_encode(":/?#[]@!$&'()*+,;="),
            "%3A%2F%3F%23%5B%5D%40%21%24%26%27%28%29%2A%2B%2C%3B%3D"
        );
    }

    #[test]
    fn capitalized_uppercases_first_char_only() {
        assert_eq!(capitalized("sdl"), "Sdl");
        assert_eq!(capitalized("linuxX64"), "LinuxX64");
        assert_eq!(capitalized(""), "");
        assert_eq!(capitalized("X"), "X");
    }
}
