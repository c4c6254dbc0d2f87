//! URL composition for portfolio images.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// URL prefix under which portfolio images are published.
pub const PORTFOLIO_PREFIX: &str = "/portfolio";

/// Bytes left unescaped in a single URI component.
///
/// Matches the set browsers leave alone in `encodeURIComponent`, so links
/// built here compare equal to links built client-side.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encode one path or query segment.
pub fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, URI_COMPONENT).to_string()
}

/// Build the public URL of an image: `/portfolio/<category>/<filename>`.
///
/// The category and filename are encoded independently, so a `/` or `#`
/// inside either one can never be mistaken for a path or fragment separator.
pub fn portfolio_src(category: &str, filename: &str) -> String {
    format!(
        "{}/{}/{}",
        PORTFOLIO_PREFIX,
        encode_segment(category),
        encode_segment(filename)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use percent_encoding::percent_decode_str;

    #[test]
    fn leaves_plain_names_alone() {
        assert_eq!(
            portfolio_src("kitchens", "image1.jpg"),
            "/portfolio/kitchens/image1.jpg"
        );
    }

    #[test]
    fn escapes_spaces_and_hashes() {
        assert_eq!(
            portfolio_src("office space", "my photo #1.jpg"),
            "/portfolio/office%20space/my%20photo%20%231.jpg"
        );
    }

    #[test]
    fn decoded_segments_reconstruct_the_originals() {
        let category = "office space";
        let filename = "my photo #1.jpg";

        let src = portfolio_src(category, filename);
        let segments: Vec<String> = src
            .trim_start_matches('/')
            .split('/')
            .map(|s| percent_decode_str(s).decode_utf8().unwrap().into_owned())
            .collect();

        assert_eq!(segments, vec!["portfolio", category, filename]);
    }

    #[test]
    fn keeps_uri_component_marks() {
        assert_eq!(encode_segment("a-b_c.d!e~f*g'h(i)"), "a-b_c.d!e~f*g'h(i)");
        assert_eq!(encode_segment("a/b?c&d"), "a%2Fb%3Fc%26d");
    }

    #[test]
    fn encodes_non_ascii_as_utf8_bytes() {
        assert_eq!(encode_segment("café"), "caf%C3%A9");
    }
}
