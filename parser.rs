/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Location-bar input parsing.

use url::Url;

const KNOWN_SCHEMES: &[&str] = &["http:", "https:", "file:", "about:", "data:", "view-source:"];

/// Turn raw location-bar input into a navigable URL.
///
/// Input with a recognized scheme passes through unchanged. Bare input
/// containing a `.` and no whitespace is treated as a host and gets
/// `https://` prefixed. Anything else becomes a query against
/// `searchpage`, where `%s` stands for the form-encoded query text.
pub fn location_bar_input_to_url(input: &str, searchpage: &str) -> Option<Url> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if has_known_scheme(input) {
        return Url::parse(input).ok();
    }

    if input.contains('.') && !input.contains(char::is_whitespace) {
        return Url::parse(&format!("https://{input}")).ok();
    }

    build_search_url(input, searchpage)
}

fn has_known_scheme(input: &str) -> bool {
    let lower = input.to_ascii_lowercase();
    KNOWN_SCHEMES.iter().any(|scheme| lower.starts_with(scheme))
}

/// Build a search URL for `query` from a `searchpage` template.
pub fn build_search_url(query: &str, searchpage: &str) -> Option<Url> {
    let encoded: String = url::form_urlencoded::byte_serialize(query.as_bytes()).collect();
    let target = if searchpage.contains("%s") {
        searchpage.replace("%s", &encoded)
    } else {
        format!("{searchpage}{encoded}")
    };
    Url::parse(&target).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const SEARCHPAGE: &str = "https://www.google.com/search?q=%s";

    #[rstest]
    #[case("https://example.com", "https://example.com/")]
    #[case("http://example.com/path?x=1", "http://example.com/path?x=1")]
    #[case("about:blank", "about:blank")]
    #[case("  https://example.com  ", "https://example.com/")]
    fn test_known_schemes_pass_through(#[case] input: &str, #[case] expected: &str) {
        let url = location_bar_input_to_url(input, SEARCHPAGE).unwrap();
        assert_eq!(url.as_str(), expected);
    }

    #[test]
    fn test_bare_domain_gets_https_prefix() {
        let url = location_bar_input_to_url("example.com", SEARCHPAGE).unwrap();
        assert_eq!(url.as_str(), "https://example.com/");
    }

    #[test]
    fn test_domain_with_path_gets_https_prefix() {
        let url = location_bar_input_to_url("example.com/a/b", SEARCHPAGE).unwrap();
        assert_eq!(url.as_str(), "https://example.com/a/b");
    }

    #[test]
    fn test_free_text_becomes_search_query() {
        let url = location_bar_input_to_url("how to code", SEARCHPAGE).unwrap();
        assert_eq!(url.host_str(), Some("www.google.com"));
        assert!(!url.as_str().contains(' '));
        assert!(url.as_str().contains("q=how+to+code"));
    }

    #[test]
    fn test_text_with_dot_and_space_is_still_a_search() {
        let url = location_bar_input_to_url("what is example.com", SEARCHPAGE).unwrap();
        assert_eq!(url.host_str(), Some("www.google.com"));
    }

    #[test]
    fn test_query_special_characters_are_encoded() {
        let url = location_bar_input_to_url("a&b=c?", SEARCHPAGE).unwrap();
        assert!(url.as_str().contains("q=a%26b%3Dc%3F"));
    }

    #[test]
    fn test_empty_and_whitespace_input_is_rejected() {
        assert_eq!(location_bar_input_to_url("", SEARCHPAGE), None);
        assert_eq!(location_bar_input_to_url("   ", SEARCHPAGE), None);
    }

    #[test]
    fn test_searchpage_without_placeholder_appends_query() {
        let url = build_search_url("rust", "https://duckduckgo.com/?q=").unwrap();
        assert_eq!(url.as_str(), "https://duckduckgo.com/?q=rust");
    }
}
