//! LinkedIn profile URL extraction from free-text profile fields.
//!
//! Pure and deterministic: fields are checked in a fixed precedence order
//! (bio, then blog, then company, since accounts sometimes put a recruiter
//! profile in the company field) and the first match wins. The pattern is
//! anchored on the `/in/` member-profile path segment, so company pages
//! and other linkedin.com URLs never match. The precedence and the handle
//! character class are heuristics preserved as observed; multiple profile
//! links in one field resolve to whichever appears first.

use std::sync::LazyLock;

use regex::Regex;

/// Matches a LinkedIn member profile URL, with or without a scheme.
static PROFILE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:https?://)?(?:www\.)?linkedin\.com/in/[A-Za-z0-9_-]+/?")
        .expect("profile URL pattern must compile")
});

/// Find the first LinkedIn profile URL across the given fields, checked
/// in precedence order: bio, blog, company.
///
/// Scheme-less matches are normalized with an `https://` prefix so the
/// result is always a usable URL.
pub fn extract_profile_url(
    bio: Option<&str>,
    blog: Option<&str>,
    company: Option<&str>,
) -> Option<String> {
    for field in [bio, blog, company] {
        let Some(text) = field else { continue };
        if let Some(found) = PROFILE_URL.find(text) {
            let url = found.as_str();
            return Some(if url.starts_with("http") {
                url.to_string()
            } else {
                format!("https://{url}")
            });
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_profile_url_from_bio() {
        let url = extract_profile_url(
            Some("Find me at https://linkedin.com/in/janedoe"),
            None,
            None,
        );
        assert_eq!(url.as_deref(), Some("https://linkedin.com/in/janedoe"));
    }

    #[test]
    fn test_bio_takes_precedence_over_blog() {
        let url = extract_profile_url(
            Some("https://linkedin.com/in/from-bio"),
            Some("https://linkedin.com/in/from-blog"),
            None,
        );
        assert_eq!(url.as_deref(), Some("https://linkedin.com/in/from-bio"));
    }

    #[test]
    fn test_blog_takes_precedence_over_company() {
        let url = extract_profile_url(
            Some("Just a bio with no links"),
            Some("https://www.linkedin.com/in/from-blog"),
            Some("https://linkedin.com/in/from-company"),
        );
        assert_eq!(
            url.as_deref(),
            Some("https://www.linkedin.com/in/from-blog")
        );
    }

    #[test]
    fn test_company_field_is_searched_last() {
        let url = extract_profile_url(
            None,
            None,
            Some("Acme Corp (hiring via linkedin.com/in/acme-recruiter)"),
        );
        assert_eq!(
            url.as_deref(),
            Some("https://linkedin.com/in/acme-recruiter")
        );
    }

    #[test]
    fn test_company_page_does_not_match() {
        let url = extract_profile_url(
            Some("Works at https://linkedin.com/company/acme"),
            None,
            None,
        );
        assert!(url.is_none());
    }

    #[test]
    fn test_other_linkedin_paths_do_not_match() {
        assert!(extract_profile_url(Some("https://linkedin.com/jobs/view/123"), None, None).is_none());
        assert!(extract_profile_url(Some("see linkedin.com for details"), None, None).is_none());
    }

    #[test]
    fn test_unrelated_urls_do_not_match() {
        let url = extract_profile_url(
            Some("Blog at https://example.com/in/disguise"),
            Some("https://github.com/octocat"),
            None,
        );
        assert!(url.is_none());
    }

    #[test]
    fn test_schemeless_match_is_normalized() {
        let url = extract_profile_url(Some("linkedin.com/in/janedoe"), None, None);
        assert_eq!(url.as_deref(), Some("https://linkedin.com/in/janedoe"));
    }

    #[test]
    fn test_match_embedded_in_prose() {
        let url = extract_profile_url(
            Some("Rustacean. DMs open, or reach me on www.linkedin.com/in/jane_doe-42, she/her"),
            None,
            None,
        );
        assert_eq!(
            url.as_deref(),
            Some("https://www.linkedin.com/in/jane_doe-42"),
        );
    }

    #[test]
    fn test_trailing_slash_is_kept() {
        let url = extract_profile_url(Some("https://linkedin.com/in/janedoe/"), None, None);
        assert_eq!(url.as_deref(), Some("https://linkedin.com/in/janedoe/"));
    }

    #[test]
    fn test_all_fields_empty() {
        assert!(extract_profile_url(None, None, None).is_none());
        assert!(extract_profile_url(Some(""), Some(""), Some("")).is_none());
    }

    #[test]
    fn test_first_of_multiple_links_wins() {
        let url = extract_profile_url(
            Some("https://linkedin.com/in/first and https://linkedin.com/in/second"),
            None,
            None,
        );
        assert_eq!(url.as_deref(), Some("https://linkedin.com/in/first"));
    }
}
