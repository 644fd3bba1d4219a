//! Decide whether a click leads somewhere new.

use crate::error::Result;
use crate::host::ClickEvent;
use crate::url_match::{
    has_same_query_parameters, is_same_host, is_same_page_anchor, is_same_pathname, to_absolute,
};
use url::Url;

/// True when the click is a same-site navigation to a different page.
///
/// Skipped: clicks outside anchors, `target="_blank"`, ctrl/meta clicks,
/// other hosts, fragment jumps, non-http(s) targets, and links to the
/// current path with the same query (any query with `ignore_search_params`).
pub fn is_navigation(click: &ClickEvent, location: &Url, ignore_search_params: bool) -> Result<bool> {
    let Some(anchor) = click.closest_anchor() else {
        return Ok(false);
    };
    let Some(href) = anchor.href.as_deref() else {
        return Ok(false);
    };
    if anchor.target.as_deref() == Some("_blank") || click.ctrl_key || click.meta_key {
        return Ok(false);
    }

    let current = location.as_str();
    if !is_same_host(current, href, location)? || is_same_page_anchor(current, href, location)? {
        return Ok(false);
    }
    if !matches!(to_absolute(href, location)?.scheme(), "http" | "https") {
        return Ok(false);
    }
    Ok(!is_same_destination(current, href, location, ignore_search_params)?)
}

/// Same pathname and, unless ignored, same query parameters.
pub(crate) fn is_same_destination(
    current: &str,
    target: &str,
    location: &Url,
    ignore_search_params: bool,
) -> Result<bool> {
    Ok(is_same_pathname(current, target, location)?
        && (ignore_search_params || has_same_query_parameters(current, target, location)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::ElementInfo;

    fn at(url: &str) -> Url {
        Url::parse(url).unwrap()
    }

    fn nav(click: ClickEvent, from: &str) -> bool {
        is_navigation(&click, &at(from), false).unwrap()
    }

    #[test]
    fn test_plain_link_to_other_page() {
        assert!(nav(ClickEvent::on_anchor("/other"), "https://example.com/page"));
        assert!(nav(
            ClickEvent::on_anchor("https://www.example.com/other"),
            "https://example.com/page"
        ));
    }

    #[test]
    fn test_nested_target_inside_anchor() {
        let click = ClickEvent::new(vec![
            ElementInfo::element("img"),
            ElementInfo::anchor("/gallery"),
            ElementInfo::element("body"),
        ]);
        assert!(nav(click, "https://example.com/"));
    }

    #[test]
    fn test_non_anchor_click() {
        let click = ClickEvent::new(vec![ElementInfo::element("button")]);
        assert!(!nav(click, "https://example.com/"));
        let no_href = ClickEvent::new(vec![ElementInfo::element("a")]);
        assert!(!nav(no_href, "https://example.com/"));
    }

    #[test]
    fn test_blank_target_and_modifiers() {
        let from = "https://example.com/page";
        let blank = ClickEvent::new(vec![ElementInfo::anchor("/other").with_target("_blank")]);
        assert!(!nav(blank, from));
        assert!(!nav(ClickEvent::on_anchor("/other").with_ctrl(), from));
        assert!(!nav(ClickEvent::on_anchor("/other").with_meta(), from));
        let framed = ClickEvent::new(vec![ElementInfo::anchor("/other").with_target("_self")]);
        assert!(nav(framed, from));
    }

    #[test]
    fn test_external_and_fragment_links() {
        let from = "https://example.com/page";
        assert!(!nav(ClickEvent::on_anchor("https://rust-lang.org/"), from));
        assert!(!nav(ClickEvent::on_anchor("#details"), from));
        assert!(!nav(ClickEvent::on_anchor("/page#details"), from));
    }

    #[test]
    fn test_non_http_schemes() {
        let from = "https://example.com/page";
        assert!(!nav(ClickEvent::on_anchor("mailto:team@example.com"), from));
        assert!(!nav(ClickEvent::on_anchor("javascript:void(0)"), from));
    }

    #[test]
    fn test_same_destination() {
        assert!(!nav(ClickEvent::on_anchor("/page?x=1"), "https://example.com/page?x=1"));
        assert!(nav(ClickEvent::on_anchor("/page?x=2"), "https://example.com/page?x=1"));
        let ignored = is_navigation(
            &ClickEvent::on_anchor("/page?x=2"),
            &at("https://example.com/page?x=1"),
            true,
        )
        .unwrap();
        assert!(!ignored);
    }

    #[test]
    fn test_malformed_href_is_error() {
        let result = is_navigation(
            &ClickEvent::on_anchor("http://[::1"),
            &at("https://example.com/"),
            false,
        );
        assert!(result.is_err());
    }
}
