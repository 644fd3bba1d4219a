//! URL predicates used to classify a navigation as new or same-page.
//!
//! Every predicate accepts absolute or relative URLs. Relative input is
//! resolved against the current location, which callers pass explicitly.
//! Parse failures are returned, never swallowed.

use crate::error::{LoaderError, Result};
use std::collections::HashSet;
use url::Url;

/// Resolve `url` against `location`.
///
/// Absolute URLs pass through unchanged; the empty string resolves to the
/// location itself.
pub fn to_absolute(url: &str, location: &Url) -> Result<Url> {
    location.join(url).map_err(|source| LoaderError::InvalidUrl {
        url: url.to_string(),
        source,
    })
}

/// True when both URLs point at the same host, ignoring a leading `www.`.
///
/// Scheme and port do not take part in the comparison.
pub fn is_same_host(a: &str, b: &str, location: &Url) -> Result<bool> {
    let a = to_absolute(a, location)?;
    let b = to_absolute(b, location)?;
    Ok(bare_host(&a) == bare_host(&b))
}

/// True when the URLs are identical once their fragments are stripped.
///
/// No path normalisation happens: `/docs` and `/docs/` are different pages.
pub fn is_same_page_anchor(a: &str, b: &str, location: &Url) -> Result<bool> {
    let mut a = to_absolute(a, location)?;
    let mut b = to_absolute(b, location)?;
    a.set_fragment(None);
    b.set_fragment(None);
    Ok(a.as_str() == b.as_str())
}

/// True when the path components are byte-equal.
pub fn is_same_pathname(a: &str, b: &str, location: &Url) -> Result<bool> {
    let a = to_absolute(a, location)?;
    let b = to_absolute(b, location)?;
    Ok(a.path() == b.path())
}

/// True when both URLs carry the same query pairs, in any order.
pub fn has_same_query_parameters(a: &str, b: &str, location: &Url) -> Result<bool> {
    let a = query_pairs(&to_absolute(a, location)?);
    let b = query_pairs(&to_absolute(b, location)?);
    Ok(a.is_subset(&b) && b.is_subset(&a))
}

fn bare_host(url: &Url) -> Option<&str> {
    url.host_str()
        .map(|host| host.strip_prefix("www.").unwrap_or(host))
}

fn query_pairs(url: &Url) -> HashSet<(String, String)> {
    url.query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}
