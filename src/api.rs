//! Request construction for the plants backend.
//!
//! The backend is a REST-style JSON server; both endpoints take their
//! sorting and paging instructions as query-string parameters and answer
//! with a bare JSON array.

use url::Url;

use crate::PAGE_SIZE;

/// `GET /plants?_sort=name&_order=asc&_page={page}&_limit=8`
pub fn plants_url(base: &str, page: u32) -> Result<Url, url::ParseError> {
    let mut url = base_url(base)?.join("plants")?;
    url.query_pairs_mut()
        .append_pair("_sort", "name")
        .append_pair("_order", "asc")
        .append_pair("_page", &page.to_string())
        .append_pair("_limit", &PAGE_SIZE.to_string());
    Ok(url)
}

/// `GET /plants_environments?_sort=title&_order=asc`
pub fn environments_url(base: &str) -> Result<Url, url::ParseError> {
    let mut url = base_url(base)?.join("plants_environments")?;
    url.query_pairs_mut()
        .append_pair("_sort", "title")
        .append_pair("_order", "asc");
    Ok(url)
}

// `Url::join` treats a base without a trailing slash as having a final path
// segment to replace, which would eat "/api" style prefixes.
fn base_url(base: &str) -> Result<Url, url::ParseError> {
    if base.ends_with('/') {
        Url::parse(base)
    } else {
        Url::parse(&format!("{base}/"))
    }
}
