// Resource descriptors and URL assembly
//
// Both API families address endpoints as `{api_root}/{api_version}/{resource}`
// below a service base URL. These helpers are pure string functions so the
// path rules can be tested without a client.

use url::form_urlencoded;

/// A (resource name, api root, api version) triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resource<'a> {
    pub name: &'a str,
    pub api_root: Option<&'a str>,
    pub api_version: Option<&'a str>,
}

impl<'a> Resource<'a> {
    pub fn new(name: &'a str, api_root: Option<&'a str>, api_version: Option<&'a str>) -> Self {
        Self {
            name,
            api_root,
            api_version,
        }
    }

    /// Relative path, e.g. `rest/v1/warnings`.
    pub fn path(&self) -> String {
        join_segments([self.api_root, self.api_version, Some(self.name)])
    }

    /// Relative path with a suffix appended, e.g. `api31/dwd/mapData.json`.
    pub fn path_with(&self, suffix: &str) -> String {
        join_segments([
            self.api_root,
            self.api_version,
            Some(self.name),
            Some(suffix),
        ])
    }
}

/// Join segments with single slashes, trimming slashes at every joint.
///
/// `None` and empty segments are skipped.
pub fn join_segments<'a>(segments: impl IntoIterator<Item = Option<&'a str>>) -> String {
    segments
        .into_iter()
        .flatten()
        .map(|s| s.trim_matches('/'))
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

/// Join a base URL (absent for absolute paths) and a path, optionally adding
/// a trailing slash.
pub fn url_joiner(base: Option<&str>, path: &str, trailing: bool) -> String {
    let mut url = join_segments([base, Some(path)]);
    if trailing {
        url.push('/');
    }
    url
}

/// Percent-encode `raw` so it stays a single path segment.
pub fn path_segment(raw: &str) -> String {
    // `+` only comes out of a space; a literal plus is already `%2B`
    form_urlencoded::byte_serialize(raw.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

/// Append URL-encoded params and bare flags to `url`.
///
/// The first separator is `?`, or `&` when `url` already carries a query.
/// Params come before flags; every further item is joined with `&`.
pub fn append_query(mut url: String, params: &[(String, String)], flags: &[String]) -> String {
    if params.is_empty() && flags.is_empty() {
        return url;
    }

    url.push(if url.contains('?') { '&' } else { '?' });

    if !params.is_empty() {
        let encoded = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(params)
            .finish();
        url.push_str(&encoded);
    }

    if !flags.is_empty() {
        if !params.is_empty() {
            url.push('&');
        }
        url.push_str(&flags.join("&"));
    }

    url
}
