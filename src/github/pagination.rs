// Pagination helpers.
// Parses the RFC 8288 `Link` header GitHub attaches to list responses.

use reqwest::Url;

/// Extract the page number of the `rel="last"` link.
///
/// With `per_page=1` this is the total item count of the listing.
pub fn last_page(link_header: &str) -> Option<u64> {
    link_header.split(',').find_map(|part| {
        let mut segments = part.split(';');
        let target = segments.next()?.trim();
        let is_last = segments.any(|param| {
            let param = param.trim();
            param == "rel=\"last\"" || param == "rel=last"
        });
        if !is_last {
            return None;
        }

        let url = target.strip_prefix('<')?.strip_suffix('>')?;
        let url = Url::parse(url).ok()?;
        url.query_pairs()
            .find(|(key, _)| key == "page")
            .and_then(|(_, value)| value.parse().ok())
    })
}
