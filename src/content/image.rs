//! Image CDN URLs.

use url::Url;

/// Adds the content store's image transform parameters to an asset URL:
/// automatic format selection, `fit=max`, and an optional target width.
///
/// Existing query parameters are kept. Returns `None` when there is no image
/// or the URL does not parse.
#[must_use]
pub fn image_url(asset_url: Option<&str>, width: Option<u32>) -> Option<String> {
    let mut url = Url::parse(asset_url?).ok()?;
    {
        let mut query = url.query_pairs_mut();
        query.append_pair("auto", "format");
        query.append_pair("fit", "max");
        if let Some(w) = width {
            query.append_pair("w", &w.to_string());
        }
    }
    Some(url.into())
}
