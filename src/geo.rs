use crate::config::GEO_LANGUAGE;
use crate::error::{LookupError, LookupResult};
use crate::mediawiki;
use crate::reference::Reference;
use crate::transport::Transport;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeoPoint {
    pub latitude: String,
    pub longitude: String,
}

/// Primary coordinates of an article.
///
/// Always read from English Wikipedia, where coordinate data is most complete;
/// the reference's language is not used.
pub fn coordinates<T: Transport>(transport: &T, reference: &Reference) -> LookupResult<GeoPoint> {
    let request = mediawiki::query(GEO_LANGUAGE)
        .param("prop", "coordinates")
        .param("colimit", "max")
        .param("coprimary", "primary")
        .title("titles", &reference.title);
    let page = mediawiki::fetch(transport, &request)?.first_page()?;

    let point = page
        .coordinates
        .and_then(|c| c.entries.into_iter().next())
        .ok_or(LookupError::NoData)?;
    debug!(reference = %reference, lat = %point.lat, lon = %point.lon, "coordinates");

    Ok(GeoPoint {
        latitude: point.lat,
        longitude: point.lon,
    })
}
