//! A small set of well-known cities to start an analysis from.

use crate::types::location::LatLon;

/// A named preset location.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PopularLocation {
    pub name: &'static str,
    pub location: LatLon,
}

/// Berlin, used when no location has been chosen yet.
pub const DEFAULT_LOCATION: LatLon = LatLon(52.52, 13.41);

pub static POPULAR_LOCATIONS: [PopularLocation; 11] = [
    PopularLocation { name: "Rio de Janeiro, Brazil", location: LatLon(-22.91, -43.20) },
    PopularLocation { name: "Vancouver, Canada", location: LatLon(49.28, -123.12) },
    PopularLocation { name: "Paris, France", location: LatLon(48.85, 2.35) },
    PopularLocation { name: "Toronto, Canada", location: LatLon(43.65, -79.38) },
    PopularLocation { name: "São Paulo, Brazil", location: LatLon(-23.55, -46.63) },
    PopularLocation { name: "Calgary, Canada", location: LatLon(51.05, -114.07) },
    PopularLocation { name: "Berlin, Germany", location: LatLon(52.52, 13.41) },
    PopularLocation { name: "New York, USA", location: LatLon(40.71, -74.01) },
    PopularLocation { name: "Tokyo, Japan", location: LatLon(35.68, 139.69) },
    PopularLocation { name: "Sydney, Australia", location: LatLon(-33.87, 151.21) },
    PopularLocation { name: "London, UK", location: LatLon(51.51, -0.13) },
];

/// Looks up a preset by its full name or by the city part before the comma, ignoring case.
///
/// ```
/// use tempdist::find_popular_location;
///
/// let tokyo = find_popular_location("tokyo").unwrap();
/// assert_eq!(tokyo.name, "Tokyo, Japan");
/// ```
pub fn find_popular_location(name: &str) -> Option<&'static PopularLocation> {
    let wanted = name.trim().to_lowercase();
    POPULAR_LOCATIONS.iter().find(|preset| {
        let full = preset.name.to_lowercase();
        let city = full.split(',').next().unwrap_or_default().trim().to_string();
        full == wanted || city == wanted
    })
}
