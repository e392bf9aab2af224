/// Mean earth radius used by the haversine formula.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

#[derive(PartialEq, Debug, Clone, Copy)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> GeoPoint {
        GeoPoint{lat, lon}
    }

    /// Great-circle distance in kilometres.  No geodesic correction is applied.
    pub fn haversine_km(&self, other: &GeoPoint) -> f64 {
        haversine_km(self.lat, self.lon, other.lat, other.lon)
    }
}

pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();
    let aa = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let cc = 2.0 * aa.sqrt().atan2((1.0 - aa).sqrt());
    EARTH_RADIUS_KM * cc
}


/// Returns the index and distance of the point in `candidates` nearest to `query`, or None if
/// there are no candidates.
pub fn nearest_of<'a, I>(query: &GeoPoint, candidates: I) -> Option<(usize, f64)>
    where I: IntoIterator<Item = &'a GeoPoint>
{
    let mut best: Option<(usize, f64)> = None;
    for (ii, candidate) in candidates.into_iter().enumerate() {
        let dist = query.haversine_km(candidate);
        match best {
            Some((_, best_dist)) if best_dist <= dist => (),
            _ => best = Some((ii, dist)),
        }
    }
    best
}
