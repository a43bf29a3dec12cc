//! Great-circle distance and bounding-box helpers for the nearby query.
//!
//! SQLite carries no geospatial index, so the nearby query runs in two stages:
//! a cheap bounding-box prefilter in SQL (served by the campus/longitude/latitude
//! index) followed by an exact haversine check on the survivors. The box always
//! fully contains the requested radius, so the prefilter never drops a true hit.

/// Mean Earth radius in meters (IUGG).
const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Great-circle distance between two points, in meters.
///
/// Arguments are longitude-first to match the stored GeoJSON ordering.
pub fn haversine_m(lon1: f64, lat1: f64, lon2: f64, lat2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let d_phi = (lat2 - lat1).to_radians();
    let d_lambda = (lon2 - lon1).to_radians();

    let a = (d_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * a.sqrt().asin()
}

/// A latitude/longitude box that fully contains a radius around a center point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub west: f64,
    pub east: f64,
    pub south: f64,
    pub north: f64,
}

impl BoundingBox {
    /// Builds the box around `(lon, lat)` with `radius_m` of slack on each side.
    ///
    /// Near the poles the longitude span degenerates to the full circle; when
    /// the box crosses the antimeridian, `west > east` and
    /// [`BoundingBox::crosses_antimeridian`] reports it.
    pub fn around(lon: f64, lat: f64, radius_m: f64) -> Self {
        let lat_delta = (radius_m / EARTH_RADIUS_M).to_degrees();
        let south = (lat - lat_delta).max(-90.0);
        let north = (lat + lat_delta).min(90.0);

        let cos_lat = lat.to_radians().cos();
        // Longitude degrees shrink towards the poles.
        let lon_delta = if cos_lat <= f64::EPSILON {
            180.0
        } else {
            ((radius_m / (EARTH_RADIUS_M * cos_lat)).to_degrees()).min(180.0)
        };

        let mut west = lon - lon_delta;
        let mut east = lon + lon_delta;
        if lon_delta >= 180.0 {
            west = -180.0;
            east = 180.0;
        } else {
            if west < -180.0 {
                west += 360.0;
            }
            if east > 180.0 {
                east -= 360.0;
            }
        }

        Self {
            west,
            east,
            south,
            north,
        }
    }

    pub fn crosses_antimeridian(&self) -> bool {
        self.west > self.east
    }
}
