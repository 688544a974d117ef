//! Surface distance between two latitude/longitude positions.
//!
//! Analysis code only sees the [`DistanceModel`] trait, so the earth model can
//! be swapped without touching the estimator.

use geo::{Distance, Point};

/// A position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
}

impl Coordinate {
    pub fn new(latitude_deg: f64, longitude_deg: f64) -> Self {
        Self {
            latitude_deg,
            longitude_deg,
        }
    }

    fn point(self) -> Point<f64> {
        Point::new(self.longitude_deg, self.latitude_deg)
    }
}

/// Computes the surface distance between two coordinates.
pub trait DistanceModel: Send + Sync {
    fn distance_m(&self, a: Coordinate, b: Coordinate) -> f64;

    /// Short identifier written into reports.
    fn name(&self) -> &'static str;
}

/// Great-circle distance on a sphere of mean earth radius.
#[derive(Debug, Clone, Copy, Default)]
pub struct Haversine;

impl DistanceModel for Haversine {
    fn distance_m(&self, a: Coordinate, b: Coordinate) -> f64 {
        geo::Haversine.distance(a.point(), b.point())
    }

    fn name(&self) -> &'static str {
        "haversine"
    }
}

/// Ellipsoidal distance on WGS-84 (Karney's geodesic solution).
///
/// Agrees with Vincenty's inverse formula to well under a millimeter wherever
/// Vincenty converges, and also handles nearly antipodal points.
#[derive(Debug, Clone, Copy, Default)]
pub struct Geodesic;

impl DistanceModel for Geodesic {
    fn distance_m(&self, a: Coordinate, b: Coordinate) -> f64 {
        geo::Geodesic.distance(a.point(), b.point())
    }

    fn name(&self) -> &'static str {
        "geodesic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// WGS-84 semi-major axis in meters.
    const WGS84_A: f64 = 6_378_137.0;

    #[test]
    fn test_geodesic_flinders_peak_to_buninyong() {
        // Reference geodesic from Vincenty's 1975 paper.
        let flinders = Coordinate::new(-37.951_033_416_666_67, 144.424_867_888_888_9);
        let buninyong = Coordinate::new(-37.652_821_138_888_89, 143.926_495_527_777_8);

        let d = Geodesic.distance_m(flinders, buninyong);
        assert!((d - 54_972.271).abs() < 0.01, "got {d}");
    }

    #[test]
    fn test_geodesic_one_degree_along_equator() {
        let d = Geodesic.distance_m(Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 1.0));
        assert_relative_eq!(d, WGS84_A * 1f64.to_radians(), epsilon = 1e-4);
    }

    #[test]
    fn test_geodesic_coincident_points() {
        let p = Coordinate::new(35.9, 14.5);
        assert!(Geodesic.distance_m(p, p).abs() < 1e-9);
    }

    #[test]
    fn test_geodesic_nearly_antipodal_points() {
        // Vincenty's iteration does not converge for this pair.
        let d = Geodesic.distance_m(Coordinate::new(0.0, 0.0), Coordinate::new(0.5, 179.7));
        assert!(d.is_finite());
        assert!(d > 19_900_000.0 && d < 20_010_000.0, "got {d}");
    }

    #[test]
    fn test_haversine_one_degree_of_latitude() {
        // about 111.195 km on a sphere of mean earth radius
        let d = Haversine.distance_m(Coordinate::new(10.0, 20.0), Coordinate::new(11.0, 20.0));
        assert!((d - 111_195.0).abs() < 1.0, "got {d}");
    }

    #[test]
    fn test_models_agree_on_short_distances() {
        // A few tens of meters in Valletta.
        let a = Coordinate::new(35.8989, 14.5146);
        let b = Coordinate::new(35.8992, 14.5149);

        let ellipsoidal = Geodesic.distance_m(a, b);
        let spherical = Haversine.distance_m(a, b);
        assert!(ellipsoidal > 40.0 && ellipsoidal < 45.0, "got {ellipsoidal}");
        assert!((ellipsoidal - spherical).abs() / ellipsoidal < 0.005);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let a = Coordinate::new(35.8989, 14.5146);
        let b = Coordinate::new(35.9120, 14.5020);
        assert_relative_eq!(
            Geodesic.distance_m(a, b),
            Geodesic.distance_m(b, a),
            epsilon = 1e-6
        );
    }
}
