use crate::Located;

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Great-circle distance in meters.
pub fn haversine_m(a: &impl Located, b: &impl Located) -> f64 {
    let (lat1, lat2) = (a.latitude().to_radians(), b.latitude().to_radians());
    let dlat = lat2 - lat1;
    let dlon = (b.longitude() - a.longitude()).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    // Rounding can push h a hair past 1 for antipodal points.
    2.0 * EARTH_RADIUS_M * h.sqrt().min(1.0).asin()
}

/// Distance to the closest reference point; `None` when there are none.
pub fn nearest_m<P: Located>(item: &impl Located, points: &[P]) -> Option<f64> {
    points
        .iter()
        .map(|p| haversine_m(item, p))
        .min_by(|a, b| a.total_cmp(b))
}

/// Keep records within `meters` (inclusive) of at least one point.
/// An empty point set keeps nothing.
pub fn within_radius<T: Located, P: Located>(records: Vec<T>, points: &[P], meters: f64) -> Vec<T> {
    let before = records.len();
    let kept: Vec<T> = records
        .into_iter()
        .filter(|r| nearest_m(r, points).is_some_and(|d| d <= meters))
        .collect();
    log::info!(
        "radius filter: kept {} of {} records within {meters} m of {} points",
        kept.len(),
        before,
        points.len()
    );
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Point;
    use proptest::prelude::*;

    const BOSTON: Point = Point {
        latitude: 42.3601,
        longitude: -71.0589,
    };
    const NEW_YORK: Point = Point {
        latitude: 40.7128,
        longitude: -74.0060,
    };

    #[test]
    fn one_degree_of_latitude() {
        let d = haversine_m(&Point::new(0.0, 0.0), &Point::new(1.0, 0.0));
        assert!((d - 111_194.93).abs() < 0.01, "{d}");
    }

    #[test]
    fn boston_to_new_york() {
        let d = haversine_m(&BOSTON, &NEW_YORK);
        assert!((305_000.0..308_000.0).contains(&d), "{d}");
    }

    #[test]
    fn radius_is_inclusive_and_uses_nearest_point() {
        let poi = [NEW_YORK, BOSTON];
        // ~111 m north of the Boston point.
        let near = Point::new(42.3611, -71.0589);
        let far = Point::new(42.40, -71.0589);

        let kept = within_radius(vec![near, far], &poi, 200.0);
        assert_eq!(kept, vec![near]);

        let exact = haversine_m(&near, &BOSTON);
        assert_eq!(within_radius(vec![near], &poi, exact).len(), 1);
    }

    #[test]
    fn no_points_keeps_nothing() {
        let none: [Point; 0] = [];
        assert!(within_radius(vec![BOSTON], &none, 1e9).is_empty());
        assert_eq!(nearest_m(&BOSTON, &none), None);
    }

    proptest! {
        #[test]
        fn symmetric_and_non_negative(
            lat1 in -90.0f64..90.0, lon1 in -180.0f64..180.0,
            lat2 in -90.0f64..90.0, lon2 in -180.0f64..180.0,
        ) {
            let a = Point::new(lat1, lon1);
            let b = Point::new(lat2, lon2);
            let ab = haversine_m(&a, &b);
            prop_assert!(ab >= 0.0);
            prop_assert!((ab - haversine_m(&b, &a)).abs() < 1e-6);
            prop_assert!(ab <= std::f64::consts::PI * EARTH_RADIUS_M + 1e-6);
            prop_assert!(haversine_m(&a, &a) < 1e-6);
        }
    }
}
