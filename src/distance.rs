use crate::problem::{CitySet, Point};

/// Length of the closed tour visiting `cities` in `route` order,
/// including the edge from the last city back to the first.
pub fn path_distance(cities: &CitySet, route: &[usize]) -> f64 {
    let n = route.len();
    (0..n)
        .map(|p| cities.get(route[(p + n - 1) % n]).dist(&cities.get(route[p])))
        .sum()
}

/// Closed tour length for points that are already in visiting order.
pub fn ordered_distance(points: &[Point]) -> f64 {
    let n = points.len();
    (0..n)
        .map(|p| points[(p + n - 1) % n].dist(&points[p]))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cities() -> CitySet {
        CitySet::new(vec![
            Point::new(0.0, 0.0),
            Point::new(3.0, 0.0),
            Point::new(3.0, 4.0),
            Point::new(0.0, 4.0),
            Point::new(1.5, 6.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_includes_closing_edge() {
        let cities = cities();
        // 3 + 4 + 3 + 4 on the rectangle
        let d = path_distance(&cities, &[0, 1, 2, 3]);
        assert!((d - 14.0).abs() < 1e-12);
    }

    #[test]
    fn test_additive_over_edges() {
        let cities = cities();
        let route = [4, 1, 0, 3, 2];
        let expected: f64 = route
            .iter()
            .zip(route.iter().cycle().skip(1))
            .map(|(&a, &b)| cities.get(a).dist(&cities.get(b)))
            .sum();
        assert!((path_distance(&cities, &route) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_rotation_and_reversal_invariant() {
        let cities = cities();
        let route = vec![2, 0, 4, 1, 3];
        let base = path_distance(&cities, &route);

        for shift in 0..route.len() {
            let mut rotated = route.clone();
            rotated.rotate_left(shift);
            assert!((path_distance(&cities, &rotated) - base).abs() < 1e-9);
        }

        let reversed: Vec<usize> = route.iter().rev().copied().collect();
        assert!((path_distance(&cities, &reversed) - base).abs() < 1e-9);
    }

    #[test]
    fn test_ordered_matches_identity_route() {
        let cities = cities();
        let identity = cities.identity_route();
        let a = ordered_distance(cities.points());
        let b = path_distance(&cities, &identity);
        assert!((a - b).abs() < 1e-12);
    }
}
