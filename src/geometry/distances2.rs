use ncollide2d::na::{convert, Point2, RealField, Vector2};

/// Return the distance between two 2D points
pub fn dist<N: RealField + Copy>(a: &Point2<N>, b: &Point2<N>) -> N {
    (a - b).norm()
}

/// Compute the intersection parameters between two parameterized lines a0 + t * ad and
/// b0 + u * bd. Will return None if the two directions are parallel to each other.
pub fn intersection_param<N: RealField + Copy>(
    a0: &Point2<N>,
    ad: &Vector2<N>,
    b0: &Point2<N>,
    bd: &Vector2<N>,
) -> Option<(N, N)> {
    let det: N = bd.x * ad.y - bd.y * ad.x;
    let scale = ad.norm() * bd.norm();
    if det.abs() <= scale * convert::<f64, N>(1e-12) {
        return Option::None;
    }

    let dx = b0.x - a0.x;
    let dy = b0.y - a0.y;

    Some(((dy * bd.x - dx * bd.y) / det, (dy * ad.x - dx * ad.y) / det))
}

/// Checks whether the segments p0-p1 and q0-q1 cross each other. Touching at an end point
/// does not count, parallel segments never intersect.
pub fn segments_cross(
    p0: &Point2<f64>,
    p1: &Point2<f64>,
    q0: &Point2<f64>,
    q1: &Point2<f64>,
) -> bool {
    const END_TOL: f64 = 1e-9;
    match intersection_param(p0, &(p1 - p0), q0, &(q1 - q0)) {
        Some((t, u)) => {
            t > END_TOL && t < 1.0 - END_TOL && u > END_TOL && u < 1.0 - END_TOL
        }
        None => false,
    }
}

/// Shoelace area of the polygon implied by the points, positive when counter-clockwise
pub fn signed_area(points: &[Point2<f64>]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }

    let mut total = 0.0;
    for (i, a) in points.iter().enumerate() {
        let b = &points[(i + 1) % points.len()];
        total += a.x * b.y - b.x * a.y;
    }
    total * 0.5
}
