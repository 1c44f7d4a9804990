use crate::math::{Point, Real};

/// The point of the segment `[a, b]` closest to `pt`, and its parameter along the segment.
#[inline]
pub fn closest_point_on_segment(a: &Point, b: &Point, pt: &Point) -> (Point, Real) {
    let ab = b - a;
    let sqnab = ab.norm_squared();

    if sqnab == 0.0 {
        return (*a, 0.0);
    }

    let t = ((pt - a).dot(&ab) / sqnab).clamp(0.0, 1.0);
    (a + ab * t, t)
}

/// The pair of closest points between the segments `[a1, b1]` and `[a2, b2]`.
pub fn closest_points_segment_segment(
    a1: &Point,
    b1: &Point,
    a2: &Point,
    b2: &Point,
) -> (Point, Point) {
    let d1 = b1 - a1;
    let d2 = b2 - a2;
    let r = a1 - a2;

    let a = d1.norm_squared();
    let e = d2.norm_squared();
    let f = d2.dot(&r);

    let (s, t);

    if a == 0.0 && e == 0.0 {
        return (*a1, *a2);
    } else if a == 0.0 {
        s = 0.0;
        t = (f / e).clamp(0.0, 1.0);
    } else {
        let c = d1.dot(&r);

        if e == 0.0 {
            t = 0.0;
            s = (-c / a).clamp(0.0, 1.0);
        } else {
            let b = d1.dot(&d2);
            let denom = a * e - b * b;

            // Parallel segments pick an arbitrary s.
            let mut s0 = if denom != 0.0 {
                ((b * f - c * e) / denom).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let mut t0 = (b * s0 + f) / e;

            if t0 < 0.0 {
                t0 = 0.0;
                s0 = (-c / a).clamp(0.0, 1.0);
            } else if t0 > 1.0 {
                t0 = 1.0;
                s0 = ((b - c) / a).clamp(0.0, 1.0);
            }

            s = s0;
            t = t0;
        }
    }

    (a1 + d1 * s, a2 + d2 * t)
}
