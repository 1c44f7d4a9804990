use crate::math::{Real, UnitVector};

/// The penetration of two shapes along a candidate axis.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Penetration {
    /// The direction the first shape has to move along to separate.
    pub normal: UnitVector,
    /// The overlap of both projections along `normal`.
    pub depth: Real,
}

impl Penetration {
    /// Keeps in `best` whichever of `best` and `self` has the smallest depth.
    #[inline]
    pub fn keep_shallowest(self, best: &mut Option<Penetration>) {
        match best {
            Some(b) if b.depth <= self.depth => {}
            _ => *best = Some(self),
        }
    }
}

/// Compares the projection intervals `[min1, max1]` and `[min2, max2]` of two
/// shapes on `axis`.
///
/// Returns `None` if the intervals are disjoint or merely touching (the
/// axis separates the shapes). Otherwise returns the smallest of the two
/// possible penetrations: moving the first shape along `-axis` or along
/// `axis`.
#[inline]
pub fn axis_penetration(
    axis: &UnitVector,
    (min1, max1): (Real, Real),
    (min2, max2): (Real, Real),
) -> Option<Penetration> {
    let d_pos = max2 - min1;
    let d_neg = max1 - min2;

    if d_pos <= 0.0 || d_neg <= 0.0 {
        return None;
    }

    if d_neg <= d_pos {
        Some(Penetration {
            normal: -*axis,
            depth: d_neg,
        })
    } else {
        Some(Penetration {
            normal: *axis,
            depth: d_pos,
        })
    }
}
