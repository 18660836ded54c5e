//! Overlap tests between body shapes
//!
//! Contact only matters as a yes/no event here, so every test reduces to a
//! signed distance compared against zero.

use glam::Vec2;

use super::body::Shape;

/// Signed distance to a circle
#[inline]
pub fn sd_circle(p: Vec2, center: Vec2, radius: f32) -> f32 {
    (p - center).length() - radius
}

/// Signed distance to an axis-aligned box
#[inline]
pub fn sd_box(p: Vec2, center: Vec2, half_extents: Vec2) -> f32 {
    let d = (p - center).abs() - half_extents;
    d.max(Vec2::ZERO).length() + d.max_element().min(0.0)
}

/// Check whether two shapes touch or overlap
pub fn shapes_overlap(a: &Shape, a_pos: Vec2, b: &Shape, b_pos: Vec2) -> bool {
    match (a, b) {
        (Shape::Circle { radius: ra }, Shape::Circle { radius: rb }) => {
            sd_circle(a_pos, b_pos, *rb) <= *ra
        }
        (Shape::Circle { radius }, Shape::Rect { half_extents }) => {
            sd_box(a_pos, b_pos, *half_extents) <= *radius
        }
        (Shape::Rect { half_extents }, Shape::Circle { radius }) => {
            sd_box(b_pos, a_pos, *half_extents) <= *radius
        }
        (Shape::Rect { half_extents: ha }, Shape::Rect { half_extents: hb }) => {
            let gap = (a_pos - b_pos).abs() - (*ha + *hb);
            gap.max_element() <= 0.0
        }
    }
}

/// Distance from `p` to the segment `from..to`
#[inline]
pub fn segment_distance(p: Vec2, from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    let len_sq = d.length_squared();
    if len_sq <= f32::EPSILON {
        return (p - from).length();
    }
    let t = ((p - from).dot(d) / len_sq).clamp(0.0, 1.0);
    (p - (from + d * t)).length()
}

/// Slab test: does the segment `from..to` pass through the box?
pub fn segment_hits_box(from: Vec2, to: Vec2, center: Vec2, half_extents: Vec2) -> bool {
    let lo = center - half_extents;
    let hi = center + half_extents;
    let d = to - from;
    let (mut t_min, mut t_max) = (0.0f32, 1.0f32);

    for axis in 0..2 {
        if d[axis].abs() <= f32::EPSILON {
            if from[axis] < lo[axis] || from[axis] > hi[axis] {
                return false;
            }
            continue;
        }
        let inv = 1.0 / d[axis];
        let mut t0 = (lo[axis] - from[axis]) * inv;
        let mut t1 = (hi[axis] - from[axis]) * inv;
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }
        t_min = t_min.max(t0);
        t_max = t_max.min(t1);
        if t_min > t_max {
            return false;
        }
    }
    true
}

/// Check whether `moving`, travelling from `from` to `to` during one step,
/// touched the static shape at any point on the way.
///
/// Boxes are grown by the moving shape's extent, so the corners are slightly
/// generous.
pub fn swept_overlap(
    fixed: &Shape,
    fixed_pos: Vec2,
    moving: &Shape,
    from: Vec2,
    to: Vec2,
) -> bool {
    match (fixed, moving) {
        (Shape::Circle { radius: rf }, Shape::Circle { radius: rm }) => {
            segment_distance(fixed_pos, from, to) <= rf + rm
        }
        (Shape::Rect { half_extents }, Shape::Circle { radius }) => {
            segment_hits_box(from, to, fixed_pos, *half_extents + Vec2::splat(*radius))
        }
        (Shape::Circle { radius }, Shape::Rect { half_extents }) => {
            segment_hits_box(from, to, fixed_pos, *half_extents + Vec2::splat(*radius))
        }
        (Shape::Rect { half_extents: hf }, Shape::Rect { half_extents: hm }) => {
            segment_hits_box(from, to, fixed_pos, *hf + *hm)
        }
    }
}
