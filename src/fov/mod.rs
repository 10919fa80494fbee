//! Recursive octant shadow-casting field of view, optionally limited to an
//! angular cone. Produces an `Area` of visible offsets around an origin.

use crate::area::Area;
use crate::geometry::Offset;

/// The eight `(xx, xy, yx, yy)` transforms that map a local `(col, row)`
/// coordinate in the canonical NNE octant onto world space for each of the
/// eight octants around the origin.
const OCTANTS: [(i32, i32, i32, i32); 8] = [
    (1, 0, 0, 1),
    (0, 1, 1, 0),
    (0, -1, 1, 0),
    (-1, 0, 0, 1),
    (-1, 0, 0, -1),
    (0, -1, -1, 0),
    (0, 1, -1, 0),
    (1, 0, 0, -1),
];

/// Computes visibility from `origin` out to `radius` (Euclidean), through
/// cells for which `pass` holds. `cone`, if given, is `(angle_degrees,
/// span_degrees)`: only bearings within `span/2` of `angle` are marked
/// visible. The origin is always visible; `radius == 0` returns only the
/// origin.
pub fn shadow_cast(origin: Offset, radius: u32, cone: Option<(f64, f64)>, pass: impl Fn(Offset) -> bool) -> Area {
    let mut visible = Area::empty();
    visible.insert(origin);

    if radius == 0 {
        return visible;
    }

    for octant in OCTANTS {
        cast_octant(origin, octant, radius, cone, &pass, &mut visible);
    }

    visible
}

fn within_cone(dx: i32, dy: i32, cone: Option<(f64, f64)>) -> bool {
    let Some((angle, span)) = cone else {
        return true;
    };
    if dx == 0 && dy == 0 {
        return true;
    }
    let bearing = (dy as f64).atan2(dx as f64).to_degrees();
    let mut delta = (bearing - angle) % 360.0;
    if delta > 180.0 {
        delta -= 360.0;
    }
    if delta < -180.0 {
        delta += 360.0;
    }
    delta.abs() <= span / 2.0
}

#[allow(clippy::too_many_arguments)]
fn cast_octant(
    origin: Offset,
    (xx, xy, yx, yy): (i32, i32, i32, i32),
    radius: u32,
    cone: Option<(f64, f64)>,
    pass: &impl Fn(Offset) -> bool,
    visible: &mut Area,
) {
    sweep(origin, (xx, xy, yx, yy), radius, cone, pass, visible, 1, 1.0, 0.0);
}

#[allow(clippy::too_many_arguments)]
fn sweep(
    origin: Offset,
    transform: (i32, i32, i32, i32),
    radius: u32,
    cone: Option<(f64, f64)>,
    pass: &impl Fn(Offset) -> bool,
    visible: &mut Area,
    row: u32,
    start_slope: f64,
    end_slope: f64,
) {
    if start_slope < end_slope {
        return;
    }

    let (xx, xy, yx, yy) = transform;
    let radius_sq = (radius as i64) * (radius as i64);
    let mut start_slope = start_slope;
    let mut blocked = false;
    let mut next_start_slope = start_slope;

    for i in row..=radius {
        let di = i as i32;
        let mut dx = -di;
        let dy = -di;
        while dx <= 0 {
            let l_slope = (dx as f64 - 0.5) / (dy as f64 + 0.5);
            let r_slope = (dx as f64 + 0.5) / (dy as f64 - 0.5);

            if start_slope < r_slope {
                dx += 1;
                continue;
            }
            if end_slope > l_slope {
                break;
            }

            let sym_x = dx * xx + dy * xy;
            let sym_y = dx * yx + dy * yy;
            let pos = origin + Offset::new(sym_x, sym_y);

            let dist_sq = (dx as i64) * (dx as i64) + (dy as i64) * (dy as i64);
            if dist_sq <= radius_sq && within_cone(sym_x, sym_y, cone) {
                visible.insert(pos);
            }

            let opaque = !pass(pos);
            if blocked {
                if opaque {
                    next_start_slope = r_slope;
                } else {
                    blocked = false;
                    start_slope = next_start_slope;
                }
            } else if opaque && i < radius {
                blocked = true;
                sweep(origin, transform, radius, cone, pass, visible, i + 1, start_slope, l_slope);
                next_start_slope = r_slope;
            }

            dx += 1;
        }

        if blocked {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn radius_zero_sees_only_origin() {
        let origin = Offset::new(5, 5);
        let area = shadow_cast(origin, 0, None, |_| true);
        assert_eq!(area.len(), 1);
        assert!(area.contains(origin));
    }

    #[test]
    fn open_field_sees_every_cell_within_chebyshev_radius() {
        let origin = Offset::new(5, 5);
        let area = shadow_cast(origin, 3, None, |_| true);
        let mut expected = 0;
        for y in 2..=8 {
            for x in 2..=8 {
                let p = Offset::new(x, y);
                if origin.euclidean(&p) <= 3.0 {
                    expected += 1;
                    assert!(area.contains(p), "expected {:?} visible", p);
                }
            }
        }
        assert_eq!(area.len(), expected);
    }

    #[test]
    fn opaque_wall_occludes_the_cells_behind_it() {
        let origin = Offset::new(5, 5);
        let wall = Offset::new(5, 4);
        let area = shadow_cast(origin, 5, None, |p| p != wall);

        assert!(area.contains(wall));
        assert!(!area.contains(Offset::new(5, 3)));
        assert!(!area.contains(Offset::new(5, 0)));
        assert!(area.contains(Offset::new(4, 4)));
        assert!(area.contains(Offset::new(6, 4)));
    }

    #[test]
    fn nothing_beyond_radius_is_ever_visible() {
        let origin = Offset::new(0, 0);
        let area = shadow_cast(origin, 4, None, |_| true);
        for pos in area.iter() {
            assert!(origin.euclidean(&pos) <= 4.0 + 1e-9);
        }
    }

    #[test]
    fn fov_is_approximately_symmetric() {
        let origin = Offset::new(10, 10);
        let target = Offset::new(13, 8);
        let wall = Offset::new(12, 9);
        let forward = shadow_cast(origin, 6, None, |p| p != wall);
        let backward = shadow_cast(target, 6, None, |p| p != wall);
        assert_eq!(forward.contains(target), backward.contains(origin));
    }
}
