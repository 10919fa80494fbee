use super::offset::Offset;

/// Integer Bresenham rasterization from `start` to `end`, inclusive of both
/// endpoints.
///
/// When the two axis deltas are equal (a perfect diagonal tie), the walk
/// steps horizontally before vertically at each tied pixel — this crate's
/// fixed tie-break, chosen to match `line((0,0),(3,2))` producing
/// `[(0,0),(1,1),(2,1),(3,2)]`. Identical endpoints yield a single-cell path.
pub fn line(start: Offset, end: Offset) -> Vec<Offset> {
    line_with(start, end, |_| true).unwrap_or_default()
}

/// Same rasterization, but aborts as soon as `passable` rejects an
/// intermediate cell. The endpoints are never tested for passability by
/// this function; callers that need the endpoints checked should test them
/// separately. Returns `None` if the walk was aborted partway, `Some` with
/// the full path otherwise (including the case where `start == end`).
pub fn line_with(start: Offset, end: Offset, mut passable: impl FnMut(Offset) -> bool) -> Option<Vec<Offset>> {
    if start == end {
        return Some(vec![start]);
    }

    let dx = (end.x - start.x).abs();
    let dy = -(end.y - start.y).abs();
    let sx = if start.x < end.x { 1 } else { -1 };
    let sy = if start.y < end.y { 1 } else { -1 };

    let mut path = Vec::new();
    let mut x = start.x;
    let mut y = start.y;
    let mut err = dx + dy;

    loop {
        let here = Offset::new(x, y);
        let is_endpoint = here == start || here == end;
        if !is_endpoint && !passable(here) {
            return None;
        }
        path.push(here);

        if here == end {
            break;
        }

        let e2 = 2 * err;
        let step_x = e2 >= dy;
        let step_y = e2 <= dx;

        if step_x {
            err += dy;
            x += sx;
        }
        if step_y {
            err += dx;
            y += sy;
        }
    }

    Some(path)
}
