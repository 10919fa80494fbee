use super::extent::Extent;
use super::offset::Offset;

/// An axis-aligned rectangle anchored at `position` with size `extent`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    pub position: Offset,
    pub extent: Extent,
}

impl Rect {
    pub fn new(position: Offset, extent: Extent) -> Rect {
        Rect { position, extent }
    }

    pub fn left(&self) -> i32 {
        self.position.x
    }

    pub fn top(&self) -> i32 {
        self.position.y
    }

    pub fn right(&self) -> i32 {
        self.position.x + self.extent.w as i32
    }

    pub fn bottom(&self) -> i32 {
        self.position.y + self.extent.h as i32
    }

    /// Whether `offset` lies within this rect under half-open bounds.
    pub fn contains(&self, offset: &Offset) -> bool {
        offset.x >= self.left()
            && offset.x < self.right()
            && offset.y >= self.top()
            && offset.y < self.bottom()
    }

    /// Whether this rect and `other` share at least one point.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }

    /// Row-major iteration over every offset contained in this rect.
    pub fn offsets(&self) -> impl Iterator<Item = Offset> + '_ {
        (self.top()..self.bottom())
            .flat_map(move |y| (self.left()..self.right()).map(move |x| Offset::new(x, y)))
    }
}
