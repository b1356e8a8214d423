/// Grid axis value. Signed, since pointer positions left of or above the
/// surface map to negative cells that are still forwarded to the engine.
pub type Coord = i64;

/// Zero-indexed `(row, col)` cell position, row-major.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct GridCoord {
    pub row: Coord,
    pub col: Coord,
}

impl GridCoord {
    pub const fn new(row: Coord, col: Coord) -> Self {
        Self { row, col }
    }

    pub fn to_nd_index(self) -> Option<(usize, usize)> {
        Some((usize::try_from(self.row).ok()?, usize::try_from(self.col).ok()?))
    }
}

impl From<(usize, usize)> for GridCoord {
    fn from((row, col): (usize, usize)) -> Self {
        Self::new(row as Coord, col as Coord)
    }
}

/// Pixel position.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned pixel rectangle, `(x, y)` being the top-left corner.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2., self.y + self.height / 2.)
    }

    /// Half-open containment, matching how pointer positions map to cells.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x < self.x + self.width
            && point.y >= self.y
            && point.y < self.y + self.height
    }
}
