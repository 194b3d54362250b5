use super::types::{Direction, Point, WallCollisionMode};

/// The playing field: `width × height` cells plus the policy for what
/// happens at the edges.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    width: i32,
    height: i32,
    wall_collision_mode: WallCollisionMode,
}

impl Grid {
    pub fn new(
        width: u32,
        height: u32,
        wall_collision_mode: WallCollisionMode,
    ) -> Result<Self, String> {
        if width == 0 || height == 0 {
            return Err(format!("Field must not be empty, got {}x{}", width, height));
        }
        let width =
            i32::try_from(width).map_err(|_| format!("Field width {} is too large", width))?;
        let height =
            i32::try_from(height).map_err(|_| format!("Field height {} is too large", height))?;

        Ok(Self {
            width,
            height,
            wall_collision_mode,
        })
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn wall_collision_mode(&self) -> WallCollisionMode {
        self.wall_collision_mode
    }

    pub fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn center(&self) -> Point {
        Point::new(self.width / 2, self.height / 2)
    }

    pub fn contains(&self, cell: Point) -> bool {
        (0..self.width).contains(&cell.x) && (0..self.height).contains(&cell.y)
    }

    pub fn is_out_of_bounds(&self, cell: Point) -> bool {
        !self.contains(cell)
    }

    pub fn wrap(&self, cell: Point) -> Point {
        Point::new(cell.x.rem_euclid(self.width), cell.y.rem_euclid(self.height))
    }

    /// The cell reached by moving one step from `from`, or `None` when the
    /// step leaves a field whose walls kill.
    pub fn step(&self, from: Point, direction: Direction) -> Option<Point> {
        let next = from.offset(direction);
        match self.wall_collision_mode {
            WallCollisionMode::WrapAround => Some(self.wrap(next)),
            WallCollisionMode::Death if self.contains(next) => Some(next),
            WallCollisionMode::Death => None,
        }
    }

    /// Every cell, row by row.
    pub fn cells(&self) -> impl Iterator<Item = Point> + use<> {
        let width = self.width;
        (0..self.height).flat_map(move |y| (0..width).map(move |x| Point::new(x, y)))
    }
}
