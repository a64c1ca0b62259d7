//! Piece shapes and their cell layouts.

use crate::board::Coord;

macro_rules! cells {
    ($(($column:literal, $row:literal)),* $(,)?) => {
        &[$(Coord { column: $column, row: $row }),*]
    };
}

/// A piece shape.
///
/// Cell offsets are relative to the anchor (top-left of the bounding box),
/// with rows growing downward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    // Classic tetromino shapes
    OrangeRicky,  // ▄▄█
    BlueRicky,    // █▄▄
    ClevelandZ,   // ▀█▄
    RhodeIslandZ, // ▄█▀
    Hero,         // ▄▄▄▄
    Teewee,       // ▄█▄
    Smashboy,     // ██

    // Rotations and extra sizes
    OrangeRickyUp,
    BlueRickyUp,
    ClevelandZUp,
    RhodeIslandZUp,
    HeroUp,
    LongHero,
    LongHeroUp,
    ShortHero,
    ShortHeroUp,
    Duce,
    DuceUp,
    Single,
    TeeweeDown,
    TeeweeRight,
    TeeweeLeft,
    LongSmashboy,
    LongSmashboyUp,
    Huge,
}

impl Shape {
    /// Every shape, in declaration order. Random pieces draw uniformly from this.
    pub const ALL: [Shape; 25] = [
        Shape::OrangeRicky,
        Shape::BlueRicky,
        Shape::ClevelandZ,
        Shape::RhodeIslandZ,
        Shape::Hero,
        Shape::Teewee,
        Shape::Smashboy,
        Shape::OrangeRickyUp,
        Shape::BlueRickyUp,
        Shape::ClevelandZUp,
        Shape::RhodeIslandZUp,
        Shape::HeroUp,
        Shape::LongHero,
        Shape::LongHeroUp,
        Shape::ShortHero,
        Shape::ShortHeroUp,
        Shape::Duce,
        Shape::DuceUp,
        Shape::Single,
        Shape::TeeweeDown,
        Shape::TeeweeRight,
        Shape::TeeweeLeft,
        Shape::LongSmashboy,
        Shape::LongSmashboyUp,
        Shape::Huge,
    ];

    /// Cell offsets covered by this shape.
    pub fn cells(&self) -> &'static [Coord] {
        match self {
            Shape::OrangeRicky => cells![(0, 1), (1, 1), (2, 0), (2, 1)],
            Shape::BlueRicky => cells![(0, 0), (0, 1), (1, 1), (2, 1)],
            Shape::ClevelandZ => cells![(0, 0), (1, 0), (1, 1), (2, 1)],
            Shape::RhodeIslandZ => cells![(0, 1), (1, 0), (1, 1), (2, 0)],
            Shape::Hero => cells![(0, 0), (1, 0), (2, 0), (3, 0)],
            Shape::Teewee => cells![(0, 1), (1, 0), (1, 1), (2, 1)],
            Shape::Smashboy => cells![(0, 0), (0, 1), (1, 0), (1, 1)],
            // █
            // █▄
            Shape::OrangeRickyUp => cells![(0, 0), (0, 1), (0, 2), (1, 2)],
            // █▀
            // █
            Shape::BlueRickyUp => cells![(0, 0), (0, 1), (0, 2), (1, 0)],
            // ▄█
            // █
            Shape::ClevelandZUp => cells![(1, 0), (1, 1), (0, 1), (0, 2)],
            // █▄
            //  █
            Shape::RhodeIslandZUp => cells![(0, 0), (0, 1), (1, 1), (1, 2)],
            Shape::HeroUp => cells![(0, 0), (0, 1), (0, 2), (0, 3)],
            Shape::LongHero => cells![(0, 0), (1, 0), (2, 0), (3, 0), (4, 0)],
            Shape::LongHeroUp => cells![(0, 0), (0, 1), (0, 2), (0, 3), (0, 4)],
            Shape::ShortHero => cells![(0, 0), (1, 0), (2, 0)],
            Shape::ShortHeroUp => cells![(0, 0), (0, 1), (0, 2)],
            Shape::Duce => cells![(0, 0), (1, 0)],
            Shape::DuceUp => cells![(0, 0), (0, 1)],
            Shape::Single => cells![(0, 0)],
            // ▀█▀
            Shape::TeeweeDown => cells![(0, 0), (1, 0), (1, 1), (2, 0)],
            Shape::TeeweeRight => cells![(0, 0), (0, 1), (1, 1), (0, 2)],
            Shape::TeeweeLeft => cells![(1, 0), (0, 1), (1, 1), (1, 2)],
            Shape::LongSmashboy => cells![(0, 0), (0, 1), (1, 0), (1, 1), (2, 0), (2, 1)],
            Shape::LongSmashboyUp => cells![(0, 0), (1, 0), (0, 1), (1, 1), (0, 2), (1, 2)],
            Shape::Huge => cells![
                (0, 0),
                (0, 1),
                (0, 2),
                (1, 0),
                (1, 1),
                (1, 2),
                (2, 0),
                (2, 1),
                (2, 2),
            ],
        }
    }

    /// Width and height of the shape's bounding box.
    pub fn extent(&self) -> (usize, usize) {
        self.cells().iter().fold((0, 0), |(width, height), cell| {
            (width.max(cell.column + 1), height.max(cell.row + 1))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_cells_are_unique() {
        for shape in Shape::ALL {
            let unique: HashSet<_> = shape.cells().iter().collect();
            assert_eq!(unique.len(), shape.cells().len(), "{:?}", shape);
        }
    }

    #[test]
    fn test_cells_touch_origin() {
        // Every shape's bounding box starts at the anchor.
        for shape in Shape::ALL {
            assert!(shape.cells().iter().any(|c| c.column == 0), "{:?}", shape);
            assert!(shape.cells().iter().any(|c| c.row == 0), "{:?}", shape);
        }
    }

    #[test]
    fn test_extent() {
        assert_eq!(Shape::Single.extent(), (1, 1));
        assert_eq!(Shape::LongHero.extent(), (5, 1));
        assert_eq!(Shape::LongHeroUp.extent(), (1, 5));
        assert_eq!(Shape::Huge.extent(), (3, 3));
        assert_eq!(Shape::TeeweeLeft.extent(), (2, 3));
    }
}
