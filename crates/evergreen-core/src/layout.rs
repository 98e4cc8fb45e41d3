//! Foliage stacking and star placement

use serde::Serialize;

/// Radius step between consecutive foliage cones
pub const LEVEL_RADIUS_STEP: f32 = 0.5;

/// Vertical step between consecutive foliage cones
pub const LEVEL_HEIGHT_STEP: f32 = 1.5;

/// One cone of foliage
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FoliageLevel {
    pub index: u32,
    /// Base radius of the cone
    pub radius: f32,
    /// Cone length along Y
    pub height: f32,
    /// Y coordinate of the cone's centre
    pub y: f32,
}

/// Ordered foliage cones, bottom to top
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FoliageLayout {
    pub levels: Vec<FoliageLevel>,
}

impl FoliageLayout {
    /// Y of the topmost cone, where the star is anchored
    pub fn top(&self) -> Option<f32> {
        self.levels.last().map(|level| level.y)
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

/// Stack `levels` cones, each narrower and higher than the one below
///
/// Level `i` has radius `(levels - 1) - 0.5·i` and sits at `levels + 1.5·i`;
/// every cone is `levels` tall.
pub fn foliage_layout(levels: u32) -> FoliageLayout {
    let n = levels as f32;
    let levels = (0..levels)
        .map(|i| {
            let i_f = i as f32;
            FoliageLevel {
                index: i,
                radius: (n - 1.0) - i_f * LEVEL_RADIUS_STEP,
                height: n,
                y: n + i_f * LEVEL_HEIGHT_STEP,
            }
        })
        .collect();
    FoliageLayout { levels }
}

/// Star height for a tree whose top cone sits at `top`
pub fn star_height(top: f32, offset: f32) -> f32 {
    top + offset
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_levels() {
        let layout = foliage_layout(3);

        let radii: Vec<f32> = layout.levels.iter().map(|l| l.radius).collect();
        let heights: Vec<f32> = layout.levels.iter().map(|l| l.y).collect();
        assert_eq!(radii, vec![2.0, 1.5, 1.0]);
        assert_eq!(heights, vec![3.0, 4.5, 6.0]);
        assert!(layout.levels.iter().all(|l| l.height == 3.0));
        assert_eq!(layout.top(), Some(6.0));
    }

    #[test]
    fn test_stack_shrinks_and_rises() {
        for levels in 1..=6 {
            let layout = foliage_layout(levels);
            assert_eq!(layout.len(), levels as usize);
            for pair in layout.levels.windows(2) {
                assert!(pair[1].radius < pair[0].radius);
                assert!(pair[1].y > pair[0].y);
            }
        }
    }

    #[test]
    fn test_star_sits_offset_above_top() {
        let offset = 2.0;

        let three = foliage_layout(3);
        assert_eq!(star_height(three.top().unwrap(), offset), 8.0);

        let five = foliage_layout(5);
        let top = five.top().unwrap();
        assert_eq!(top, 5.0 + 4.0 * 1.5);
        assert_eq!(star_height(top, offset), top + offset);
    }

    #[test]
    fn test_empty_layout_has_no_top() {
        let layout = foliage_layout(0);
        assert!(layout.is_empty());
        assert_eq!(layout.top(), None);
    }
}
