use crate::util::clamp;
use macroquad::prelude::*;

/// Viewport into the world. `position` is the top-left corner in world pixels.
///
/// The camera does not like to move: the target may wander inside a box of
/// `2 * slack` centred on the screen before the camera follows, and then only
/// far enough to put the target back on the box edge. It also never shows
/// outside the map.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub position: Vec2,
    pub screen_size: Vec2,
    pub slack: f32,
    map_size: Vec2,
}

impl Camera {
    pub fn new(screen_size: Vec2, slack: f32, map_size: Vec2) -> Self {
        Camera {
            position: Vec2::ZERO,
            screen_size,
            slack,
            map_size,
        }
    }

    pub fn map_size(&self) -> Vec2 {
        self.map_size
    }

    pub fn look_at(&mut self, target: Vec2) {
        let centered = target - self.screen_size / 2.0;
        let x = follow(self.position.x, centered.x, self.slack);
        let y = follow(self.position.y, centered.y, self.slack);

        self.position = vec2(
            clamp(x, 0.0, (self.map_size.x - self.screen_size.x).max(0.0)),
            clamp(y, 0.0, self.map_size.y - self.screen_size.y),
        );
    }
}

#[inline]
fn follow(current: f32, centered: f32, slack: f32) -> f32 {
    if centered > current + slack {
        centered - slack
    } else if centered < current - slack {
        centered + slack
    } else {
        current
    }
}
