use crate::input::InputSnapshot;
use crate::tile::TileId;
use crate::tile_grid::PlacedObject;
use macroquad::prelude::*;

/// A moving entity spawned from a placed map object.
#[derive(Debug, Clone, PartialEq)]
pub struct Actor {
    pub pos: Vec2,
    pub vel: Vec2,
    /// 0 exempts the actor from gravity (it has fallen off the map).
    pub mass: f32,
    pub jump: bool,
    pub action: bool,
    pub name: Option<String>,
    pub sprite: Option<TileId>,
}

impl Actor {
    pub fn new(pos: Vec2) -> Self {
        Actor {
            pos,
            vel: Vec2::ZERO,
            mass: 1.0,
            jump: false,
            action: false,
            name: None,
            sprite: None,
        }
    }

    pub fn from_object(object: &PlacedObject) -> Self {
        Actor {
            name: object.name.clone(),
            sprite: object.gid,
            ..Actor::new(object.pos)
        }
    }

    pub fn is_named(&self, name: &str) -> bool {
        self.name
            .as_deref()
            .is_some_and(|n| n.eq_ignore_ascii_case(name))
    }

    pub fn is_off_map(&self) -> bool {
        self.mass == 0.0
    }

    /// Copies the frame's buttons and accelerates along the x axis.
    pub fn control(&mut self, input: &InputSnapshot, accel: f32, dt: f32) {
        self.vel.x += f32::from(input.x_axis) * accel * dt;
        self.jump = input.jump;
        self.action = input.action;
    }
}

/// Index of the actor called `name`, falling back to the first actor.
pub fn find_hero(actors: &[Actor], name: &str) -> Option<usize> {
    actors
        .iter()
        .position(|a| a.is_named(name))
        .or_else(|| (!actors.is_empty()).then_some(0))
}
