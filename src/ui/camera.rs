/// Pannable, zoomable camera over the gallery world
///
/// World coordinates are the layout engine's units. A world point `p` is shown
/// on screen at `(p - offset) * zoom`.

use cgmath::{InnerSpace, Vector2, Zero};
use iced::{Point, Size, Vector};
use std::time::Instant;

const MIN_ZOOM: f32 = 0.05;
const MAX_ZOOM: f32 = 40.0;

/// Fraction of the coasting speed kept per 60 Hz frame
const FRICTION: f32 = 0.95;

/// Below this speed (screen px/s) coasting stops
const MIN_SPEED: f32 = 5.0;

/// A gesture recognized by the canvas
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    /// Pointer or finger went down: stop any coasting
    Grab,
    /// Drag by a screen-space delta
    Pan(Vector),
    /// Zoom by `factor` keeping `anchor` (screen space) fixed
    Zoom { factor: f32, anchor: Point },
    /// Drag ended while moving at `velocity` (screen px/s)
    Release { velocity: Vector },
}

#[derive(Debug, Clone)]
pub struct Camera {
    /// World point shown at the top-left of the canvas
    offset: Vector2<f32>,
    zoom: f32,
    /// Coasting velocity in screen px/s
    velocity: Vector2<f32>,
    last_tick: Option<Instant>,
    /// Initial hint only; content is never clipped to it
    world: Size,
}

impl Camera {
    pub fn new(world: Size) -> Self {
        Self {
            offset: Vector2::zero(),
            zoom: 1.0,
            velocity: Vector2::zero(),
            last_tick: None,
            world,
        }
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn offset(&self) -> Vector {
        Vector::new(self.offset.x, self.offset.y)
    }

    pub fn world(&self) -> Size {
        self.world
    }

    pub fn to_world(&self, screen: Point) -> Point {
        Point::new(
            screen.x / self.zoom + self.offset.x,
            screen.y / self.zoom + self.offset.y,
        )
    }

    pub fn to_screen(&self, world: Point) -> Point {
        Point::new(
            (world.x - self.offset.x) * self.zoom,
            (world.y - self.offset.y) * self.zoom,
        )
    }

    pub fn is_coasting(&self) -> bool {
        !self.velocity.is_zero()
    }

    pub fn apply(&mut self, gesture: Gesture) {
        match gesture {
            Gesture::Grab => self.stop(),
            Gesture::Pan(delta) => self.pan(Vector2::new(delta.x, delta.y)),
            Gesture::Zoom { factor, anchor } => self.zoom_at(factor, anchor),
            Gesture::Release { velocity } => {
                let velocity = Vector2::new(velocity.x, velocity.y);
                if velocity.magnitude() >= MIN_SPEED {
                    self.velocity = velocity;
                    self.last_tick = None;
                }
            }
        }
    }

    /// Advance momentum deceleration to `now`
    pub fn tick(&mut self, now: Instant) {
        if !self.is_coasting() {
            return;
        }

        let Some(last) = self.last_tick.replace(now) else {
            // first frame after release: start the clock
            return;
        };
        let dt = now.saturating_duration_since(last).as_secs_f32();

        self.pan(self.velocity * dt);
        self.velocity *= FRICTION.powf(dt * 60.0);
        if self.velocity.magnitude() < MIN_SPEED {
            self.stop();
        }
    }

    fn stop(&mut self) {
        self.velocity = Vector2::zero();
        self.last_tick = None;
    }

    fn pan(&mut self, screen_delta: Vector2<f32>) {
        self.offset -= screen_delta / self.zoom;
    }

    fn zoom_at(&mut self, factor: f32, anchor: Point) {
        if !factor.is_finite() || factor <= 0.0 {
            return;
        }
        let fixed = self.to_world(anchor);
        self.zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        self.offset = Vector2::new(
            fixed.x - anchor.x / self.zoom,
            fixed.y - anchor.y / self.zoom,
        );
    }
}
