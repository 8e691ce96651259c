use iced::mouse::{self, Cursor};
use iced::touch;
use iced::widget::canvas::{self, Frame, Program};
use iced::widget::image::FilterMethod;
use iced::widget::text::LineHeight;
use iced::{Color, Pixels, Point, Rectangle, Renderer, Theme, Vector};
use std::collections::HashMap;
use std::time::Instant;

use crate::assets::ImageStore;
use crate::state::config::TextMetrics;
use crate::state::data::{DrawnObject, Scene};
use crate::ui::camera::{Camera, Gesture};
use crate::Message;

/// Canvas drawing the current scene through the camera
pub struct GalleryCanvas<'a> {
    pub scene: &'a Scene,
    pub images: Option<&'a ImageStore>,
    pub camera: &'a Camera,
    pub text: TextMetrics,
}

impl<'a> Program<Message> for GalleryCanvas<'a> {
    type State = DragState;

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: Cursor,
    ) -> Vec<canvas::Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        frame.fill_rectangle(Point::ORIGIN, bounds.size(), Color::BLACK);

        frame.with_save(|frame| {
            frame.scale(self.camera.zoom());
            frame.translate(Vector::ZERO - self.camera.offset());

            for object in self.scene.objects() {
                match object {
                    DrawnObject::Sprite(sprite) => {
                        let Some(loaded) = self.images.and_then(|images| images.get(&sprite.image)) else {
                            continue;
                        };
                        frame.draw_image(
                            sprite.bounds,
                            canvas::Image::new(loaded.handle.clone()).filter_method(FilterMethod::Nearest),
                        );
                    }
                    DrawnObject::Label(label) => {
                        frame.fill_text(canvas::Text {
                            content: label.text.clone(),
                            position: label.bounds.position(),
                            color: label.style.color,
                            size: Pixels(label.style.size),
                            line_height: LineHeight::Relative(self.text.line_height),
                            ..canvas::Text::default()
                        });
                    }
                }
            }
        });

        vec![frame.into_geometry()]
    }

    fn update(
        &self,
        state: &mut Self::State,
        event: canvas::Event,
        bounds: Rectangle,
        cursor: Cursor,
    ) -> (canvas::event::Status, Option<Message>) {
        let now = Instant::now();
        let gesture = match event {
            canvas::Event::Mouse(mouse_event) => state.mouse(mouse_event, bounds, cursor, now),
            canvas::Event::Touch(touch_event) => state.touch(touch_event, bounds, now),
            _ => return (canvas::event::Status::Ignored, None),
        };

        match gesture {
            Some(gesture) => (canvas::event::Status::Captured, Some(Message::Camera(gesture))),
            None => (canvas::event::Status::Ignored, None),
        }
    }

    fn mouse_interaction(
        &self,
        state: &Self::State,
        bounds: Rectangle,
        cursor: Cursor,
    ) -> mouse::Interaction {
        if state.last_position.is_some() {
            mouse::Interaction::Grabbing
        } else if cursor.is_over(bounds) {
            mouse::Interaction::Grab
        } else {
            mouse::Interaction::default()
        }
    }
}

/// State for drag, pinch and fling interactions
#[derive(Debug, Clone, Default)]
pub struct DragState {
    /// Pointer position while the left button is held
    pub last_position: Option<Point>,
    last_moved: Option<Instant>,
    /// Smoothed drag velocity in px/s, handed to the camera on release
    velocity: Vector,
    /// Active touch points, relative to the canvas
    fingers: HashMap<touch::Finger, Point>,
}

impl DragState {
    fn mouse(&mut self, event: mouse::Event, bounds: Rectangle, cursor: Cursor, now: Instant) -> Option<Gesture> {
        match event {
            mouse::Event::WheelScrolled { delta } => {
                let anchor = cursor.position_in(bounds)?;
                let step = match delta {
                    mouse::ScrollDelta::Lines { y, .. } => y * 0.1,
                    mouse::ScrollDelta::Pixels { y, .. } => y * 0.01,
                };
                Some(Gesture::Zoom {
                    factor: (1.0 + step).max(0.1),
                    anchor,
                })
            }
            mouse::Event::ButtonPressed(mouse::Button::Left) => {
                // window coordinates, to match CursorMoved
                let position = cursor.position_over(bounds)?;
                self.start_drag(position, now);
                Some(Gesture::Grab)
            }
            mouse::Event::ButtonReleased(mouse::Button::Left) => {
                self.last_position.take()?;
                Some(self.end_drag(now))
            }
            mouse::Event::CursorMoved { position } => {
                let last = self.last_position?;
                self.last_position = Some(position);
                Some(Gesture::Pan(self.track(position - last, now)))
            }
            _ => None,
        }
    }

    fn touch(&mut self, event: touch::Event, bounds: Rectangle, now: Instant) -> Option<Gesture> {
        let origin = Vector::new(bounds.x, bounds.y);
        match event {
            touch::Event::FingerPressed { id, position } => {
                if !bounds.contains(position) {
                    return None;
                }
                let position = position - origin;
                self.fingers.insert(id, position);
                self.start_drag(position, now);
                Some(Gesture::Grab)
            }
            touch::Event::FingerMoved { id, position } => {
                let position = position - origin;
                // only fingers that went down on the canvas are tracked
                let previous = *self.fingers.get(&id)?;
                self.fingers.insert(id, position);

                if self.fingers.len() == 2 {
                    // pinch: scale by the change in finger distance around the midpoint
                    let other = self
                        .fingers
                        .iter()
                        .find(|(finger, _)| **finger != id)
                        .map(|(_, point)| *point)?;
                    let before = previous.distance(other);
                    let after = position.distance(other);
                    if before <= f32::EPSILON {
                        return None;
                    }
                    let anchor = Point::new((position.x + other.x) / 2.0, (position.y + other.y) / 2.0);
                    self.velocity = Vector::ZERO;
                    Some(Gesture::Zoom {
                        factor: after / before,
                        anchor,
                    })
                } else {
                    // each finger contributes its share, so the view follows the average
                    let share = 1.0 / self.fingers.len() as f32;
                    Some(Gesture::Pan(self.track((position - previous) * share, now)))
                }
            }
            touch::Event::FingerLifted { id, .. } | touch::Event::FingerLost { id, .. } => {
                self.fingers.remove(&id)?;
                if self.fingers.is_empty() {
                    self.last_position = None;
                    Some(self.end_drag(now))
                } else {
                    None
                }
            }
        }
    }

    fn start_drag(&mut self, position: Point, now: Instant) {
        self.last_position = Some(position);
        self.last_moved = Some(now);
        self.velocity = Vector::ZERO;
    }

    /// Record a drag step and update the velocity estimate
    fn track(&mut self, delta: Vector, now: Instant) -> Vector {
        if let Some(last) = self.last_moved.replace(now) {
            let dt = now.saturating_duration_since(last).as_secs_f32();
            if dt > 0.0 {
                let instant = delta * (1.0 / dt);
                self.velocity = self.velocity * 0.2 + instant * 0.8;
            }
        }
        delta
    }

    fn end_drag(&mut self, now: Instant) -> Gesture {
        // a pause before letting go means no fling
        let idle = self
            .last_moved
            .take()
            .map_or(f32::MAX, |last| now.saturating_duration_since(last).as_secs_f32());
        let velocity = if idle < 0.1 { self.velocity } else { Vector::ZERO };
        self.velocity = Vector::ZERO;
        Gesture::Release { velocity }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use iced::Size;
    use std::time::Duration;

    fn bounds() -> Rectangle {
        Rectangle::new(Point::new(100.0, 50.0), Size::new(800.0, 600.0))
    }

    fn press(id: u64, x: f32, y: f32) -> touch::Event {
        touch::Event::FingerPressed {
            id: touch::Finger(id),
            position: Point::new(x, y),
        }
    }

    fn moved(id: u64, x: f32, y: f32) -> touch::Event {
        touch::Event::FingerMoved {
            id: touch::Finger(id),
            position: Point::new(x, y),
        }
    }

    fn lifted(id: u64, x: f32, y: f32) -> touch::Event {
        touch::Event::FingerLifted {
            id: touch::Finger(id),
            position: Point::new(x, y),
        }
    }

    fn ms(start: Instant, millis: u64) -> Instant {
        start + Duration::from_millis(millis)
    }

    #[test]
    fn test_pinch_zooms_around_the_midpoint() {
        let mut state = DragState::default();
        let t0 = Instant::now();

        assert_eq!(state.touch(press(1, 300.0, 150.0), bounds(), t0), Some(Gesture::Grab));
        assert_eq!(state.touch(press(2, 200.0, 150.0), bounds(), t0), Some(Gesture::Grab));

        // canvas-relative: fingers at (200,100) and (100,100), then 100 -> 200 apart
        let gesture = state.touch(moved(1, 400.0, 150.0), bounds(), ms(t0, 10));
        assert_eq!(
            gesture,
            Some(Gesture::Zoom {
                factor: 2.0,
                anchor: Point::new(200.0, 100.0),
            })
        );

        // one finger left: no release yet, the other one pans
        assert_eq!(state.touch(lifted(2, 200.0, 150.0), bounds(), ms(t0, 20)), None);
        let gesture = state.touch(moved(1, 410.0, 150.0), bounds(), ms(t0, 30));
        assert_eq!(gesture, Some(Gesture::Pan(Vector::new(10.0, 0.0))));
    }

    #[test]
    fn test_press_outside_the_canvas_is_ignored() {
        let mut state = DragState::default();
        let t0 = Instant::now();

        assert_eq!(state.touch(press(1, 20.0, 10.0), bounds(), t0), None);
        assert_eq!(state.touch(moved(1, 40.0, 10.0), bounds(), ms(t0, 10)), None);
        assert_eq!(state.touch(lifted(1, 40.0, 10.0), bounds(), ms(t0, 20)), None);
        assert!(state.last_position.is_none());
    }

    #[test]
    fn test_many_fingers_pan_by_their_average() {
        let mut state = DragState::default();
        let t0 = Instant::now();
        for (id, x) in [(1, 200.0), (2, 300.0), (3, 400.0)] {
            state.touch(press(id, x, 300.0), bounds(), t0);
        }

        let Some(Gesture::Pan(delta)) = state.touch(moved(2, 330.0, 300.0), bounds(), ms(t0, 10)) else {
            panic!("expected a pan");
        };
        assert!((delta.x - 10.0).abs() < 1e-4, "{delta:?}");
        assert_eq!(delta.y, 0.0);
    }

    #[test]
    fn test_quick_release_flings() {
        let mut state = DragState::default();
        let t0 = Instant::now();

        state.touch(press(1, 300.0, 300.0), bounds(), t0);
        state.touch(moved(1, 310.0, 300.0), bounds(), ms(t0, 10));
        let Some(Gesture::Release { velocity }) = state.touch(lifted(1, 310.0, 300.0), bounds(), ms(t0, 20)) else {
            panic!("expected a release");
        };

        // 10 px in 10 ms, smoothed from rest: 0.8 * 1000 px/s
        assert!((velocity.x - 800.0).abs() < 1.0, "{velocity:?}");
        assert_eq!(velocity.y, 0.0);
    }

    #[test]
    fn test_release_after_a_pause_does_not_fling() {
        let mut state = DragState::default();
        let t0 = Instant::now();

        state.touch(press(1, 300.0, 300.0), bounds(), t0);
        state.touch(moved(1, 310.0, 300.0), bounds(), ms(t0, 10));
        let gesture = state.touch(lifted(1, 310.0, 300.0), bounds(), ms(t0, 250));
        assert_eq!(gesture, Some(Gesture::Release { velocity: Vector::ZERO }));
    }

    #[test]
    fn test_mouse_drag_pans_and_releases() {
        let mut state = DragState::default();
        let t0 = Instant::now();
        let inside = Cursor::Available(Point::new(300.0, 300.0));

        let press = mouse::Event::ButtonPressed(mouse::Button::Left);
        assert_eq!(state.mouse(press, bounds(), inside, t0), Some(Gesture::Grab));

        let drag = mouse::Event::CursorMoved {
            position: Point::new(290.0, 320.0),
        };
        assert_eq!(
            state.mouse(drag, bounds(), inside, ms(t0, 10)),
            Some(Gesture::Pan(Vector::new(-10.0, 20.0)))
        );

        let release = mouse::Event::ButtonReleased(mouse::Button::Left);
        assert!(matches!(
            state.mouse(release, bounds(), inside, ms(t0, 500)),
            Some(Gesture::Release { velocity }) if velocity == Vector::ZERO
        ));
        assert!(state.last_position.is_none());
    }

    #[test]
    fn test_mouse_press_outside_and_wheel_anchor() {
        let mut state = DragState::default();
        let t0 = Instant::now();

        let outside = Cursor::Available(Point::new(10.0, 10.0));
        let press = mouse::Event::ButtonPressed(mouse::Button::Left);
        assert_eq!(state.mouse(press, bounds(), outside, t0), None);

        let inside = Cursor::Available(Point::new(150.0, 80.0));
        let wheel = mouse::Event::WheelScrolled {
            delta: mouse::ScrollDelta::Lines { x: 0.0, y: 1.0 },
        };
        let Some(Gesture::Zoom { factor, anchor }) = state.mouse(wheel, bounds(), inside, t0) else {
            panic!("expected a zoom");
        };
        assert!((factor - 1.1).abs() < 1e-6);
        assert_eq!(anchor, Point::new(50.0, 30.0));
    }
}
