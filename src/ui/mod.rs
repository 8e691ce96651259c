/// User interface module
///
/// - `camera.rs` - pan/zoom transform and momentum
/// - `canvas.rs` - the canvas program drawing the scene and turning input into gestures

pub mod camera;
pub mod canvas;
