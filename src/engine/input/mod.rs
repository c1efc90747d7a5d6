// Input handling
//
// The demo only consumes a stream of pointer positions. They are converted
// into world points on the floor like this:
//
// ```rust
// pointer.on_pointer_move(x, y);
// let ray = camera.ray_through(pointer.ndc());
// if let Some(hit) = picker.pick(&ray) {
//     hole.set_target_position(hit);
// }
// ```

pub mod ground_pick;
pub mod pointer;

pub use ground_pick::GroundPicker;
pub use pointer::PointerState;
