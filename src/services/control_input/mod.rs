mod key_input;
mod line_input;
mod r#trait;

pub use self::key_input::KeyControlInput;
pub use self::line_input::LineControlInput;
pub use self::r#trait::{create_control_input, ControlSource};
