pub mod control;
pub mod navigation;
pub mod window;

pub use control::{ControlEvent, Direction, NavKey};
pub use navigation::{Hms, NavigationRecord, TIMING_HEADER};
pub use window::WindowHandle;
