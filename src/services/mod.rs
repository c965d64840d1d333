pub mod control_input;
pub mod presentation_clock;
pub mod status_display;
pub mod window_directory;
pub mod window_system;

pub use control_input::{create_control_input, ControlSource};
pub use presentation_clock::{NavigationOutcome, PresentationClock};
pub use status_display::{StatusDisplay, TerminalStatus};
pub use window_directory::WindowDirectory;
pub use window_system::{create_window_system, WindowSystem};
