//! WindowSystem: responsibility and boundaries
//!
//! This module and its submodules ONLY talk to the external window system:
//! find windows by exact title, raise them and deliver a single key press.
//! They hold no slide or timing state and never cache handles; caching belongs
//! to WindowDirectory.

mod dry_run;
mod xdotool;
mod r#trait;

#[cfg(test)]
pub mod recording;

pub use self::r#trait::{create_window_system, WindowSystem};
