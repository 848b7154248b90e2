//! Terminal input handling for the console.

pub mod keymap;

pub use keymap::{InputLine, Keymap};
