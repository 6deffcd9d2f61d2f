// State management module.
// Holds panel data and the console log for the terminal front end.

pub mod console;
pub mod panels;

pub use console::{ConsoleLevel, ConsoleState};
pub use panels::{LoadingState, SelectableList};
