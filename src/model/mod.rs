pub mod display;
pub mod item;

pub use display::TaskDisplay;
pub use item::{Summary, Task, TitleError, validate_title};
