pub mod console;
pub mod render;

pub use console::ElevatorConsole;
pub use render::run_renderer;
