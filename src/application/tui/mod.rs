pub mod browser;
pub mod renderer;
pub mod theme;

pub use browser::*;
pub use renderer::*;
pub use theme::*;
