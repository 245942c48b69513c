pub mod buffer;
pub mod window;

pub use buffer::WindowBuffer;
pub use window::{aggregate, WindowStat};
