pub mod controller;
pub mod frame_input;
pub mod view_mode;
pub mod viewport;
pub mod visibility;

pub use controller::*;
pub use frame_input::*;
pub use view_mode::*;
pub use viewport::*;
pub use visibility::*;
