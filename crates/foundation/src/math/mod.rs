pub mod geo;
pub mod projection;
pub mod vec;

pub use geo::*;
pub use projection::*;
pub use vec::*;
