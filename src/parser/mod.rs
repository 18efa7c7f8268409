pub mod mask;
pub mod nmea;

pub use mask::*;
pub use nmea::*;
