pub mod fix;
pub mod frame;
pub mod geotag;
pub mod report;

pub use fix::*;
pub use frame::*;
pub use geotag::*;
pub use report::*;
