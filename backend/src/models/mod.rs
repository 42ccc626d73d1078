pub mod fare;
pub mod route;
pub mod scan;
pub mod window;

pub use fare::*;
pub use route::*;
pub use scan::*;
pub use window::*;
