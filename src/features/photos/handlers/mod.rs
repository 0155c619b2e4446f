mod category_handler;
mod maintenance_handler;
mod photo_handler;

pub use category_handler::*;
pub use maintenance_handler::*;
pub use photo_handler::*;
