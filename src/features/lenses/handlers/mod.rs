mod lens_handler;

pub use lens_handler::*;
