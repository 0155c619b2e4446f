mod category_dto;
mod maintenance_dto;
mod photo_dto;

pub use category_dto::*;
pub use maintenance_dto::*;
pub use photo_dto::*;
