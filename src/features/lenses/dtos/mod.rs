mod lens_dto;

pub use lens_dto::*;
