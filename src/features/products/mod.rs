//! Frame and sunglass catalog. A product may point at a `product_photo`
//! photo, whose image URL it takes over when none is given.

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use routes::routes;
pub use services::ProductService;
