pub mod lenses;
pub mod photos;
pub mod products;
