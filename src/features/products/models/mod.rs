mod product;

pub use product::{Product, ProductSortField};
