//! Photo management for the storefront.
//!
//! Every photo is a database row plus one image object in the bucket. Writes go
//! through [`services::PhotoTransactionService`], which keeps the two in step;
//! reads go through [`services::PhotoQueryService`].
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/photos` | List photos (filter, search, sort, paginate) |
//! | POST | `/api/photos` | Upload a photo (multipart) |
//! | GET | `/api/photos/category/{category}` | Active photos of a category |
//! | GET | `/api/photos/{id}` | Get photo |
//! | PUT | `/api/photos/{id}` | Update metadata |
//! | DELETE | `/api/photos/{id}` | Delete photo and image |
//! | PUT | `/api/photos/{id}/image` | Replace image (multipart) |
//! | POST | `/api/photos/bulk-delete` | Delete several photos |
//! | PUT | `/api/photos/order` | Save display order |
//! | GET | `/api/photo-categories` | Category descriptors |
//! | GET | `/api/photo-categories/stats` | Counts against soft caps |
//! | GET | `/api/maintenance/orphans` | Orphan report |
//! | POST | `/api/maintenance/orphans/sweep` | Remove orphaned objects |
//! | POST | `/api/maintenance/repair-urls` | Repoint photos with missing images |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;

pub use routes::{routes, PhotoState};
