mod pg_photo_repository;
mod photo_repository;

pub use pg_photo_repository::PgPhotoRepository;
pub use photo_repository::PhotoRepository;
