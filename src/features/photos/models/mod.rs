mod photo;

pub use photo::{
    NewPhoto, Photo, PhotoCategory, PhotoChanges, PhotoFilter, PhotoMetadata, PhotoSortField,
    PhotoTextField,
};
