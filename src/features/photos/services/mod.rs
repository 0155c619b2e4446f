pub mod category_registry;
mod photo_maintenance_service;
mod photo_query_service;
mod photo_transaction_service;
pub mod selection;

pub use category_registry::{CategoryDescriptor, CategoryRegistry, ImageFormat};
pub use photo_maintenance_service::{
    DanglingPhoto, DanglingReason, OrphanReport, PhotoMaintenanceService, RepairReport,
    SweepReport,
};
pub use photo_query_service::{CategoryStats, PhotoListQuery, PhotoQueryService};
pub use photo_transaction_service::{
    generate_photo_key, CompensationError, DeleteOutcome, PhotoTransactionService, PhotoUpload,
    ReplaceOutcome,
};
