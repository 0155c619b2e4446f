mod lens_service;

pub use lens_service::LensService;
