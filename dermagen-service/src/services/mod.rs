pub mod generator;
pub mod image_store;
pub mod inference;
pub mod metrics;

pub use generator::ImageGenerator;
pub use image_store::ImageStore;
pub use inference::{ImageSynthesizer, InferenceClient};
