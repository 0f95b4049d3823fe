pub mod disease;
pub mod generation;
pub mod image_record;

pub use disease::{ClassIndexMap, ClassIndexMapError, DiseaseClass, UnknownDiseaseClass};
pub use generation::{
    is_truthy, CountValue, GenerateRequest, GenerateResponse, GenerationRequest,
    ImagesResponse,
};
pub use image_record::{ImageFilter, ImageRecord, NewImageRecord};
