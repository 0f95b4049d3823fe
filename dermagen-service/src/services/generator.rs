use crate::models::{
    is_truthy, ClassIndexMap, DiseaseClass, GenerateRequest, GenerationRequest, NewImageRecord,
};
use crate::services::image_store::ImageStore;
use crate::services::inference::ImageSynthesizer;
use crate::services::metrics;
use service_core::error::AppError;
use std::sync::Arc;

const DATA_URI_PREFIX: &str = "data:image/png;base64,";

/// Validate a raw generate request.
///
/// Checks run in order and stop at the first failure: both fields present,
/// class known, count within `1..=max_count`.
pub fn validate(request: &GenerateRequest, max_count: u32) -> Result<GenerationRequest, AppError> {
    let (class, count) = match (&request.class, &request.count) {
        (Some(class), Some(count)) if is_truthy(class) && count.is_present() => (class, count),
        _ => return Err(AppError::bad_request("Disease class and count are required")),
    };

    let disease_class: DiseaseClass = class
        .as_str()
        .and_then(|code| code.parse().ok())
        .ok_or_else(|| AppError::bad_request("Invalid disease class"))?;

    let count = count
        .as_number()
        .filter(|n| *n >= 1.0 && *n <= f64::from(max_count))
        .map(|n| n.trunc() as u32)
        .ok_or_else(|| {
            AppError::bad_request(format!("Count must be between 1 and {}", max_count))
        })?;

    Ok(GenerationRequest {
        disease_class,
        count,
    })
}

/// Wrap a base64 PNG payload into a self-contained data URI.
pub fn to_data_uri(payload: &str) -> String {
    format!("{}{}", DATA_URI_PREFIX, payload)
}

/// Validates generate requests, forwards them to the inference backend and
/// records the resulting images.
#[derive(Clone)]
pub struct ImageGenerator {
    synthesizer: Arc<dyn ImageSynthesizer>,
    store: ImageStore,
    class_index_map: ClassIndexMap,
    max_count: u32,
}

impl ImageGenerator {
    pub fn new(
        synthesizer: Arc<dyn ImageSynthesizer>,
        store: ImageStore,
        class_index_map: ClassIndexMap,
        max_count: u32,
    ) -> Self {
        Self {
            synthesizer,
            store,
            class_index_map,
            max_count,
        }
    }

    /// Run the whole pipeline and return the data URIs in backend order.
    ///
    /// The store is only written once the backend call has fully succeeded.
    pub async fn generate(&self, request: &GenerateRequest) -> Result<Vec<String>, AppError> {
        let request = validate(request, self.max_count)?;
        let class_idx = self.class_index_map.index_of(request.disease_class);

        tracing::info!(
            class = %request.disease_class,
            class_idx,
            count = request.count,
            "Generating images"
        );

        let images: Vec<String> = self
            .synthesizer
            .synthesize(class_idx, request.count)
            .await?
            .iter()
            .map(|payload| to_data_uri(payload))
            .collect();

        let records = images
            .iter()
            .map(|uri| NewImageRecord::new(request.disease_class, uri.clone()))
            .collect();
        self.store.append(records).await;

        metrics::record_images_generated(request.disease_class, images.len());
        tracing::info!(
            class = %request.disease_class,
            generated = images.len(),
            "Images generated"
        );

        Ok(images)
    }
}
