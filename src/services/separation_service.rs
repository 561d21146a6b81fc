//! Async front of the separation engine.
//!
//! Every engine call is CPU-bound, so each one runs on the blocking pool
//! together with its image decode and PNG encode.

use ink_separation::{Analysis, Comparison, ReferenceMatch, SeparationMethod, Separator, Srgb};
use std::sync::Arc;

use crate::api::{AdjustRequest, AdjustResponse, ProcessRequest, SeparationResponse};
use crate::error::ApiError;
use crate::services::image_codec::{decode_data_url, rgb_data_url};

pub struct SeparationService {
    separator: Arc<Separator>,
    compare_methods: Vec<SeparationMethod>,
}

impl SeparationService {
    pub fn new(separator: Arc<Separator>, compare_methods: Vec<SeparationMethod>) -> Self {
        Self {
            separator,
            compare_methods,
        }
    }

    pub fn pantone_loaded(&self) -> bool {
        !self.separator.reference().is_empty()
    }

    /// Run a full separation and encode its rasters.
    pub async fn process(&self, request: ProcessRequest) -> Result<SeparationResponse, ApiError> {
        self.run_blocking(move |separator| {
            let image = decode_data_url(&request.image_base64)?;
            let engine_request = request.to_engine(image)?;
            let result = separator.separate(&engine_request)?;
            tracing::info!(
                channels = result.channels.len(),
                quality = result.quality_score,
                "Separation finished"
            );
            Ok(SeparationResponse::from_result(result)?)
        })
        .await
    }

    pub async fn adjust(&self, request: AdjustRequest) -> Result<AdjustResponse, ApiError> {
        self.run_blocking(move |separator| {
            let image = decode_data_url(&request.image_base64)?;
            let (adjusted, histogram) = separator.adjust(&image, &request.adjustments)?;
            Ok(AdjustResponse {
                adjusted_image: rgb_data_url(&adjusted)?,
                histogram,
            })
        })
        .await
    }

    /// Table lookups are cheap and run inline.
    pub fn match_pantone(&self, colors: &[Srgb]) -> Vec<ReferenceMatch> {
        self.separator.match_reference(colors)
    }

    pub async fn analyze(&self, image_base64: String) -> Result<Analysis, ApiError> {
        self.run_blocking(move |separator| {
            let image = decode_data_url(&image_base64)?;
            Ok(separator.analyze(&image)?)
        })
        .await
    }

    /// Compare `methods`, or the configured list when `None`.
    pub async fn compare(
        &self,
        image_base64: String,
        methods: Option<Vec<SeparationMethod>>,
    ) -> Result<Comparison, ApiError> {
        let methods = methods.unwrap_or_else(|| self.compare_methods.clone());
        self.run_blocking(move |separator| {
            let image = decode_data_url(&image_base64)?;
            Ok(separator.compare(&image, &methods)?)
        })
        .await
    }

    async fn run_blocking<T, F>(&self, work: F) -> Result<T, ApiError>
    where
        T: Send + 'static,
        F: FnOnce(&Separator) -> Result<T, ApiError> + Send + 'static,
    {
        let separator = self.separator.clone();
        tokio::task::spawn_blocking(move || work(&separator)).await?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ink_separation::ReferenceMatcher;

    fn service(table: ReferenceMatcher) -> SeparationService {
        SeparationService::new(
            Arc::new(Separator::new(Arc::new(table))),
            vec![SeparationMethod::MedianCut],
        )
    }

    #[test]
    fn test_pantone_loaded_reflects_table() {
        assert!(!service(ReferenceMatcher::empty()).pantone_loaded());

        let table = ReferenceMatcher::from_json(br##"[{"pantone": "186 C", "hex": "#C8102E"}]"##).unwrap();
        assert!(service(table).pantone_loaded());
    }

    #[tokio::test]
    async fn test_bad_image_is_rejected_before_engine() {
        let err = service(ReferenceMatcher::empty())
            .analyze("data:image/png;base64,AAAA".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Input(_)), "{err:?}");
    }
}
