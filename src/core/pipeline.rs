use crate::core::{
    normalize, reader, source, writer, ConfigProvider, LoadOutcome, Pipeline, RawRecord,
    SourceFile, Storage, TransformResult,
};
use crate::utils::error::{EtlError, Result};

/// The vocabulary build: pick a source, read it, normalize, write on change.
pub struct VocabularyPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> VocabularyPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }
}

impl<S: Storage, C: ConfigProvider> Pipeline for VocabularyPipeline<S, C> {
    fn select_source(&self) -> Result<Option<SourceFile>> {
        Ok(source::select_source(
            &self.storage,
            self.config.source_candidates(),
        ))
    }

    fn extract(&self, source: &SourceFile) -> Result<Vec<RawRecord>> {
        tracing::debug!("Reading {} as {}", source.path, source.format);

        let wrap = |e: EtlError| EtlError::SourceReadError {
            path: source.path.clone(),
            source: Box::new(e),
        };

        let bytes = self.storage.read_file(&source.path).map_err(wrap)?;
        reader::read_records(source.format, &bytes).map_err(wrap)
    }

    fn transform(&self, data: Vec<RawRecord>) -> Result<TransformResult> {
        let (items, dropped) = normalize::normalize_all(&data);

        if dropped > 0 {
            tracing::debug!("Dropped {} records without a character or reading/meaning", dropped);
        }

        Ok(TransformResult { items, dropped })
    }

    fn load(&self, result: TransformResult) -> Result<LoadOutcome> {
        let document = writer::build_document(
            self.config.dataset_key(),
            result.items,
            writer::generated_at_now(),
        );

        writer::write_if_changed(
            &self.storage,
            self.config.output_file(),
            &document,
            self.config.change_detection(),
            self.config.dry_run(),
        )
    }
}
