use crate::domain::model::{
    ChangeDetection, LoadOutcome, RawRecord, SourceFile, TransformResult,
};
use crate::utils::error::Result;

pub trait Storage: Send + Sync {
    /// True only for an existing regular file.
    fn exists(&self, path: &str) -> bool;
    fn read_file(&self, path: &str) -> Result<Vec<u8>>;
    fn write_file(&self, path: &str, data: &[u8]) -> Result<()>;
}

pub trait ConfigProvider: Send + Sync {
    fn root(&self) -> &str;
    fn source_candidates(&self) -> &[String];
    fn output_file(&self) -> &str;
    fn dataset_key(&self) -> &str;
    fn change_detection(&self) -> ChangeDetection;
    fn dry_run(&self) -> bool;
}

pub trait Pipeline {
    fn select_source(&self) -> Result<Option<SourceFile>>;
    fn extract(&self, source: &SourceFile) -> Result<Vec<RawRecord>>;
    fn transform(&self, data: Vec<RawRecord>) -> Result<TransformResult>;
    fn load(&self, result: TransformResult) -> Result<LoadOutcome>;
}
