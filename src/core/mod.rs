pub mod etl;
pub mod normalize;
pub mod pipeline;
pub mod reader;
pub mod source;
pub mod writer;

pub use crate::domain::model::{
    CanonicalRecord, ChangeDetection, LoadOutcome, OutputDocument, RawRecord, RunOutcome,
    SourceFile, SourceFormat, TransformResult,
};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
