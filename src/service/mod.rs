pub mod amounts;
pub mod assembler;
pub mod dates;
pub mod extractor;
pub mod grouper;
pub mod ownership;
pub mod pipeline;
pub mod processor;
pub mod residence;

pub use extractor::{ColumnSchema, Field, FieldExtractor, FieldSpec};
pub use pipeline::{NormalizeOutcome, PipelineStats, RegistryPipeline};
pub use processor::{BatchReport, FileProcessor, FileReport};
pub use residence::ResidenceClassifier;
