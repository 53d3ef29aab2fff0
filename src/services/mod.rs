//! Service layer: the core algorithms behind ingestion and chat.

pub mod chunker;
pub mod composer;
pub mod ingestion;
pub mod retriever;

pub use chunker::Chunker;
pub use composer::AnswerComposer;
pub use ingestion::{IngestReceipt, IngestionPipeline};
pub use retriever::Retriever;
