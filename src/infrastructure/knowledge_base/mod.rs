//! Knowledge base retriever implementations

mod bedrock;
mod in_memory;

pub use bedrock::{
    build_retrieval_configuration, BedrockRetriever, BedrockRetrieverConfig, DEFAULT_REGION,
    DEFAULT_TIMEOUT,
};
pub use in_memory::{InMemoryDocument, InMemoryRetriever};
