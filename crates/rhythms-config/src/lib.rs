mod config;
mod llm;

pub use config::{
    CURRENT_SCHEMA_VERSION, ClassifierConfig, EngineConfig, RhythmsConfig, SourcesConfig,
    StoreConfig, find_project_root,
};
pub use llm::ClassifierLlmConfig;
