// Adapters - Frame sources, motion field and configuration file

pub mod block_match;
pub mod frame_budget;
pub mod memory_source;
pub mod raw_yuv;
pub mod toml_config;
pub mod y4m_source;

// Re-export adapters
pub use block_match::BlockMatchField;
pub use frame_budget::FrameBudget;
pub use memory_source::MemorySource;
pub use raw_yuv::RawYuvSource;
pub use toml_config::TomlConfigAdapter;
pub use y4m_source::Y4mSource;
