//! Configuration file handling and resolution into runtime [`Settings`].

mod manager;

pub use manager::{
    CacheSection, ConfigFile, ConfigManager, ResolveOptions, ServiceSection, Settings,
    TranslateSection, resolve_config,
};
