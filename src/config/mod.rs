//! Configuration module

mod site;

pub use site::GraphConfig;
pub use site::HighlightConfig;
pub use site::SiteConfig;
