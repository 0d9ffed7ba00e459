//! Helper functions shared by the renderer, generator and templates

mod url;

pub use url::*;
