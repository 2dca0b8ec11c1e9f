//! Helper functions for views and templates
//!
//! URL generation, HTML escaping and localized date formatting.

mod date;
mod html;
mod url;

pub use date::*;
pub use html::*;
pub use url::*;
