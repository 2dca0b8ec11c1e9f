//! Configuration module

mod site;

pub use site::BlogConfig;
pub use site::ContactLink;
pub use site::ContentConfig;
pub use site::ContentSource;
pub use site::Feature;
pub use site::MenuItem;
pub use site::ServerConfig;
pub use site::SiteConfig;
pub use site::TOKEN_ENV;
