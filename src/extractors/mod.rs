//! Request extractors shared by the handlers.

pub mod base_url;
pub mod paging;
pub mod principal;

pub use base_url::BaseUrl;
pub use paging::Paging;
pub use principal::CurrentPrincipal;
