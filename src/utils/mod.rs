pub mod constants;
pub mod url_utils;

pub use constants::*;
pub use url_utils::{filter_valid_urls, is_valid_url};
