//! The curated override list shipped with this crate

use crate::error::Result;
use crate::parser::parse_user_js;
use crate::types::PrefsFile;

/// Contents of `data/user.js`, embedded at compile time
pub const BUNDLED_USER_JS: &str = include_str!("../data/user.js");

/// Parse the bundled list
pub fn bundled() -> Result<PrefsFile> {
    parse_user_js(BUNDLED_USER_JS)
}
