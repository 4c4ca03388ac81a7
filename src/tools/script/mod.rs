//! Embedded Script Extraction
//!
//! Finds the inline scripts that carry the marker call, parses them as
//! JavaScript and recovers the key/value pairs passed to that call.

mod types;
mod utils;

pub use types::{RawFieldMap, RawValue};

use crate::error::Result;
use crate::selectors::INLINE_SCRIPT;
use crate::tools::parse::Document;
use tracing::{debug, warn};
use utils::*;

/// Inline scripts (no `src`) whose text contains `marker`, in document order.
pub fn locate_marker_scripts(doc: &Document, marker: &str) -> Vec<String> {
    let scripts: Vec<String> = doc
        .select(&INLINE_SCRIPT)
        .map(|script| script.text().collect::<String>())
        .filter(|text| text.contains(marker))
        .collect();
    debug!(marker, count = scripts.len(), "located marker scripts");
    scripts
}

/// Parse one script and collect the fields of every marker call in it.
///
/// # Examples
/// ```
/// use auction_scrape::tools::script::extract_fields;
///
/// let fields = extract_fields(r#"$rwidgets(a="1", b="true");"#, "$rwidgets", &[]).unwrap();
/// assert_eq!(fields.get("a"), Some("1"));
/// assert_eq!(fields.get("b"), Some("true"));
/// ```
pub fn extract_fields(script: &str, marker: &str, multi_valued: &[String]) -> Result<RawFieldMap> {
    with_globals(|| {
        let (tree, cm) = parse_script(script)?;
        Ok(collect_marker_fields(&tree, &cm, marker, multi_valued))
    })
}

/// Merge the fields of every script in order. A script that fails to parse
/// is logged and skipped.
pub fn extract_page_fields(scripts: &[String], marker: &str, multi_valued: &[String]) -> RawFieldMap {
    let mut page = RawFieldMap::new();
    for (index, script) in scripts.iter().enumerate() {
        match extract_fields(script, marker, multi_valued) {
            Ok(fields) => page.merge(fields),
            Err(e) => warn!(index, error = %e, "skipping unparseable script"),
        }
    }
    page
}
