//! W3C extended log parsing.
//!
//! A log starts with a banner line (`#Software: ...` or similar) that is
//! thrown away, followed by the `#Fields:` directive naming the columns.
//! Every line after that is one tab-delimited record.
//!
//! ```text
//! #Software: Microsoft Internet Information Services 10.0
//! #Fields: date time c-ip cs-method
//! 2021-01-01	00:00:01	10.0.0.17	GET
//! ```

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};

use super::structures::TabularLog;

static FIELDS_DIRECTIVE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#Fields: (.*)").expect("valid #Fields regex"));

/// Convert decoded log text into comma-delimited form.
///
/// # Errors
///
/// Returns [`Error::MalformedHeader`] if the second line carries no
/// `#Fields:` directive. `path` is only used to name the source in the error.
pub fn parse(path: &Path, text: &str) -> Result<TabularLog> {
    let mut lines = text.lines().skip(1);

    let header = lines
        .next()
        .and_then(|line| FIELDS_DIRECTIVE.captures(line))
        .and_then(|caps| caps.get(1))
        .map(|columns| columns.as_str().replace(' ', ","))
        .ok_or_else(|| Error::MalformedHeader {
            path: path.to_path_buf(),
        })?;

    let records = lines
        .filter(|line| !line.is_empty())
        .map(|line| line.replace('\t', ","))
        .collect();

    Ok(TabularLog { header, records })
}
