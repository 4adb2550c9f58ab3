//! Built-in descriptors for the Java standard library.

use crate::error::ResolveError;
use crate::resolver::IndexSource;

/// Descriptor document embedded in the crate.
pub const STANDARD_LIBRARY_XML: &str = include_str!("stdlib.xml");

/// Name reported for errors in the embedded document.
const SOURCE_NAME: &str = "<standard library>";

/// Builds a descriptor source over the embedded standard library index.
///
/// # Errors
/// Returns `ResolveError` if the embedded document fails to parse or validate.
pub fn standard_library_source() -> Result<IndexSource, ResolveError> {
    IndexSource::from_xml(SOURCE_NAME, STANDARD_LIBRARY_XML)
}
