//! Tag command handlers

use anyhow::Result;

use progbox_core::Library;

use crate::output::Output;

/// List all tags with usage counts
pub fn list(library: &Library, output: &Output) -> Result<()> {
    let tags = library.tags_with_counts()?;
    output.print_tags(&tags);
    Ok(())
}
