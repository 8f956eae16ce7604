//! Status command handler

use anyhow::Result;

use progbox_core::Library;

use crate::output::{Output, OutputFormat};

/// Show status information
pub fn show(library: &Library, output: &Output) -> Result<()> {
    let stats = library.storage_stats();
    let config = library.config();
    let settings = library.settings();
    let bookmarks = library.bookmark_count()?;
    let categories = library.category_count()?;

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "language": settings.language().code(),
                    "storage": {
                        "path": stats.path,
                        "database_exists": stats.database_exists,
                        "database_size": stats.database_size
                    },
                    "counts": {
                        "bookmarks": bookmarks,
                        "categories": categories
                    }
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", config.database_path().display());
        }
        OutputFormat::Human => {
            println!("progbox Status");
            println!("==============");
            println!();
            println!("Storage:");
            println!("  Location: {}", config.data_dir.display());
            println!("  Database: {}", config.database_path().display());
            println!("  Size:     {}", stats.size_human());
            println!();
            println!("Contents:");
            println!("  Categories: {}", categories);
            println!("  Bookmarks:  {}", bookmarks);
            println!();
            println!("Language: {}", settings.language());
        }
    }

    Ok(())
}
