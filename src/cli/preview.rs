//! Preview command - render a changelog update without touching GitHub

use anstream::print;
use shipit::category;
use shipit::changelog::add_merge_reference;
use shipit::error::Result;
use std::path::Path;

/// Run the preview command
pub fn run_preview(history: &Path, title: &str, number: u64, phrase: Option<&str>) -> Result<()> {
    let contents = if history.exists() {
        std::fs::read_to_string(history)?
    } else {
        String::new()
    };

    let slug = phrase.map(category::normalize);
    let section = category::changelog_section(slug.as_deref());

    print!(
        "{}",
        add_merge_reference(&contents, section.as_deref(), title, number)?
    );
    Ok(())
}
