//! Changelog rendering
//!
//! Blocks (version headers, subsection headers, runs of bullets) are
//! separated by one blank line and the document ends with a newline.

use super::{ChangeLine, Changelog, Subsection, Version};
use std::fmt;

impl fmt::Display for ChangeLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("  *")?;
        if !self.summary.is_empty() {
            write!(f, " {}", self.summary)?;
        }
        if let Some(reference) = &self.reference {
            write!(f, " ({reference})")?;
        }
        Ok(())
    }
}

fn write_lines(f: &mut fmt::Formatter<'_>, lines: &[ChangeLine]) -> fmt::Result {
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            f.write_str("\n")?;
        }
        write!(f, "{line}")?;
    }
    Ok(())
}

impl fmt::Display for Subsection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "### {}", self.name)?;
        if !self.lines.is_empty() {
            f.write_str("\n\n")?;
            write_lines(f, &self.lines)?;
        }
        Ok(())
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "## {}", self.label)?;
        if let Some(date) = &self.date {
            write!(f, " / {date}")?;
        }
        if !self.lines.is_empty() {
            f.write_str("\n\n")?;
            write_lines(f, &self.lines)?;
        }
        for subsection in &self.subsections {
            write!(f, "\n\n{subsection}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Changelog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.versions.is_empty() {
            return Ok(());
        }
        for (i, version) in self.versions.iter().enumerate() {
            if i > 0 {
                f.write_str("\n\n")?;
            }
            write!(f, "{version}")?;
        }
        f.write_str("\n")
    }
}
