//! Help text rendering
//!
//! The layout is fixed:
//!
//! ```text
//! Usage:
//!   <name> [flags] [subcommand]
//!
//! Flags:
//!   -<flag> - <description>
//!
//! Subcommands:
//!   <child> (<alias>, <alias>) - <usage>
//! ```

use crate::command::Command;
use std::io::{self, Write};

impl Command {
    /// Write this command's help to `out`
    ///
    /// Flags come from the command's flag set, so a command that has never
    /// been dispatched lists only the flags registered on it by hand.
    pub fn write_help(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "Usage:")?;
        writeln!(out, "  {} [flags] [subcommand]", self.name)?;

        writeln!(out)?;
        writeln!(out, "Flags:")?;
        if let Some(flags) = &self.flags {
            for flag in flags.iter() {
                if flag.usage().is_empty() {
                    writeln!(out, "  -{}", flag.name())?;
                } else {
                    writeln!(out, "  -{} - {}", flag.name(), flag.usage())?;
                }
            }
        }

        if !self.subcommands.is_empty() {
            writeln!(out)?;
            writeln!(out, "Subcommands:")?;
            for cmd in &self.subcommands {
                let alias_text = if cmd.aliases.is_empty() {
                    String::new()
                } else {
                    format!("({})", cmd.aliases.join(", "))
                };
                // The alias slot is always written, even when empty
                if cmd.usage.is_empty() {
                    writeln!(out, "  {} {}", cmd.name, alias_text)?;
                } else {
                    writeln!(out, "  {} {} - {}", cmd.name, alias_text, cmd.usage)?;
                }
            }
        }

        Ok(())
    }

    /// Help text as a string
    pub fn help_text(&self) -> String {
        let mut buf = Vec::new();
        self.write_help(&mut buf).expect("in-memory help buffer");
        String::from_utf8_lossy(&buf).into_owned()
    }
}
