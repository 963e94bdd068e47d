//! Command tree and dispatch
//!
//! A [`Command`] is both a router (it has subcommands) and a leaf (it has an
//! action). Dispatch parses the node's own flags, then either descends into
//! the subcommand named by the first positional argument, runs the action
//! with the positional arguments, or prints help.
//!
//! ```
//! use cmdtree::{Command, Context, OnParseError};
//!
//! let mut build = Command::new("build")
//!     .alias("b")
//!     .usage("compile the project")
//!     .action(|_ctx, args| {
//!         assert_eq!(args, ["main.rs"]);
//!         Ok(())
//!     });
//! let release = build.flags().bool("release", false, "optimized build");
//!
//! let mut root = Command::new("tool")
//!     .on_parse_error(OnParseError::ReturnError)
//!     .subcommand(build);
//!
//! root.dispatch(&Context::new(), ["b", "-release", "main.rs"]).unwrap();
//! assert!(release.get());
//! ```
//!
//! Flags belong to one level only and must precede the subcommand they
//! modify. Flag variables are written during dispatch, so a tree must not be
//! dispatched from several threads at once; build one tree per invocation.

pub mod help;

use crate::context::Context;
use crate::error::{is_help_request, DispatchError, FlagError, Result};
use crate::flag::{FlagSet, FlagVar};
use std::fmt;
use std::io::{self, Write};
use std::process;
use tracing::debug;

/// Name of the flag every command answers to; unavailable to applications
pub const HELP_FLAG: &str = "help";

const HELP_USAGE: &str = "display help information";

/// Exit status used when flag parsing fails under [`OnParseError::Exit`]
pub const PARSE_ERROR_EXIT_CODE: i32 = 2;

/// Terminal handler invoked with the remaining positional arguments
pub type Action = Box<dyn Fn(&Context, &[String]) -> anyhow::Result<()>>;

/// What to do when a flag token cannot be parsed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OnParseError {
    /// Print the error and help to stderr and exit with status 2
    #[default]
    Exit,
    /// Return [`DispatchError::Parse`] to the caller
    ReturnError,
}

/// A node in the command tree
pub struct Command {
    name: String,
    aliases: Vec<String>,
    usage: String,
    flags: Option<FlagSet>,
    help: Option<FlagVar<bool>>,
    subcommands: Vec<Command>,
    action: Option<Action>,
    on_parse_error: Option<OnParseError>,
}

impl Command {
    /// Create a command with no flags, subcommands or action
    pub fn new(name: impl Into<String>) -> Self {
        Command {
            name: name.into(),
            aliases: Vec::new(),
            usage: String::new(),
            flags: None,
            help: None,
            subcommands: Vec::new(),
            action: None,
            on_parse_error: None,
        }
    }

    /// Add an alternate name
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// Add several alternate names
    pub fn aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases.extend(aliases.into_iter().map(Into::into));
        self
    }

    /// Set the one-line description shown in the parent's help
    pub fn usage(mut self, usage: impl Into<String>) -> Self {
        self.usage = usage.into();
        self
    }

    /// Append a subcommand; declaration order is help order and match order
    pub fn subcommand(mut self, cmd: Command) -> Self {
        self.subcommands.push(cmd);
        self
    }

    /// Set the action run when no subcommand matches
    pub fn action<F>(mut self, action: F) -> Self
    where
        F: Fn(&Context, &[String]) -> anyhow::Result<()> + 'static,
    {
        self.action = Some(Box::new(action));
        self
    }

    /// Set the parse error policy for this command and, unless they set
    /// their own, its descendants
    pub fn on_parse_error(mut self, policy: OnParseError) -> Self {
        self.on_parse_error = Some(policy);
        self
    }

    /// The command's flag set, created on first use
    pub fn flags(&mut self) -> &mut FlagSet {
        let name = &self.name;
        self.flags.get_or_insert_with(|| FlagSet::new(name.clone()))
    }

    pub fn get_flags(&self) -> Option<&FlagSet> {
        self.flags.as_ref()
    }

    pub fn get_name(&self) -> &str {
        &self.name
    }

    pub fn get_aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn get_usage(&self) -> &str {
        &self.usage
    }

    pub fn get_subcommands(&self) -> &[Command] {
        &self.subcommands
    }

    pub fn has_action(&self) -> bool {
        self.action.is_some()
    }

    /// Whether `token` is this command's name or one of its aliases
    pub fn matches(&self, token: &str) -> bool {
        self.name == token || self.aliases.iter().any(|a| a == token)
    }

    /// First subcommand in declared order matching `token`
    pub fn find_subcommand(&self, token: &str) -> Option<&Command> {
        self.subcommands.iter().find(|cmd| cmd.matches(token))
    }

    pub fn find_subcommand_mut(&mut self, token: &str) -> Option<&mut Command> {
        self.subcommands.iter_mut().find(|cmd| cmd.matches(token))
    }

    /// Parse `args` and run the selected command, writing help to stdout
    pub fn dispatch<I, S>(&mut self, ctx: &Context, args: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dispatch_to(ctx, args, &mut io::stdout())
    }

    /// Like [`Command::dispatch`], writing help to `out`
    ///
    /// # Panics
    ///
    /// Panics if the application registered its own `help` flag on a
    /// command reached by this call.
    pub fn dispatch_to<I, S>(&mut self, ctx: &Context, args: I, out: &mut dyn Write) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        let policy = self.on_parse_error.unwrap_or_default();
        self.dispatch_inner(ctx, &args, out, policy)
    }

    fn dispatch_inner(
        &mut self,
        ctx: &Context,
        args: &[String],
        out: &mut dyn Write,
        inherited: OnParseError,
    ) -> Result<()> {
        let policy = self.on_parse_error.unwrap_or(inherited);
        let help = self.help_flag();
        help.replace(false);

        match self.flags().parse(args.iter().cloned()) {
            Ok(()) => {}
            Err(err) if is_help_request(&err) => {
                self.write_help(out)?;
                return Ok(());
            }
            Err(err) => return Err(self.parse_failure(err, policy)),
        }

        if help.get() {
            self.write_help(out)?;
            return Ok(());
        }

        let positional = self.flags().args().to_vec();

        if let Some((first, rest)) = positional.split_first() {
            if let Some(cmd) = self.find_subcommand_mut(first) {
                debug!(command = %cmd.name, token = %first, "descending into subcommand");
                return cmd.dispatch_inner(ctx, rest, out, policy);
            }
        }

        if let Some(action) = &self.action {
            debug!(command = %self.name, args = ?positional, "running action");
            return action(ctx, &positional).map_err(DispatchError::Action);
        }

        debug!(command = %self.name, "no subcommand or action, showing help");
        self.write_help(out)?;
        Ok(())
    }

    /// Register the reserved help flag once and hand back its variable
    fn help_flag(&mut self) -> FlagVar<bool> {
        if let Some(help) = &self.help {
            return help.clone();
        }
        let help = self.flags().bool(HELP_FLAG, false, HELP_USAGE);
        self.help = Some(help.clone());
        help
    }

    fn parse_failure(&self, err: FlagError, policy: OnParseError) -> DispatchError {
        match policy {
            OnParseError::ReturnError => DispatchError::Parse {
                command: self.name.clone(),
                source: err,
            },
            OnParseError::Exit => {
                eprintln!("{}", err);
                let _ = self.write_help(&mut io::stderr());
                process::exit(PARSE_ERROR_EXIT_CODE);
            }
        }
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("aliases", &self.aliases)
            .field("usage", &self.usage)
            .field("flags", &self.flags)
            .field("subcommands", &self.subcommands)
            .field("action", &self.action.is_some())
            .field("on_parse_error", &self.on_parse_error)
            .finish()
    }
}
