//! Main CLI application

use crate::command::Command;
use crate::context::Context;
use crate::error::DispatchError;
use crate::flag::FlagVar;
use anyhow::{bail, Context as _};
use tracing_subscriber::EnvFilter;

/// CLI application
pub struct App {
    /// The command tree
    root: Command,
}

impl App {
    /// Create the app with its full command tree
    pub fn new() -> Self {
        App {
            root: build_command(),
        }
    }

    /// Root of the command tree
    pub fn command(&self) -> &Command {
        &self.root
    }

    /// Dispatch the given arguments (without the program name)
    pub fn run<I, S>(mut self, ctx: &Context, args: I) -> Result<(), DispatchError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.root.dispatch(ctx, args)
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

/// Debug printer driven by the root `-verbose` flag
#[derive(Clone)]
struct Printer {
    verbose: FlagVar<bool>,
}

impl Printer {
    fn debug(&self, message: &str) {
        if self.verbose.get() {
            eprintln!("[DEBUG] {}", message);
        }
    }
}

/// Build the demo command tree
fn build_command() -> Command {
    let mut root = Command::new("cmdtree");
    let verbose = root.flags().bool("verbose", false, "enable verbose output");
    let printer = Printer { verbose };

    root.subcommand(echo_command(printer.clone()))
        .subcommand(greet_command(printer.clone()))
        .subcommand(math_command(printer))
}

fn echo_command(printer: Printer) -> Command {
    let mut cmd = Command::new("echo").alias("e").usage("print arguments");
    let omit_newline = cmd.flags().bool("n", false, "omit the trailing newline");

    cmd.action(move |_ctx, args| {
        printer.debug(&format!("echo with {} argument(s)", args.len()));
        let line = args.join(" ");
        if omit_newline.get() {
            print!("{}", line);
        } else {
            println!("{}", line);
        }
        Ok(())
    })
}

fn greet_command(printer: Printer) -> Command {
    let mut cmd = Command::new("greet").alias("hi").usage("greet someone");
    let name = cmd.flags().string("name", "world", "who to greet");
    let times = cmd.flags().int("times", 1, "number of greetings");

    cmd.action(move |ctx, _args| {
        let times = times.get();
        if times < 0 {
            bail!("times must not be negative, got {}", times);
        }
        printer.debug(&format!("greeting {} time(s)", times));
        for _ in 0..times {
            ctx.check()?;
            println!("Hello, {}!", name.get());
        }
        Ok(())
    })
}

fn math_command(printer: Printer) -> Command {
    let add_printer = printer.clone();
    let add = Command::new("add")
        .alias("sum")
        .usage("add numbers")
        .action(move |_ctx, args| {
            add_printer.debug("adding");
            println!("{}", parse_numbers(args)?.iter().sum::<f64>());
            Ok(())
        });

    let mul = Command::new("mul")
        .usage("multiply numbers")
        .action(move |_ctx, args| {
            printer.debug("multiplying");
            println!("{}", parse_numbers(args)?.iter().product::<f64>());
            Ok(())
        });

    Command::new("math")
        .usage("arithmetic on numbers")
        .subcommand(add)
        .subcommand(mul)
}

/// Parse positional arguments as numbers
fn parse_numbers(args: &[String]) -> anyhow::Result<Vec<f64>> {
    if args.is_empty() {
        bail!("expected at least one number");
    }
    args.iter()
        .map(|arg| {
            arg.parse::<f64>()
                .with_context(|| format!("invalid number '{}'", arg))
        })
        .collect()
}

/// Install the stderr log subscriber, filtered by `RUST_LOG`
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Run the CLI application with the process arguments
pub fn run() -> Result<(), DispatchError> {
    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    App::new().run(&Context::new(), args)
}
