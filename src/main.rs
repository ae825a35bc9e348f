use std::io::{self, Write};
use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use twirl::command::{CommandFailed, CommandLine};
use twirl::options::{parse_color, parse_indent, parse_interval, parse_spinner};
use twirl::{Options, PromiseOptions, Spinner, SpinnerColor, SpinnerSelection, Text, promise, spinners};

#[derive(Parser)]
#[command(
    name = "twirl",
    version,
    about = "Run a command behind an elegant terminal spinner."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    display: DisplayArgs,

    /// Print the names of the built-in spinners and exit
    #[arg(long, default_value_t = false)]
    list: bool,

    /// The command to run, after `--`
    #[arg(last = true, value_name = "COMMAND")]
    argv: Vec<String>,
}

#[derive(Subcommand)]
enum Command {
    /// Show off colors, indentation and spinner changes
    Demo,
}

#[derive(Args)]
struct DisplayArgs {
    /// Text next to the spinner (defaults to the command line)
    #[arg(short, long)]
    text: Option<String>,

    /// Text before the spinner
    #[arg(long)]
    prefix: Option<String>,

    /// Text after the spinner text
    #[arg(long)]
    suffix: Option<String>,

    /// Built-in spinner name, or a JSON definition
    #[arg(short, long, value_parser = parse_spinner)]
    spinner: Option<SpinnerSelection>,

    /// Custom spinner as JSON: {"frames": [...], "interval": n}
    #[arg(long, value_name = "JSON", conflicts_with = "spinner", value_parser = SpinnerSelection::from_json)]
    spinner_json: Option<SpinnerSelection>,

    /// Spinner color, or `none`
    #[arg(short, long)]
    color: Option<String>,

    /// Columns to indent the spinner by
    #[arg(short, long, value_parser = parse_indent)]
    indent: Option<usize>,

    /// Milliseconds between frames
    #[arg(long, value_parser = parse_interval)]
    interval: Option<u64>,

    /// Persisted text when the command succeeds
    #[arg(long)]
    success_text: Option<String>,

    /// Persisted text when the command fails
    #[arg(long)]
    fail_text: Option<String>,

    /// Show elapsed seconds after the text
    #[arg(long, default_value_t = false)]
    elapsed: bool,

    /// Produce no spinner output at all
    #[arg(long, default_value_t = false)]
    silent: bool,

    /// Leave the cursor visible while spinning
    #[arg(long, default_value_t = false)]
    no_hide_cursor: bool,

    /// Let keystrokes through while spinning
    #[arg(long, default_value_t = false)]
    no_discard_stdin: bool,
}

impl DisplayArgs {
    /// Defaults, then `TWIRL_*` variables, then flags.
    fn options(&self) -> anyhow::Result<Options> {
        let mut options = Options::default().apply_env()?;
        if let Some(text) = &self.text {
            options.text = text.into();
        }
        if let Some(prefix) = &self.prefix {
            options.prefix_text = prefix.into();
        }
        if let Some(suffix) = &self.suffix {
            options.suffix_text = suffix.into();
        }
        if let Some(selection) = self.spinner_json.as_ref().or(self.spinner.as_ref()) {
            options.spinner = selection.clone();
        }
        if let Some(color) = &self.color {
            options.color = parse_color(color)?;
        }
        if let Some(indent) = self.indent {
            options.indent = indent;
        }
        if self.interval.is_some() {
            options.interval = self.interval;
        }
        if self.silent {
            options.is_silent = true;
        }
        if self.no_hide_cursor {
            options.hide_cursor = false;
        }
        if self.no_discard_stdin {
            options.discard_stdin = false;
        }
        if self.elapsed {
            let started = Instant::now();
            options.suffix_text = Text::dynamic(move || format!("({}s)", started.elapsed().as_secs()));
        }
        Ok(options)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("TWIRL_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    if cli.list {
        list_spinners()?;
        return Ok(ExitCode::SUCCESS);
    }

    match cli.command {
        Some(Command::Demo) => demo(cli.display.options()?).await,
        None => run_command(cli.argv, &cli.display).await,
    }
}

fn list_spinners() -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    for name in spinners::names() {
        let Some(definition) = spinners::get(name) else {
            continue;
        };
        let interval = definition
            .interval()
            .map(|ms| format!("{ms}ms"))
            .unwrap_or_default();
        writeln!(stdout, "{name:<20} {interval:>6}  {}", definition.frames().join(" "))?;
    }
    Ok(())
}

async fn run_command(argv: Vec<String>, display: &DisplayArgs) -> anyhow::Result<ExitCode> {
    let command = CommandLine::new(argv)?;
    let mut options = display.options()?;
    if options.text.is_empty() {
        options.text = command.to_string().into();
    }

    let outcome = promise(
        command.into_action(),
        PromiseOptions {
            spinner: options,
            success_text: display.success_text.as_deref().map(Into::into),
            fail_text: display.fail_text.as_deref().map(Into::into),
        },
    )
    .await;

    match outcome {
        Ok(captured) => {
            print!("{}", captured.stdout);
            eprint!("{}", captured.stderr);
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            let Some(failed) = err.downcast_ref::<CommandFailed>() else {
                return Err(err);
            };
            print!("{}", failed.output.stdout);
            eprint!("{}", failed.output.stderr);
            let code = failed
                .output
                .code
                .and_then(|code| u8::try_from(code).ok())
                .filter(|code| *code != 0)
                .unwrap_or(1);
            Ok(ExitCode::from(code))
        }
    }
}

async fn demo(options: Options) -> anyhow::Result<ExitCode> {
    let step = Duration::from_secs(1);
    let spinner = Spinner::new(Options {
        text: "Loading unicorns".into(),
        ..options
    })?;
    spinner.start();

    tokio::time::sleep(step).await;
    spinner.set_color(Some(SpinnerColor::Yellow));
    spinner.set_text("Loading rainbows");

    tokio::time::sleep(step).await;
    spinner.set_color(Some(SpinnerColor::Green));
    spinner.set_indent(2)?;
    spinner.set_text("Loading with indent");

    tokio::time::sleep(step).await;
    spinner.set_indent(0)?;
    spinner.set_spinner("moon")?;
    spinner.set_text("Loading with different spinners");

    tokio::time::sleep(step).await;
    spinner.succeed();
    Ok(ExitCode::SUCCESS)
}
