use std::{
    io::{self, BufRead, Write},
    path::{Path, PathBuf},
};

mod terminal;

use addressbook::{Logic, PrefsStorage, XmlAddressBookStorage, domain::prefs::hash_password};
use anyhow::{Context, bail};
use clap::ArgAction;
use terminal::Colorize;
use tracing::instrument;

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// The user preferences file
    #[arg(long, default_value = "preferences.toml", global = true)]
    prefs: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        self.command
            .unwrap_or(Command::Repl)
            .run(&self.prefs)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        // Logs go to stderr so they never mix with command feedback.
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(io::stderr)
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Read commands from standard input until `exit` (default)
    Repl,

    /// Execute a single command and exit
    ///
    /// The remaining arguments are joined with spaces, so
    /// `abook exec add n/Amy Bee p/123 ...` works without quoting.
    Exec(Exec),

    /// Set or change the lock password
    Password(Password),

    /// Write a backup copy of the address book
    Backup(Backup),
}

impl Command {
    fn run(self, prefs: &Path) -> anyhow::Result<()> {
        match self {
            Self::Repl => {
                let mut logic = open(prefs)?;
                repl(&mut logic, io::stdin().lock(), &mut io::stdout().lock())?;
            }
            Self::Exec(command) => command.run(prefs, &mut io::stdout().lock())?,
            Self::Password(command) => command.run(prefs)?,
            Self::Backup(command) => command.run(prefs, &mut io::stdout().lock())?,
        }
        Ok(())
    }
}

/// Opens the address book named by the preferences file.
///
/// A missing preferences file means the defaults. The preferences file
/// remains the credential source for `lock`/`unlock`.
#[instrument(level = "debug")]
fn open(prefs: &Path) -> anyhow::Result<Logic> {
    let prefs_storage = PrefsStorage::new(prefs);
    let user_prefs = prefs_storage
        .read_or_default()
        .with_context(|| format!("failed to load preferences from {}", prefs.display()))?;
    tracing::info!(
        name = user_prefs.address_book_name(),
        path = %user_prefs.address_book_file_path().display(),
        "Opening address book"
    );
    let storage = XmlAddressBookStorage::new(user_prefs.address_book_file_path());
    let path = storage.path().to_path_buf();

    Logic::load(storage, prefs_storage)
        .with_context(|| format!("failed to load address book from {}", path.display()))
}

/// Runs commands line by line until `exit` or end of input.
///
/// Command errors are reported and the session carries on.
fn repl(logic: &mut Logic, input: impl BufRead, output: &mut impl Write) -> io::Result<()> {
    writeln!(
        output,
        "{}",
        "Welcome to Address++. Type `help` to see all commands.".info()
    )?;

    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match logic.execute(&line) {
            Ok(result) => {
                writeln!(output, "{}", result.feedback().success())?;
                if result.is_exit() {
                    break;
                }
            }
            Err(e) => writeln!(output, "{}", e.to_string().as_str().warning())?,
        }
    }

    Ok(())
}

#[derive(Debug, clap::Parser)]
pub struct Exec {
    /// The command line, e.g. `list` or `delete 2`
    #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
    line: Vec<String>,
}

impl Exec {
    #[instrument(level = "debug", skip_all)]
    fn run(self, prefs: &Path, output: &mut impl Write) -> anyhow::Result<()> {
        let mut logic = open(prefs)?;
        let result = logic.execute(&self.line.join(" "))?;
        writeln!(output, "{}", result.feedback().success())?;
        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
pub struct Password {
    /// The new password. Prompted for when omitted.
    #[arg(long)]
    new: Option<String>,

    /// The current password, required once a password is set. Prompted for
    /// when omitted.
    #[arg(long)]
    current: Option<String>,
}

impl Password {
    #[instrument(level = "debug", skip_all)]
    fn run(self, prefs: &Path) -> anyhow::Result<()> {
        let storage = PrefsStorage::new(prefs);
        let mut user_prefs = storage
            .read_or_default()
            .with_context(|| format!("failed to load preferences from {}", prefs.display()))?;

        if user_prefs.has_password() {
            let current = match self.current {
                Some(current) => current,
                None => dialoguer::Password::new()
                    .with_prompt("Current password")
                    .interact()?,
            };
            if hash_password(&current) != user_prefs.password_hash() {
                bail!("Password is incorrect. Please try again");
            }
        }

        let new = match self.new {
            Some(new) => new,
            None => dialoguer::Password::new()
                .with_prompt("New password")
                .with_confirmation("Confirm password", "Passwords do not match")
                .interact()?,
        };
        if new.is_empty() {
            bail!("Password must not be empty");
        }

        user_prefs.set_password(&new);
        storage
            .save(&user_prefs)
            .with_context(|| format!("failed to update {}", prefs.display()))?;
        tracing::info!("Lock password updated");
        println!("{}", "Password updated".success());
        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
pub struct Backup {
    /// Where to write the copy. Defaults to the data file path with a
    /// `-backup.xml` suffix.
    path: Option<PathBuf>,
}

impl Backup {
    #[instrument(level = "debug", skip_all)]
    fn run(self, prefs: &Path, output: &mut impl Write) -> anyhow::Result<()> {
        let mut logic = open(prefs)?;
        // Goes through the command layer so a locked book is refused here too.
        let line = match &self.path {
            Some(path) => format!("backup {}", path.display()),
            None => "backup".to_string(),
        };
        let result = logic.execute(&line)?;
        writeln!(output, "{}", result.feedback().success())?;
        Ok(())
    }
}
