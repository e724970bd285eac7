use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "memo",
    about = "memo — a personal word list and notes server",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the HTTP server
    Serve(ServeArgs),
    /// List, add, or remove saved words
    Words(WordsArgs),
    /// Show or replace notes
    Notes(NotesArgs),
}

#[derive(Args)]
pub struct ServeArgs {
    /// TOML config file; flags given here override its values
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    #[arg(short, long)]
    pub port: Option<u16>,
    #[arg(long)]
    pub db_path: Option<PathBuf>,
    #[arg(long)]
    pub static_dir: Option<PathBuf>,
    /// PEM certificate; serves HTTPS together with --key
    #[arg(long, requires = "key")]
    pub cert: Option<PathBuf>,
    #[arg(long, requires = "cert")]
    pub key: Option<PathBuf>,
    /// Do not mount the /api/note routes
    #[arg(long)]
    pub no_notes: bool,
}

#[derive(Args)]
pub struct StoreArgs {
    #[arg(long, default_value = "memo_testdata/db")]
    pub db_path: PathBuf,
}

#[derive(Args)]
pub struct WordsArgs {
    #[command(flatten)]
    pub store: StoreArgs,
    #[command(subcommand)]
    pub action: Option<WordsAction>,
}

#[derive(Subcommand)]
pub enum WordsAction {
    List,
    Add { name: String },
    Remove { name: String },
}

#[derive(Args)]
pub struct NotesArgs {
    #[command(flatten)]
    pub store: StoreArgs,
    #[command(subcommand)]
    pub action: Option<NotesAction>,
}

#[derive(Subcommand)]
pub enum NotesAction {
    Show,
    /// Replace all notes with blank-line separated text from FILE or stdin
    Set { file: Option<PathBuf> },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_serve_defaults() {
        let cli = Cli::try_parse_from(["memo", "serve"]).unwrap();
        if let Command::Serve(args) = cli.command {
            assert!(args.port.is_none());
            assert!(args.cert.is_none());
            assert!(!args.no_notes);
        } else { panic!("wrong command"); }
        assert_eq!(cli.format, OutputFormat::Text);
    }

    #[test]
    fn parse_serve_flags() {
        let cli = Cli::try_parse_from([
            "memo", "serve", "-p", "8443", "--db-path", "/tmp/db",
            "--cert", "c.pem", "--key", "k.pem", "--no-notes",
        ]).unwrap();
        if let Command::Serve(args) = cli.command {
            assert_eq!(args.port, Some(8443));
            assert_eq!(args.db_path, Some(PathBuf::from("/tmp/db")));
            assert_eq!(args.cert, Some(PathBuf::from("c.pem")));
            assert!(args.no_notes);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn cert_requires_key() {
        assert!(Cli::try_parse_from(["memo", "serve", "--cert", "c.pem"]).is_err());
    }

    #[test]
    fn parse_words_add() {
        let cli = Cli::try_parse_from(["memo", "words", "add", "sun"]).unwrap();
        if let Command::Words(args) = cli.command {
            assert!(matches!(args.action, Some(WordsAction::Add { ref name }) if name == "sun"));
            assert_eq!(args.store.db_path, PathBuf::from("memo_testdata/db"));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_words_without_action() {
        let cli = Cli::try_parse_from(["memo", "--format", "json", "words"]).unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(matches!(cli.command, Command::Words(WordsArgs { action: None, .. })));
    }

    #[test]
    fn parse_notes_set() {
        let cli = Cli::try_parse_from(["memo", "notes", "--db-path", "d", "set", "notes.txt"]).unwrap();
        if let Command::Notes(args) = cli.command {
            assert_eq!(args.store.db_path, PathBuf::from("d"));
            assert!(matches!(args.action, Some(NotesAction::Set { file: Some(_) })));
        } else { panic!("wrong command"); }
    }
}
