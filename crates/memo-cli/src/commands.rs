use std::io::Read;
use std::sync::Arc;

use anyhow::Context;
use colored::Colorize;
use memo_server::{MemoServer, ServerConfig, TlsConfig};
use memo_store::{CollectionManager, RedbKvStore};
use memo_types::{NoteList, Word, WordList};

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Serve(args) => cmd_serve(args),
        Command::Words(args) => cmd_words(args, cli.format),
        Command::Notes(args) => cmd_notes(args, cli.format),
    }
}

fn cmd_serve(args: ServeArgs) -> anyhow::Result<()> {
    let config = server_config(&args)?;
    let scheme = if config.tls.is_some() { "https" } else { "http" };
    println!(
        "memo server on {}://{} (store: {})",
        scheme,
        config.bind_addr.to_string().bold(),
        config.db_path.display()
    );

    let server = MemoServer::open(config).context("failed to open store")?;
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(server.serve())?;
    Ok(())
}

/// Merge the optional config file with command-line overrides.
fn server_config(args: &ServeArgs) -> anyhow::Result<ServerConfig> {
    let mut config = match &args.config {
        Some(path) => ServerConfig::load(path)?,
        None => ServerConfig::default(),
    };
    if let Some(port) = args.port {
        config = config.with_port(port);
    }
    if let Some(db_path) = &args.db_path {
        config.db_path = db_path.clone();
    }
    if let Some(static_dir) = &args.static_dir {
        config.static_dir = static_dir.clone();
    }
    if let (Some(cert_path), Some(key_path)) = (&args.cert, &args.key) {
        config.tls = Some(TlsConfig {
            cert_path: cert_path.clone(),
            key_path: key_path.clone(),
        });
    }
    if args.no_notes {
        config.enable_notes = false;
    }
    Ok(config)
}

fn open_manager(store: &StoreArgs) -> anyhow::Result<CollectionManager> {
    let store = RedbKvStore::open(&store.db_path)
        .with_context(|| format!("failed to open store at {}", store.db_path.display()))?;
    Ok(CollectionManager::new(Arc::new(store)))
}

fn cmd_words(args: WordsArgs, format: OutputFormat) -> anyhow::Result<()> {
    let manager = open_manager(&args.store)?;
    let words = apply_words_action(&manager, args.action.unwrap_or(WordsAction::List))?;
    println!("{}", render_words(&words, format)?);
    Ok(())
}

fn apply_words_action(manager: &CollectionManager, action: WordsAction) -> anyhow::Result<WordList> {
    let words = match action {
        WordsAction::List => manager.load::<WordList>()?,
        WordsAction::Add { name } => manager.apply::<WordList, _>(|list| {
            list.add_if_absent(Word::new(name));
        })?,
        WordsAction::Remove { name } => manager.apply::<WordList, _>(|list| {
            list.remove_matching(&name);
        })?,
    };
    Ok(words)
}

fn render_words(words: &WordList, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(words)?),
        OutputFormat::Text if words.is_empty() => Ok("No words saved.".dimmed().to_string()),
        OutputFormat::Text => Ok(words
            .iter()
            .map(|w| format!("  {}", w.name.yellow()))
            .collect::<Vec<_>>()
            .join("\n")),
    }
}

fn cmd_notes(args: NotesArgs, format: OutputFormat) -> anyhow::Result<()> {
    let manager = open_manager(&args.store)?;
    let notes = match args.action.unwrap_or(NotesAction::Show) {
        NotesAction::Show => manager.load::<NoteList>()?,
        NotesAction::Set { file } => {
            let text = match file {
                Some(path) => std::fs::read_to_string(&path)
                    .with_context(|| format!("cannot read {}", path.display()))?,
                None => {
                    let mut text = String::new();
                    std::io::stdin().read_to_string(&mut text)?;
                    text
                }
            };
            let notes = manager.replace(NoteList::from_text(&text))?;
            eprintln!("{} Saved {} notes.", "✓".green().bold(), notes.len());
            notes
        }
    };
    println!("{}", render_notes(&notes, format)?);
    Ok(())
}

fn render_notes(notes: &NoteList, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(notes)?),
        OutputFormat::Text if notes.is_empty() => Ok("No notes.".dimmed().to_string()),
        OutputFormat::Text => Ok(notes.to_text()),
    }
}
