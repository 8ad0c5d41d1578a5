use std::io::Write;

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;

use cli::{AddArgs, Cli, Command, SearchArgs};
use memedex::{
    DataDir,
    error::{self, Error},
    ingestion::{self, AddOptions},
    ocr::Tesseract,
    output,
    ranker,
    record_store,
    walker,
};

fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if let Ok(env) = std::env::var("MEMEDEX_LOG") {
        EnvFilter::new(env)
    } else if quiet {
        EnvFilter::new("warn")
    } else {
        match verbose {
            0 => EnvFilter::new("info"),
            1 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .init();
}

fn main() -> error::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    if let Command::Completions(args) = &cli.command {
        args.generate();
        return Ok(());
    }

    let data_dir = DataDir::resolve(cli.data_dir.as_deref())?;

    match cli.command {
        Command::Add(args) => cmd_add(&data_dir, &args)?,
        Command::Search(args) => cmd_search(&data_dir, &args)?,
        Command::List(args) => cmd_list(&data_dir, args.json)?,
        Command::Status(args) => cmd_status(&data_dir, args.json)?,
        Command::Completions(_) => {}
    }

    Ok(())
}

fn cmd_add(data_dir: &DataDir, args: &AddArgs) -> error::Result<()> {
    let options = AddOptions {
        recursive: args.recursive,
        formats: walker::parse_formats(&args.format)?,
        keywords: args.keywords.clone(),
    };

    let db_path = data_dir.database();
    let mut store = record_store::load_or_init(&db_path)?;
    let images_dir = data_dir.images_dir()?;
    let ocr = Tesseract::new(&args.lang);

    let report = ingestion::add_path(
        &mut store,
        &images_dir,
        &args.path,
        &options,
        &ocr,
    )?;

    if !report.added.is_empty() {
        record_store::save(&db_path, &store)?;
    }
    Ok(())
}

fn cmd_search(data_dir: &DataDir, args: &SearchArgs) -> error::Result<()> {
    let db_path = data_dir.database();
    if !db_path.exists() {
        return Err(Error::NotFound {
            kind: "database",
            name: db_path.display().to_string(),
        });
    }

    let keywords: Vec<String> = args
        .keywords
        .iter()
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
        .collect();
    tracing::info!("Search keywords: {}", keywords.join(" | "));

    let store = record_store::load(&db_path)?;
    let limit = if args.all { None } else { Some(args.count) };
    let candidates = ranker::rank(&store, &keywords, limit);
    let hits = output::resolve_hits(&store, data_dir, &candidates);

    let mut stdout = std::io::stdout().lock();
    if args.json {
        output::write_hits_json(&mut stdout, &hits, &keywords)?;
    } else if args.files {
        output::write_hits_files(&mut stdout, &hits)?;
    } else {
        output::write_hits_human(&mut stdout, &hits, args.detail)?;
    }
    stdout.flush()?;
    Ok(())
}

fn cmd_list(data_dir: &DataDir, json: bool) -> error::Result<()> {
    let store = load_if_present(data_dir)?;
    let entries = output::entry_views(&store, data_dir);

    let mut stdout = std::io::stdout().lock();
    if json {
        output::write_entries_json(&mut stdout, &entries)?;
    } else {
        output::write_entries_human(&mut stdout, &entries)?;
    }
    Ok(())
}

fn cmd_status(data_dir: &DataDir, json: bool) -> error::Result<()> {
    let store = load_if_present(data_dir)?;
    let db_path = data_dir.database();
    let phrase_count: usize = store.iter().map(|e| e.phrases().len()).sum();

    if json {
        let status = serde_json::json!({
            "data_dir": data_dir.root().display().to_string(),
            "database": db_path.display().to_string(),
            "memes": store.len(),
            "phrases": phrase_count,
        });
        println!("{status}");
    } else {
        println!("Data directory: {}", data_dir.root().display());
        println!("Database: {}", db_path.display());
        println!("Memes: {}", store.len());
        println!("Phrases: {phrase_count}");
    }
    Ok(())
}

/// An absent database reads as empty; a corrupt one is still an error.
fn load_if_present(data_dir: &DataDir) -> error::Result<record_store::Store> {
    match record_store::load(&data_dir.database()) {
        Err(Error::NotFound { .. }) => Ok(record_store::Store::new()),
        other => other,
    }
}
