use std::io::{self, BufRead, Write};
use std::sync::Mutex;
use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use anyhow::Context;
use clap::Parser;
use crate::config::{Cli, Command, ExtractArgs, SearchArgs, SeedArgs, ServeArgs};
use crate::document::parser::load_catalogue;
use crate::engine::search::{SearchEngine, SearchRequest};
use crate::extractor::ExtractorKind;
use crate::preprocessing::stop_words::StopWords;
use crate::store::{ProductStore, SqliteStore};

mod api;
mod config;
mod document;
mod engine;
mod error;
mod extractor;
mod matrix;
mod preprocessing;
mod store;

fn open_engine(cli: &Cli) -> anyhow::Result<SearchEngine> {
    let store = SqliteStore::open(&cli.db)
        .with_context(|| format!("opening product store {}", cli.db.display()))?;
    if store.count()? == 0 {
        log::warn!("Product store {} is empty, run `seed` first", cli.db.display());
    }
    let stop_words = StopWords::load_or_default(cli.stop_words.as_deref());
    let engine = SearchEngine::new(Box::new(store), stop_words, cli.engine_config())?;
    Ok(engine)
}

async fn serve(cli: &Cli, args: &ServeArgs) -> anyhow::Result<()> {
    let engine = open_engine(cli)?;
    let app_state = web::Data::new(Mutex::new(engine));

    log::info!("Starting HTTP server on http://{}", args.bind);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header();
        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(app_state.clone())
            .configure(api::configure)
    })
    .bind(&args.bind)
    .with_context(|| format!("binding {}", args.bind))?
    .run()
    .await?;

    Ok(())
}

fn seed(cli: &Cli, args: &SeedArgs) -> anyhow::Result<()> {
    let products = load_catalogue(&args.file)
        .with_context(|| format!("reading catalogue {}", args.file.display()))?;
    let mut engine = open_engine(cli)?;
    let written = engine.seed(&products, args.reset)?;
    println!("Stored {} products in {}", written, cli.db.display());
    Ok(())
}

fn prompt_query() -> anyhow::Result<String> {
    print!("Enter your product search query: ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn extract(cli: &Cli, args: &ExtractArgs) -> anyhow::Result<()> {
    let kind: ExtractorKind = args.extractor.parse()?;
    let query = match &args.query {
        Some(query) => query.clone(),
        None => prompt_query()?,
    };

    let engine = open_engine(cli)?;
    let extracted = engine.extract(kind, &query);
    println!("Extracted keywords: {:?}", extracted.keywords);
    for entity in &extracted.entities {
        println!("  {:?}: {}", entity.label, entity.text);
    }
    if !extracted.filters.is_empty() {
        println!("Filters: {}", serde_json::to_string(&extracted.filters)?);
    }
    Ok(())
}

fn search(cli: &Cli, args: &SearchArgs) -> anyhow::Result<()> {
    let request = SearchRequest {
        query: args.query.clone(),
        limit: args.limit,
        mode: args.mode.parse()?,
        extractor: args.extractor.parse()?,
        sort: args.sort.parse()?,
    };
    let format: api::format::OutputFormat = args.format.parse()?;

    let engine = open_engine(cli)?;
    let response = engine.search(&request)?;
    match format {
        api::format::OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&response)?),
        api::format::OutputFormat::Text => print!("{}", api::format::format_text(&response)),
    }
    Ok(())
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match &cli.command {
        Command::Serve(args) => serve(&cli, args).await,
        Command::Seed(args) => seed(&cli, args),
        Command::Extract(args) => extract(&cli, args),
        Command::Search(args) => search(&cli, args),
    }
}
