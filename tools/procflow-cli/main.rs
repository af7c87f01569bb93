use clap::{Parser, Subcommand};
use procflow::model::{NodeType, PROCESS_TYPES, default_models, process_type_label, templates};
use procflow::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Manage, validate and preview business process models
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the JSON model collection
    #[arg(
        short,
        long,
        env = "PROCFLOW_STORE",
        default_value = "data/business_models.json"
    )]
    store: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List stored models
    List {
        /// Only show models of this process type
        #[arg(short = 't', long = "type")]
        process_type: Option<String>,
    },
    /// Show a model's nodes and connections
    Show { id: String },
    /// Validate a model document, or a whole collection, without storing it
    Validate { file: PathBuf },
    /// Print the preview traversal of a stored model
    Preview { id: String },
    /// Store a new model read from a model document
    Create { id: String, file: PathBuf },
    /// Replace the graph of a stored model with a model document
    Replace { id: String, file: PathBuf },
    /// Delete a stored model
    Delete { id: String },
    /// Print collection statistics
    Stats,
    /// List the built-in templates
    Templates,
    /// Create a model from a built-in template
    FromTemplate { key: String },
    /// List process types and node types
    Types,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("procflow=info,warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        exit_with_error(&e.to_string());
    }
}

fn run(cli: Cli) -> Result<()> {
    // Validation of loose files and catalog listings never touch the store.
    match &cli.command {
        Command::Validate { file } => return validate_file(file),
        Command::Templates => {
            print_templates();
            return Ok(());
        }
        Command::Types => {
            print_types();
            return Ok(());
        }
        _ => {}
    }

    let store =
        ProcessModelStore::open_or_seed(JsonFilePersistence::new(&cli.store), default_models)?;

    match cli.command {
        Command::List { process_type } => {
            let models = match &process_type {
                Some(t) => store.list_by_type(t),
                None => store.list(),
            };
            if models.is_empty() {
                println!("No business models found.");
            }
            for model in models {
                println!(
                    "{:<32} {:<28} {:<20} nodes: {:>3}  connections: {:>3}",
                    model.id,
                    model.name,
                    process_type_label(&model.process_type).unwrap_or("Unknown"),
                    model.nodes.len(),
                    model.connections.len()
                );
            }
            if process_type.is_none() {
                for (id, error) in store.rejected() {
                    println!("{:<32} INVALID: {}", id, error);
                }
            }
        }
        Command::Show { id } => {
            let model = store.get(&id)?;
            println!("{} ({})", model.name, model.id);
            if !model.description.is_empty() {
                println!("  {}", model.description);
            }
            println!("  Created: {}", model.created_at);
            println!("\nNodes:");
            for node in &model.nodes {
                println!(
                    "  {:<20} {:<13} {:<28} ({}, {})",
                    node.id, node.node_type, node.label, node.x, node.y
                );
            }
            println!("\nConnections:");
            for conn in &model.connections {
                match &conn.condition {
                    Some(c) => println!("  {} -> {} [{}]", conn.from, conn.to, c),
                    None => println!("  {} -> {}", conn.from, conn.to),
                }
            }
            println!("\nWebhooks: {}", model.webhooks.join(", "));
            println!("Forms:    {}", model.forms.join(", "));
        }
        Command::Preview { id } => {
            let model = store.get(&id)?;
            Validator::lint(&model);
            let order = Resolver::resolve(&model)?;
            println!("Process Flow: {}\n", model.name);
            println!("{}", PreviewFormatter::format(order));
        }
        Command::Create { id, file } => {
            let model = read_document(&file)?.into_process_model(&id)?;
            let id = store.create(model)?;
            println!("Created business model: {}", id);
        }
        Command::Replace { id, file } => {
            let model = read_document(&file)?.into_process_model(&id)?;
            store.replace(&id, model)?;
            println!("Replaced business model: {}", id);
        }
        Command::Delete { id } => {
            store.delete(&id)?;
            println!("Deleted model: {}", id);
        }
        Command::Stats => print_stats(&store.list()),
        Command::FromTemplate { key } => {
            let id = store.instantiate_template(&key)?;
            println!("Created model from template '{}': {}", key, id);
        }
        Command::Validate { .. } | Command::Templates | Command::Types => {}
    }
    Ok(())
}

fn read_document(path: &PathBuf) -> Result<ModelDocument> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read model file '{}': {}", path.display(), e))?;
    Ok(serde_json::from_str(&content)?)
}

/// Accepts either a single model document or a collection keyed by model id.
fn validate_file(path: &PathBuf) -> Result<()> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read model file '{}': {}", path.display(), e))?;
    let value: Value = serde_json::from_str(&content)?;

    let documents: Vec<(String, ModelDocument)> = if value.get("nodes").is_some() {
        let id = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "model".to_string());
        vec![(id, serde_json::from_value(value)?)]
    } else {
        let collection: ModelCollection = serde_json::from_value(value)?;
        collection.into_iter().collect()
    };

    let mut failures = 0;
    for (id, document) in documents {
        let outcome = document
            .into_process_model(&id)
            .and_then(|model| Validator::validate(&model).map(|_| model));
        match outcome {
            Ok(model) => {
                println!("  -> {}: OK", id);
                for lint in Validator::lint(&model) {
                    println!("     warning: {}", lint.message);
                }
            }
            Err(e) => {
                failures += 1;
                println!("  -> {}: {}", id, e);
            }
        }
    }

    if failures > 0 {
        return Err(format!("{} model(s) failed validation", failures).into());
    }
    Ok(())
}

fn print_stats(models: &[ProcessModel]) {
    let stats = ModelStatistics::collect(models);

    println!("--- Business Model Analytics ---");
    println!("Total Models:      {}", stats.total_models);
    println!("Total Nodes:       {}", stats.total_nodes);
    println!("Total Connections: {}", stats.total_connections);
    println!("Avg Complexity:    {:.1}", stats.average_complexity());

    println!("\nModels by Process Type:");
    for (label, count) in &stats.by_process_type {
        println!("  {:<24} {}", label, count);
    }

    println!("\nNode Type Usage:");
    for (node_type, count) in &stats.node_type_usage {
        println!("  {:<24} {}", node_type.description(), count);
    }

    println!("\nPer Model:");
    for summary in &stats.models {
        println!(
            "  {:<32} nodes: {:>3}  connections: {:>3}  webhooks: {:>2}",
            summary.name, summary.nodes, summary.connections, summary.webhooks
        );
    }
}

fn print_templates() {
    for template in templates() {
        println!("{} - {} [{}]", template.key, template.name, template.complexity);
        println!("  {}", template.description);
        println!("  Estimated Setup Time: {}", template.estimated_time);
        println!("  Includes: {}", template.includes.join(", "));
        if !template.has_blueprint() {
            println!("  (no graph blueprint yet)");
        }
    }
}

fn print_types() {
    println!("Process Types:");
    for (key, label) in PROCESS_TYPES {
        println!("  {:<22} {}", key, label);
    }
    println!("\nNode Types:");
    for node_type in NodeType::ALL {
        println!("  {:<22} {}", node_type, node_type.description());
    }
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
