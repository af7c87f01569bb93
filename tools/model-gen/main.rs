use clap::Parser;
use procflow::prelude::*;
use rand::Rng;
use rand::rngs::ThreadRng;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// A CLI tool to generate random, valid process models for stress-testing
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// The path to write the generated model collection to
    #[arg(short, long, default_value = "generated_models.json")]
    output: String,

    /// Number of models to generate
    #[arg(short, long, default_value_t = 10)]
    models: usize,

    /// Minimum number of steps between trigger and end
    #[arg(long, default_value_t = 2)]
    min: usize,

    /// Maximum number of steps between trigger and end
    #[arg(long, default_value_t = 12)]
    max: usize,

    /// Probability that a step is a condition with 2-3 branches
    #[arg(long, default_value_t = 0.3)]
    condition_ratio: f64,
}

const PLAIN_TYPES: [NodeType; 6] = [
    NodeType::Form,
    NodeType::Webhook,
    NodeType::Notification,
    NodeType::Action,
    NodeType::Database,
    NodeType::Api,
];

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    if cli.min > cli.max {
        eprintln!(
            "Error: --min ({}) cannot be greater than --max ({})",
            cli.min, cli.max
        );
        std::process::exit(1);
    }
    if !(0.0..=1.0).contains(&cli.condition_ratio) {
        eprintln!("Error: --condition-ratio must lie between 0 and 1");
        std::process::exit(1);
    }

    let mut rng = rand::rng();
    let mut collection = ModelCollection::new();

    for index in 0..cli.models {
        let steps = rng.random_range(cli.min..=cli.max);
        let model = generate_model(&mut rng, index, steps, cli.condition_ratio);
        Validator::validate(&model)?;
        let visits = Resolver::resolve(&model)?.count();
        info!(
            model = %model.id,
            nodes = model.nodes.len(),
            visits,
            "generated model"
        );
        collection.insert(model.id.clone(), ModelDocument::from(&model));
    }

    JsonFilePersistence::new(&cli.output).save(&collection)?;
    println!(
        "Successfully generated {} model(s) and saved them to '{}'",
        collection.len(),
        cli.output
    );

    Ok(())
}

/// Builds a trigger, `steps` plain or branching steps and a closing end node.
/// Every branch of a condition merges into a join node before the next step.
fn generate_model(
    rng: &mut ThreadRng,
    index: usize,
    steps: usize,
    condition_ratio: f64,
) -> ProcessModel {
    let id = format!("generated_model_{:03}", index);
    let mut builder = ProcessModel::builder(&id, &format!("Generated Process {}", index))
        .description("Randomly generated process model")
        .process_type("project_management")
        .node(Node::new("start", NodeType::Trigger, "Start").at(100, 100));

    let mut current = "start".to_string();
    let mut x = 100;

    for step in 0..steps {
        x += 150;
        if rng.random_bool(condition_ratio) {
            let cond = format!("s{}_check", step);
            let join = format!("s{}_join", step);
            builder = builder
                .node(Node::new(&cond, NodeType::Condition, &format!("Check {}", step)).at(x, 100))
                .connect(&current, &cond);

            x += 150;
            let branches = rng.random_range(2..=3);
            for b in 0..branches {
                let branch_node = format!("s{}_b{}", step, b);
                let node_type = random_plain_type(rng);
                builder = builder
                    .node(
                        Node::new(&branch_node, node_type, &format!("Branch {} of {}", b, step))
                            .at(x, 50 + 100 * b as i64),
                    )
                    .branch(&cond, &branch_node, &format!("option_{}", b))
                    .connect(&branch_node, &join);
            }

            x += 150;
            builder = builder.node(Node::new(&join, NodeType::Action, "Merge").at(x, 100));
            current = join;
        } else {
            let node_id = format!("s{}", step);
            let node_type = random_plain_type(rng);
            builder = builder
                .node(Node::new(&node_id, node_type, &format!("Step {}", step)).at(x, 100))
                .connect(&current, &node_id);
            current = node_id;
        }
    }

    builder
        .node(Node::new("end", NodeType::End, "Complete").at(x + 150, 100))
        .connect(&current, "end")
        .build()
}

fn random_plain_type(rng: &mut ThreadRng) -> NodeType {
    PLAIN_TYPES[rng.random_range(0..PLAIN_TYPES.len())]
}
