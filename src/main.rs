use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use circle_packs::annotations::Annotations;
use circle_packs::controls::Controls;
use circle_packs::dataset::{Record, load_payload};
use circle_packs::fields::{Configuration, FieldDescriptor};
use circle_packs::hierarchy::{GroupNode, classify};
use circle_packs::label::{
    FixedAdvanceMeasurer, LaidOutNode, base_font_scale, render_label,
};
use circle_packs::pipeline::LoadedDataset;
use circle_packs::search::SubstringIndex;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Args)]
struct Source {
    /// Dataset JSON: an array of records, or `{ "dataset": [...], "configuration": {...} }`.
    #[arg(long)]
    dataset: PathBuf,
    /// Partial field configuration; replaces one embedded in the dataset file.
    #[arg(long)]
    configuration: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the merged field configuration.
    Infer {
        #[command(flatten)]
        source: Source,
    },
    /// Print the distinct values of every field.
    Values {
        #[command(flatten)]
        source: Source,
    },
    /// Run a query and print the matching records in rank order.
    Search {
        #[command(flatten)]
        source: Source,
        query: String,
        /// Match plain case-insensitive substrings instead of fuzzy terms.
        #[arg(long)]
        substring: bool,
    },
    /// Print the grouped hierarchy with rendering classes.
    Hierarchy {
        #[command(flatten)]
        source: Source,
        /// Dotted field ids to group by, outermost first.
        #[arg(long = "group-by", value_delimiter = ',')]
        group_by: Vec<String>,
        /// Controls file supplying grouping and node visibility.
        #[arg(long)]
        controls: Option<PathBuf>,
        /// Query whose matches are highlighted.
        #[arg(long)]
        query: Option<String>,
    },
    /// Fit a label into a circle's label band.
    Label {
        #[arg(long)]
        radius: f64,
        #[arg(long)]
        label_size: f64,
        #[arg(long)]
        text: String,
        /// Height of the node in the hierarchy.
        #[arg(long, default_value_t = 1)]
        height: usize,
        /// Radius of the leaf circles, which sets the font basis.
        #[arg(long, default_value_t = 8.0)]
        leaf_radius: f64,
        /// Character advance at 100% font size.
        #[arg(long, default_value_t = 9.6)]
        advance: f64,
        /// Line height at 100% font size.
        #[arg(long, default_value_t = 16.0)]
        line_height: f64,
    },
}

#[derive(Serialize)]
struct SearchRow<'a> {
    #[serde(rename = "ref")]
    reference: usize,
    record: &'a Record,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ClassifiedNode<'a> {
    field_value: &'a str,
    depth: usize,
    height: usize,
    records: usize,
    search_result_count: usize,
    classes: Vec<&'static str>,
    hidden: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    children: Vec<ClassifiedNode<'a>>,
}

fn classified<'a>(
    node: &'a GroupNode,
    annotations: &Annotations,
    has_search: bool,
    show_nodes: bool,
) -> ClassifiedNode<'a> {
    let classes = classify(node, annotations, has_search, show_nodes);
    ClassifiedNode {
        field_value: &node.field_value,
        depth: node.depth,
        height: node.height,
        records: node.records.len(),
        search_result_count: node.search_result_count,
        classes: classes.names(),
        hidden: classes.hidden,
        children: node
            .children
            .iter()
            .map(|child| classified(child, annotations, has_search, show_nodes))
            .collect(),
    }
}

fn load(source: &Source) -> Result<LoadedDataset> {
    let mut payload = load_payload(&source.dataset)?;
    if let Some(path) = &source.configuration {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read configuration file {}", path.display()))?;
        let configuration: Configuration = serde_json::from_str(&raw)
            .with_context(|| format!("invalid configuration file {}", path.display()))?;
        payload.configuration = Some(configuration);
    }
    Ok(LoadedDataset::new(payload))
}

fn resolve_grouping(configuration: &Configuration, ids: &[String]) -> Result<Vec<FieldDescriptor>> {
    ids.iter()
        .map(|id| {
            configuration
                .field_by_id(id)
                .cloned()
                .ok_or_else(|| anyhow!("unknown field `{id}`"))
        })
        .collect()
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("failed to render output")?;
    println!("{rendered}");
    Ok(())
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Infer { source } => print_json(load(&source)?.configuration()),
        Command::Values { source } => print_json(load(&source)?.values()),
        Command::Search {
            source,
            query,
            substring,
        } => {
            let mut loaded = load(&source)?;
            if substring {
                let index = SubstringIndex::build(loaded.dataset(), loaded.configuration());
                loaded.search_session().replace_index(Arc::new(index));
            }
            let results = loaded.search(&query).results.clone();
            let rows = results
                .iter()
                .filter_map(|&reference| {
                    loaded
                        .dataset()
                        .get(reference)
                        .map(|record| SearchRow { reference, record })
                })
                .collect::<Vec<_>>();
            print_json(&rows)
        }
        Command::Hierarchy {
            source,
            group_by,
            controls,
            query,
        } => {
            let mut loaded = load(&source)?;
            let controls = match controls {
                Some(path) => Controls::load(&path)?,
                None => Controls::default(),
            };
            let grouping = if group_by.is_empty() {
                controls.hierarchy_config.clone()
            } else {
                resolve_grouping(loaded.configuration(), &group_by)?
            };
            if let Some(query) = &query {
                loaded.search(query);
            }

            let root = loaded.group(&grouping);
            print_json(&classified(
                &root,
                loaded.annotations(),
                loaded.has_search(),
                controls.should_show_nodes,
            ))
        }
        Command::Label {
            radius,
            label_size,
            text,
            height,
            leaf_radius,
            advance,
            line_height,
        } => {
            let node = LaidOutNode {
                radius,
                x: 0.0,
                y: 0.0,
                depth: 1,
                height,
                label_size,
                field_value: text,
            };
            let measurer = FixedAdvanceMeasurer {
                advance,
                line_height,
            };
            let label = render_label(&node, base_font_scale(leaf_radius), &measurer)
                .ok_or_else(|| anyhow!("radius {radius} has no room for a {label_size} label band"))?;
            tracing::debug!(
                font_size_percent = label.fitted.font_size_percent,
                "fitted label"
            );
            print_json(&label)
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    run(cli.command)
}
