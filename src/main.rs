mod debug_report;

use clap::Parser;
use metarobots::{DirectiveSet, EntityRef, ResolutionOptions, SiteSnapshot, resolve_verbose_with};
use std::io::{self, IsTerminal};
use tracing_subscriber::EnvFilter;

/// Explain the robots directives a page gets, and which rule decided each.
#[derive(Debug, Parser)]
#[command(name = "metarobots", version, about)]
struct Cli {
    /// Site snapshot (JSON or YAML) with settings, content and request.
    #[arg(short, long, env = "METAROBOTS_SNAPSHOT")]
    snapshot: Option<std::path::PathBuf>,

    /// Resolve for this post id.
    #[arg(long, conflicts_with_all = ["term", "archive"])]
    post: Option<u64>,

    /// Resolve for this term id (requires --taxonomy).
    #[arg(long, requires = "taxonomy", conflicts_with = "archive")]
    term: Option<u64>,

    #[arg(long)]
    taxonomy: Option<String>,

    /// Resolve for this post type's archive.
    #[arg(long, value_name = "POST_TYPE")]
    archive: Option<String>,

    /// Directives to resolve (repeatable). Defaults to all; unknown names are ignored.
    #[arg(short, long = "directive", value_name = "NAME")]
    directives: Vec<String>,

    /// Ignore per-item overrides.
    #[arg(long)]
    ignore_overrides: bool,

    /// Ignore pagination and protected-content rules.
    #[arg(long)]
    ignore_protections: bool,

    /// Print the rule chains and exit.
    #[arg(long)]
    rules: bool,

    /// Print the result as JSON.
    #[arg(long)]
    json: bool,

    /// Force ANSI color output.
    #[arg(long, conflicts_with = "no_color")]
    color: bool,

    /// Disable ANSI color output.
    #[arg(long)]
    no_color: bool,
}

impl Cli {
    fn entity(&self) -> Option<EntityRef> {
        if let Some(id) = self.post {
            return Some(EntityRef::Post(id));
        }
        if let (Some(id), Some(taxonomy)) = (self.term, &self.taxonomy) {
            return Some(EntityRef::Term { id, taxonomy: taxonomy.clone() });
        }
        self.archive.clone().map(EntityRef::PostTypeArchive)
    }

    fn requested(&self) -> DirectiveSet {
        if self.directives.is_empty() {
            DirectiveSet::all()
        } else {
            DirectiveSet::from_names(self.directives.iter().map(String::as_str))
        }
    }

    fn options(&self) -> ResolutionOptions {
        let mut options = ResolutionOptions::empty();
        options.set(ResolutionOptions::IGNORE_OVERRIDES, self.ignore_overrides);
        options.set(ResolutionOptions::IGNORE_PROTECTIONS, self.ignore_protections);
        options
    }

    fn color(&self) -> bool {
        if self.no_color { false } else { self.color || io::stdout().is_terminal() }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    if cli.rules {
        debug_report::print_rules(cli.color());
        return;
    }

    let snapshot = match &cli.snapshot {
        Some(path) => match SiteSnapshot::from_path(path) {
            Ok(snapshot) => snapshot,
            Err(err) => {
                eprintln!("error: {err}");
                std::process::exit(2);
            }
        },
        None => SiteSnapshot::default(),
    };

    let requested = cli.requested();
    if requested.is_empty() {
        eprintln!("error: none of the requested directives are known");
        std::process::exit(2);
    }

    let entity = cli.entity();
    let resolution = resolve_verbose_with(&snapshot, requested, entity.as_ref(), cli.options());

    if cli.json {
        let doc = serde_json::json!({
            "subject": entity.as_ref().map(ToString::to_string),
            "directives": resolution.directives,
            "assertions": resolution.assertions,
        });
        match serde_json::to_string_pretty(&doc) {
            Ok(out) => println!("{out}"),
            Err(err) => {
                eprintln!("error: {err}");
                std::process::exit(1);
            }
        }
        return;
    }

    let subject = entity.map_or_else(|| "current request".to_string(), |e| e.to_string());
    debug_report::print_run(&subject, &resolution, cli.color());
}
