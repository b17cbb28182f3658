use crate::config::{LayoutProfile, load_config};
use crate::ir::{FamilyData, PersonId};
use crate::layout::compute_layout;
use crate::layout_dump::{LayoutDump, write_layout_dump};
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(name = "famtree", version, about = "Family tree card layout in Rust")]
pub struct Args {
    /// Dataset file (JSON with `people` and `edges`) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file. Defaults to stdout if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "json")]
    pub output_format: OutputFormat,

    /// Config JSON file (profile plus layout options)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Root person id, overrides the config file
    #[arg(short = 'r', long = "root")]
    pub root: Option<PersonId>,

    /// Spacing profile, overrides the config file
    #[arg(short = 'p', long = "profile", value_enum)]
    pub profile: Option<ProfileArg>,

    /// Drop edges that name unknown people instead of failing
    #[arg(long = "lenient")]
    pub lenient: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum OutputFormat {
    Json,
    Text,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum ProfileArg {
    Compact,
    Spacious,
}

impl From<ProfileArg> for LayoutProfile {
    fn from(value: ProfileArg) -> Self {
        match value {
            ProfileArg::Compact => LayoutProfile::Compact,
            ProfileArg::Spacious => LayoutProfile::Spacious,
        }
    }
}

pub fn run() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    let mut config = load_config(args.config.as_deref())?;
    if let Some(profile) = args.profile {
        config.profile = profile.into();
        config.layout.set_profile(config.profile);
    }
    if let Some(root) = args.root {
        config.layout.root_id = Some(root);
    }
    if args.lenient {
        config.layout.fail_on_unknown_ids = false;
    }

    let input = read_input(args.input.as_deref())?;
    let data = parse_family(&input)?;
    tracing::info!(
        people = data.people.len(),
        edges = data.edges.len(),
        profile = ?config.profile,
        "laying out family"
    );
    let nodes = compute_layout(&data.people, &data.edges, &config.layout)
        .context("family layout failed")?;

    match args.output_format {
        OutputFormat::Json => write_layout_dump(args.output.as_deref(), &nodes, &config.layout)?,
        OutputFormat::Text => {
            let text = LayoutDump::from_layout(&nodes, &config.layout).to_text();
            match args.output.as_deref() {
                Some(path) => std::fs::write(path, text)
                    .with_context(|| format!("writing {}", path.display()))?,
                None => print!("{text}"),
            }
        }
    }
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("FAMTREE_LOG")
        .unwrap_or_else(|_| EnvFilter::new("famtree_layout=info,warn"));
    // A second init (e.g. from a test harness) is harmless.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(io::stderr))
        .try_init();
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path
        && path != Path::new("-")
    {
        return std::fs::read_to_string(path)
            .with_context(|| format!("reading dataset {}", path.display()));
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

/// Strict JSON first; hand-written files with comments or trailing commas
/// fall back to JSON5.
fn parse_family(input: &str) -> Result<FamilyData> {
    match serde_json::from_str::<FamilyData>(input) {
        Ok(data) => Ok(data),
        Err(json_err) => json5::from_str::<FamilyData>(input)
            .map_err(|_| json_err)
            .context("dataset is neither JSON nor JSON5 with `people` and `edges`"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::Edge;

    #[test]
    fn parses_strict_json() {
        let data = parse_family(
            r#"{"people":[{"id":1,"firstName":"A","lastName":"B"}],"edges":[{"type":"parent","parent":1,"child":2}]}"#,
        )
        .unwrap();
        assert_eq!(data.people.len(), 1);
        assert_eq!(data.edges, vec![Edge::parent(1, 2)]);
    }

    #[test]
    fn falls_back_to_json5() {
        let input = r#"
{
  // hand-edited
  people: [{ id: 1, firstName: 'A', lastName: 'B', },],
  edges: [],
}
"#;
        let data = parse_family(input).unwrap();
        assert_eq!(data.people[0].first_name, "A");
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_family("people: ]").is_err());
    }
}
