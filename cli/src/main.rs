use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use clientgen_core::{
    Api, ModelGenerator, TargetKind, prepare_resources, run, validate_patch,
};
use clientgen_io::{
    GeneratorConfig, OutputFormat, apply_patch_file, dump_resources, load_api, load_patch,
    render_bundle, stamp, write_bundle,
};
use tracing::warn;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

const DEFAULT_LOG_FILTER: &str = "clientgen=info,clientgen_core=info,clientgen_io=info";

/// CLI-specific target enum with clap argument parsing support.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliTarget {
    Angular,
    AngularV2,
    VuePluginAxios,
    FlutterDio,
}

impl From<CliTarget> for TargetKind {
    fn from(target: CliTarget) -> Self {
        match target {
            CliTarget::Angular => Self::Angular,
            CliTarget::AngularV2 => Self::AngularV2,
            CliTarget::VuePluginAxios => Self::VuePluginAxios,
            CliTarget::FlutterDio => Self::FlutterDio,
        }
    }
}

/// CLI-specific output format enum with clap argument parsing support.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliOutputFormat {
    Json,
    Yaml,
}

impl From<CliOutputFormat> for OutputFormat {
    fn from(fmt: CliOutputFormat) -> Self {
        match fmt {
            CliOutputFormat::Json => Self::Json,
            CliOutputFormat::Yaml => Self::Yaml,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "clientgen")]
#[command(about = "Resolve API documentation into per-target client models")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Resolve a resource graph into a model bundle for one target.
    Generate(GenerateArgs),
    /// Validate a resource graph and, optionally, a patch document.
    Validate(ValidateArgs),
    /// List the built-in targets.
    Targets,
}

#[derive(Debug, Args)]
struct GenerateArgs {
    /// Resource graph JSON file.
    input: PathBuf,
    /// YAML configuration file; flags override its values.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Target client platform (default: angular).
    #[arg(long, short)]
    target: Option<CliTarget>,
    /// Entrypoint overriding the one in the input file.
    #[arg(long)]
    entrypoint: Option<String>,
    /// Only generate the resource with this name or title.
    #[arg(long, short)]
    resource: Option<String>,
    /// Prefix prepended to resource titles.
    #[arg(long)]
    resource_prefix: Option<String>,
    /// Patch document merged before generation.
    #[arg(long)]
    patch_schema: Option<PathBuf>,
    /// Write the filtered resources to this file and stop.
    #[arg(long)]
    dump_schema: Option<PathBuf>,
    /// Output file for the model bundle (default: stdout).
    #[arg(long, short)]
    output: Option<PathBuf>,
    /// Output format (default: guessed from --output, else json).
    #[arg(long)]
    format: Option<CliOutputFormat>,
}

#[derive(Debug, Args)]
struct ValidateArgs {
    /// Resource graph JSON file.
    input: PathBuf,
    /// Entrypoint overriding the one in the input file.
    #[arg(long)]
    entrypoint: Option<String>,
    /// Patch document to check against the resource graph.
    #[arg(long)]
    patch_schema: Option<PathBuf>,
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Generate(args) => run_generate(args),
        Command::Validate(args) => run_validate(args),
        Command::Targets => run_targets(),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    if tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .is_err()
    {
        eprintln!("Warning: tracing subscriber already initialized");
    }
}

fn run_generate(args: GenerateArgs) -> Result<(), String> {
    let config = build_config(&args)?;

    let mut api = load_api_file(&args.input, config.entrypoint.as_deref())?;
    if let Some(patch) = &config.patch_schema {
        apply_patch_file(&mut api, patch)
            .map_err(|err| format!("Failed to apply patch '{}': {err}", patch.display()))?;
    }

    let selection = config.selection();
    if let Some(dump) = &config.dump_schema {
        let resources = prepare_resources(&api, &selection);
        ensure_parent_dir(dump)?;
        dump_resources(&resources, dump)
            .map_err(|err| format!("Failed to write '{}': {err}", dump.display()))?;
        eprintln!(
            "Dumped {} resource(s) to '{}'.",
            resources.len(),
            dump.display()
        );
        return Ok(());
    }

    let mut generator = ModelGenerator::new(config.target);
    let outcome = match run(&api, &selection, &mut generator) {
        Ok(outcome) => outcome,
        Err(never) => match never {},
    };
    if outcome.processed.is_empty() {
        match &selection.resource {
            Some(resource) => return Err(format!("No resource matches '{resource}'.")),
            None => warn!("No resources to generate"),
        }
    }

    let mut bundle = generator.into_bundle();
    let format = config.output_format();
    match &config.output {
        Some(path) => {
            ensure_parent_dir(path)?;
            write_bundle(&mut bundle, path, format)
                .map_err(|err| format!("Failed to write '{}': {err}", path.display()))?;
            eprintln!(
                "Resolved {} resource(s) for {} into '{}'.",
                bundle.resources.len(),
                config.target,
                path.display()
            );
        }
        None => {
            stamp(&mut bundle);
            let text = render_bundle(&bundle, format)
                .map_err(|err| format!("Failed to serialize model bundle: {err}"))?;
            print!("{text}");
        }
    }

    Ok(())
}

fn run_validate(args: ValidateArgs) -> Result<(), String> {
    // Loading already rejects a structurally invalid graph.
    let api = load_api_file(&args.input, args.entrypoint.as_deref())?;

    let mut errors: Vec<String> = Vec::new();
    if let Some(path) = &args.patch_schema {
        let patch = load_patch(path)
            .map_err(|err| format!("Failed to load patch '{}': {err}", path.display()))?;
        errors.extend(
            validate_patch(&patch, &api.entrypoint)
                .iter()
                .map(ToString::to_string),
        );
    }

    if !errors.is_empty() {
        return Err(format!(
            "{} validation error(s):\n  {}",
            errors.len(),
            errors.join("\n  ")
        ));
    }

    println!(
        "Validated {} resource(s) at '{}'.",
        api.resources.len(),
        api.entrypoint
    );
    Ok(())
}

fn run_targets() -> Result<(), String> {
    for kind in TargetKind::ALL {
        let target = kind.descriptor();
        let modes: Vec<String> = target
            .modes
            .iter()
            .map(|m| format!("{m:?}").to_lowercase())
            .collect();
        println!(
            "{:<18} {} [{}]",
            kind.as_str(),
            target.summary,
            modes.join(", ")
        );
    }
    Ok(())
}

/// Merges the optional config file with command-line overrides.
fn build_config(args: &GenerateArgs) -> Result<GeneratorConfig, String> {
    let mut config = match &args.config {
        Some(path) => GeneratorConfig::load(path)
            .map_err(|err| format!("Failed to load config '{}': {err}", path.display()))?,
        None => GeneratorConfig::default(),
    };

    if let Some(target) = args.target {
        config.target = target.into();
    }
    override_with(&mut config.entrypoint, &args.entrypoint);
    override_with(&mut config.resource, &args.resource);
    override_with(&mut config.resource_prefix, &args.resource_prefix);
    override_with(&mut config.patch_schema, &args.patch_schema);
    override_with(&mut config.dump_schema, &args.dump_schema);
    override_with(&mut config.output, &args.output);
    if let Some(format) = args.format {
        config.format = Some(format.into());
    }

    Ok(config)
}

fn override_with<T: Clone>(slot: &mut Option<T>, value: &Option<T>) {
    if value.is_some() {
        slot.clone_from(value);
    }
}

fn load_api_file(path: &Path, entrypoint: Option<&str>) -> Result<Api, String> {
    load_api(path, entrypoint).map_err(|err| format!("Failed to load '{}': {err}", path.display()))
}

fn ensure_parent_dir(path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|err| {
                format!(
                    "Failed to create output directory '{}': {err}",
                    parent.display()
                )
            })?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(input: &str) -> GenerateArgs {
        GenerateArgs {
            input: PathBuf::from(input),
            config: None,
            target: None,
            entrypoint: None,
            resource: None,
            resource_prefix: None,
            patch_schema: None,
            dump_schema: None,
            output: None,
            format: None,
        }
    }

    #[test]
    fn test_override_with_keeps_existing_when_absent() {
        let mut slot = Some("books".to_string());
        override_with(&mut slot, &None);
        assert_eq!(slot.as_deref(), Some("books"));

        override_with(&mut slot, &Some("people".to_string()));
        assert_eq!(slot.as_deref(), Some("people"));
    }

    #[test]
    fn test_build_config_without_file_uses_flags() {
        let mut generate = args("api.json");
        generate.target = Some(CliTarget::FlutterDio);
        generate.output = Some(PathBuf::from("out/model.yaml"));

        let config = build_config(&generate).unwrap();
        assert_eq!(config.target, TargetKind::FlutterDio);
        assert_eq!(config.output_format(), OutputFormat::Yaml);
        assert!(config.resource.is_none());
    }

    #[test]
    fn test_cli_target_covers_every_kind() {
        let kinds: Vec<TargetKind> = [
            CliTarget::Angular,
            CliTarget::AngularV2,
            CliTarget::VuePluginAxios,
            CliTarget::FlutterDio,
        ]
        .into_iter()
        .map(Into::into)
        .collect();
        assert_eq!(kinds, TargetKind::ALL);
    }
}
