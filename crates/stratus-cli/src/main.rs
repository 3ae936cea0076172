//! `stratus` command line

use anyhow::Context;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;
use stratus_core::{SynthesisConfig, SynthesisDriver};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn cli() -> Command {
    Command::new("stratus")
        .version(stratus_core::VERSION)
        .about("Synthesize SAM template resources from annotated TypeScript classes")
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::Count)
                .help("Increase log verbosity (overridden by RUST_LOG)"),
        )
        .subcommand(
            Command::new("generate")
                .about("Scan projects and merge their resources into the template")
                .arg(
                    Arg::new("project")
                        .value_name("PROJECT_PATH")
                        .value_parser(value_parser!(PathBuf))
                        .help("Directory searched for opted-in projects [default: .]"),
                )
                .arg(
                    Arg::new("template")
                        .value_name("TEMPLATE_PATH")
                        .value_parser(value_parser!(PathBuf))
                        .help("Template to update [default: PROJECT_PATH/template.yaml]"),
                )
                .arg(
                    Arg::new("glob")
                        .value_name("SOURCE_GLOB")
                        .help("Sources to scan, relative to each project [default: src/**/*.ts]"),
                )
                .arg(
                    Arg::new("config")
                        .long("config")
                        .value_name("FILE")
                        .value_parser(value_parser!(PathBuf))
                        .help("TOML configuration file; positionals override it"),
                )
                .arg(
                    Arg::new("runtime")
                        .long("runtime")
                        .value_name("RUNTIME")
                        .help("Runtime for functions that declare none"),
                )
                .arg(
                    Arg::new("marker")
                        .long("marker")
                        .value_name("PACKAGE")
                        .help("Dependency that opts a project in"),
                )
                .arg(
                    Arg::new("no-handlers")
                        .long("no-handlers")
                        .action(ArgAction::SetTrue)
                        .help("Do not write handler stubs"),
                ),
        )
}

fn init_tracing(verbosity: u8) {
    let default = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}

/// Configuration from `--config` with command line overrides applied
fn config_from(args: &ArgMatches) -> anyhow::Result<SynthesisConfig> {
    let mut config = match args.get_one::<PathBuf>("config") {
        Some(path) => SynthesisConfig::from_toml_file(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => SynthesisConfig::new(),
    };

    if let Some(project) = args.get_one::<PathBuf>("project") {
        config = config.with_project_root(project);
    }
    if let Some(template) = args.get_one::<PathBuf>("template") {
        config = config.with_template_path(template);
    }
    if let Some(glob) = args.get_one::<String>("glob") {
        config = config.with_source_glob(glob);
    }
    if let Some(runtime) = args.get_one::<String>("runtime") {
        config = config.with_default_runtime(runtime);
    }
    if let Some(marker) = args.get_one::<String>("marker") {
        config = config.with_marker_package(marker);
    }
    if args.get_flag("no-handlers") {
        config = config.with_emit_handlers(false);
    }
    Ok(config)
}

fn generate(args: &ArgMatches) -> anyhow::Result<()> {
    let config = config_from(args)?;
    tracing::debug!("Effective configuration: {:?}", config);
    let template = config.template_path();
    let report = SynthesisDriver::new(config)
        .run()
        .with_context(|| format!("generating {}", template.display()))?;
    println!("{report}");
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let matches = cli().get_matches();
    init_tracing(matches.get_count("verbose"));

    match matches.subcommand() {
        Some(("generate", args)) => generate(args),
        _ => Ok(()),
    }
}
