mod cli;

use hiera_audit::catalog::{self, Catalog};
use hiera_audit::codec::SerdeYaml;
use hiera_audit::config::Config;
use hiera_audit::generate::Existing;
use hiera_audit::hierarchy::Hierarchy;
use hiera_audit::pattern::MatcherSet;
use hiera_audit::present::{self, Format, Selection};
use hiera_audit::scan;
use std::path::Path;

fn main() {
    use clap::Parser;
    let cli = cli::Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(tracing::level_filters::LevelFilter::WARN.into())
                .with_env_var("HIERA_AUDIT_LOG")
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();

    for new_path in cli.directory.iter() {
        match new_path.canonicalize() {
            Err(e) => {
                eprintln!(
                    "Failed to resolve path for -C/--directory {}\n{}",
                    new_path.display(),
                    e
                );
                std::process::exit(1);
            }
            Ok(cwd) => {
                if let Err(err) = std::env::set_current_dir(&cwd) {
                    eprintln!("Failed to set work directory to {}\n{}", cwd.display(), err,);
                    std::process::exit(1);
                }

                tracing::info!(directory=%cwd.display(), "Changed working directory");
            }
        }
    }

    let command_result = load_config(cli.config.as_deref()).and_then(|config| match cli.command {
        cli::Command::Read(read_cli) => read(read_cli, &config),
        cli::Command::Generate(generate_cli) => generate(generate_cli, &config),
        cli::Command::Dev(dev_cli) => dev(dev_cli, &config),
    });

    if let Err(e) = command_result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    Ok(match path {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    })
}

fn load_matchers(path: &Path, config: &Config) -> anyhow::Result<MatcherSet> {
    let hierarchy = Hierarchy::load(path, &config.hierarchy_key, &SerdeYaml)?;

    Ok(MatcherSet::compile(
        hierarchy.templates(),
        &config.extension,
        &config.substitutions,
    )?)
}

pub fn read(cli: cli::ReadCommand, config: &Config) -> anyhow::Result<()> {
    let matchers = load_matchers(&cli.hierarchy, config)?;
    let classification = scan::scan(&cli.root_path, &matchers)?;
    let build = catalog::build(&cli.root_path, &classification, &SerdeYaml)?;

    if let Some(output_file) = &cli.output_file {
        write_catalog(&build.catalog, &matchers, output_file, cli.output.format.into())?;
        println!("File generated at {}", output_file.display());
        return Ok(());
    }

    let selection = match &cli.key {
        Some(key) => Selection::Key(key),
        None => Selection::All,
    };

    let rendered = present::render(
        &build.catalog,
        &matchers,
        selection,
        cli.output.format.into(),
        &SerdeYaml,
    )?;
    print!("{rendered}");

    Ok(())
}

fn write_catalog(
    catalog: &Catalog,
    matchers: &MatcherSet,
    path: &Path,
    format: Format,
) -> anyhow::Result<()> {
    use hiera_audit::codec::YamlCodec;

    let document = catalog.to_document(matchers);
    let text = match format {
        Format::Yaml => SerdeYaml.dump(&document)?,
        Format::Json => present::to_json(&document)?,
    };

    std::fs::write(path, text).map_err(|e| hiera_audit::Error::Filesystem {
        path: path.to_owned(),
        source: e,
    })?;

    Ok(())
}

pub fn generate(cli: cli::GenerateCommand, config: &Config) -> anyhow::Result<()> {
    let catalog = Catalog::load(&cli.input, &SerdeYaml)?;

    let existing = if cli.strict || (config.strict && !cli.yes) {
        Existing::Refuse
    } else {
        Existing::Ask
    };

    let yes = cli.yes;
    let mut confirm = |root: &Path| yes || prompt_overwrite(root);

    hiera_audit::generate::generate(&catalog, &cli.root_path, existing, &mut confirm, &SerdeYaml)?;
    println!("Generated hierarchy at {}", cli.root_path.display());

    Ok(())
}

fn prompt_overwrite(root: &Path) -> bool {
    use std::io::Write;

    eprint!(
        "{}: Path already exists, continue and overwrite existing files? [Y|N] ",
        root.display()
    );
    let _ = std::io::stderr().flush();

    let mut answer = String::new();
    match std::io::stdin().read_line(&mut answer) {
        Ok(_) => answer.trim().eq_ignore_ascii_case("y"),
        Err(_) => false,
    }
}

/// (hiera-audit-)developer utilities
///
/// A quick way to expose internal structures for debugging purposes
pub fn dev(cli: cli::DevCommand, config: &Config) -> anyhow::Result<()> {
    use cli::DevSubCommand::*;

    match cli.command {
        Matchers { hierarchy } => {
            let matchers = load_matchers(&hierarchy, config)?;
            for matcher in matchers.iter() {
                println!("{}\t{}\t{}", matcher.rank, matcher.template, matcher.regex);
            }
        }
        Buckets {
            hierarchy,
            root_path,
        } => {
            let matchers = load_matchers(&hierarchy, config)?;
            let classification = scan::scan(&root_path, &matchers)?;
            println!("{classification:#?}");
        }
    }

    Ok(())
}
