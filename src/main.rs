//! Command-line interface for the modbadge binary.
//!
//! `resolve` prints the badge plan for a repository without touching the
//! network, `publish` renders and uploads the badges, and `colour` shows the
//! colour assigned to an identifier.

use std::{
    io,
    path::{Path, PathBuf},
    process,
};

use clap::{ArgAction, Args, Parser, Subcommand};
use modbadge::{
    BadgeConfig, BadgePlan, Error, GitHubRelease, ModuleGroups, Settings, ShieldsClient,
    colour_for, list_tags, load_module_prefixes, plan_badges, publish_badges,
};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Command line interface for publishing per-module version badges.
#[derive(Debug, Parser,)]
#[command(name = "modbadge", version, about = "Publish per-module version badges")]
struct Cli
{
    #[command(subcommand)]
    command: Command,

    /// Enable debug logging regardless of RUST_LOG.
    #[arg(long = "verbose", short = 'v', global = true, action = ArgAction::SetTrue)]
    verbose: bool,
}

#[derive(Debug, Subcommand,)]
/// Supported commands exposed by the CLI.
enum Command
{
    /// Print the badge plan for every module in the README table as JSON.
    Resolve(ResolveArgs,),
    /// Render every badge and replace the matching release assets.
    Publish(PublishArgs,),
    /// Print the colour assigned to an identifier.
    Colour(ColourArgs,),
}

/// Options shared by commands that read a repository.
#[derive(Debug, Args, Default,)]
struct SourceArgs
{
    /// Optional YAML configuration file; flags override its values.
    #[arg(long = "config", value_name = "PATH")]
    config: Option<PathBuf,>,

    /// Repository whose tags are listed.
    #[arg(long = "repo", value_name = "DIR", default_value = ".")]
    repo: PathBuf,

    /// Owner of the repository hosting the badges release.
    #[arg(long = "owner", env = "MODBADGE_OWNER")]
    owner: Option<String,>,

    /// Repository hosting the badges release.
    #[arg(long = "repository", env = "MODBADGE_REPOSITORY")]
    repository: Option<String,>,

    /// Tag of the badges release.
    #[arg(long = "release-tag", value_name = "TAG")]
    release_tag: Option<String,>,

    /// Module path used as colour namespace.
    #[arg(long = "module-path", value_name = "PATH")]
    module_path: Option<String,>,

    /// README containing the badge table, relative to --repo unless absolute.
    #[arg(long = "readme", value_name = "PATH")]
    readme: Option<PathBuf,>,

    /// Directory receiving badge images.
    #[arg(long = "output", value_name = "DIR")]
    output: Option<PathBuf,>,

    /// Badge rendering endpoint.
    #[arg(long = "endpoint", value_name = "URL")]
    endpoint: Option<String,>,

    /// Colour of the badge label.
    #[arg(long = "label-color", value_name = "COLOR")]
    label_color: Option<String,>,

    /// Badge style.
    #[arg(long = "style", value_name = "STYLE")]
    style: Option<String,>,
}

impl SourceArgs
{
    fn overrides(&self,) -> BadgeConfig
    {
        BadgeConfig {
            owner:       self.owner.clone(),
            repository:  self.repository.clone(),
            release_tag: self.release_tag.clone(),
            module_path: self.module_path.clone(),
            readme:      self.readme.clone(),
            output_dir:  self.output.clone(),
            endpoint:    self.endpoint.clone(),
            label_color: self.label_color.clone(),
            style:       self.style.clone(),
        }
    }
}

#[derive(Debug, Args,)]
struct ResolveArgs
{
    #[command(flatten)]
    source: SourceArgs,

    /// Output formatted JSON for easier inspection.
    #[arg(long = "pretty", action = ArgAction::SetTrue)]
    pretty: bool,
}

#[derive(Debug, Args,)]
struct PublishArgs
{
    #[command(flatten)]
    source: SourceArgs,

    /// GitHub token with permission to edit releases.
    #[arg(long = "token", env = "GITHUB_TOKEN", hide_env_values = true)]
    token: String,
}

#[derive(Debug, Args,)]
struct ColourArgs
{
    /// Identifier to colour, typically `<module path>/<module>`.
    identifier: String,

    /// Print identifier, hex and RGB as JSON instead of the bare hex value.
    #[arg(long = "json", action = ArgAction::SetTrue)]
    json: bool,
}

#[derive(Debug, Serialize,)]
struct ColourOutput<'a,>
{
    identifier: &'a str,
    hex:        String,
    rgb:        (u8, u8, u8,),
}

/// Entry point that reports errors and sets the appropriate exit status.
#[tokio::main]
async fn main()
{
    let cli = Cli::parse();
    init_logging(cli.verbose,);

    if let Err(error,) = run(cli.command,).await {
        eprintln!("{}", error.to_display_string());
        process::exit(1,);
    }
}

fn init_logging(verbose: bool,)
{
    let filter = if verbose {
        EnvFilter::new("debug",)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info",),)
    };

    tracing_subscriber::registry()
        .with(filter,)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr,),)
        .init();
}

/// Executes the parsed command.
///
/// # Errors
///
/// Propagates configuration, tag, README and publishing errors.
async fn run(command: Command,) -> Result<(), Error,>
{
    match command {
        Command::Resolve(args,) => run_resolve(&args,),
        Command::Publish(args,) => run_publish(&args,).await,
        Command::Colour(args,) => run_colour(&args,),
    }
}

fn load_settings(source: &SourceArgs,) -> Result<Settings, Error,>
{
    let file = match source.config.as_deref() {
        Some(path,) => BadgeConfig::load(path,)?,
        None => BadgeConfig::default(),
    };

    Settings::resolve(file.merge(source.overrides(),),)
}

fn readme_path(repo: &Path, readme: &Path,) -> PathBuf
{
    if readme.is_absolute() { readme.to_path_buf() } else { repo.join(readme,) }
}

fn resolve_plans(source: &SourceArgs, settings: &Settings,) -> Result<Vec<BadgePlan,>, Error,>
{
    let listing = list_tags(&source.repo,)?;
    let groups = ModuleGroups::from_listing(&listing,);
    let prefixes =
        load_module_prefixes(&readme_path(&source.repo, &settings.readme,), &settings.release_tag,)?;

    plan_badges(&groups, &prefixes, settings,)
}

fn run_resolve(args: &ResolveArgs,) -> Result<(), Error,>
{
    let settings = load_settings(&args.source,)?;
    let plans = resolve_plans(&args.source, &settings,)?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    write_plans(&mut handle, &plans, args.pretty,)
}

fn write_plans<W: io::Write,>(writer: &mut W, plans: &[BadgePlan], pretty: bool,) -> Result<(), Error,>
{
    if pretty {
        serde_json::to_writer_pretty(writer, plans,)?;
    } else {
        serde_json::to_writer(writer, plans,)?;
    }

    Ok((),)
}

async fn run_publish(args: &PublishArgs,) -> Result<(), Error,>
{
    if args.token.trim().is_empty() {
        return Err(Error::validation("GITHUB_TOKEN must not be empty",),);
    }

    let settings = load_settings(&args.source,)?;
    let plans = resolve_plans(&args.source, &settings,)?;

    let release = GitHubRelease::connect(
        &args.token,
        &settings.owner,
        &settings.repository,
        &settings.release_tag,
    )
    .await?;
    let shields = ShieldsClient::new()?;

    let published = publish_badges(&plans, &shields, &release, &settings.output_dir,).await?;
    info!(
        "Published {} badges to release '{}' of {}/{}",
        published.len(),
        settings.release_tag,
        settings.owner,
        settings.repository
    );

    Ok((),)
}

fn run_colour(args: &ColourArgs,) -> Result<(), Error,>
{
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    write_colour(&mut handle, args,)
}

fn write_colour<W: io::Write,>(writer: &mut W, args: &ColourArgs,) -> Result<(), Error,>
{
    let colour = colour_for(&args.identifier,);

    if args.json {
        let output = ColourOutput {
            identifier: &args.identifier,
            hex:        colour.hex(),
            rgb:        colour.rgb(),
        };
        serde_json::to_writer(&mut *writer, &output,)?;
    } else {
        write!(writer, "{colour}").map_err(|e| Error::service(format!("failed to write colour: {e}"),),)?;
    }

    writeln!(writer).map_err(|e| Error::service(format!("failed to write colour: {e}"),),)
}

#[cfg(test)]
mod tests
{
    use std::{fs, io::Cursor};

    use clap::Parser;
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn cli_parses_resolve_with_overrides()
    {
        let cli = Cli::try_parse_from([
            env!("CARGO_PKG_NAME"),
            "resolve",
            "--owner",
            "octocat",
            "--repository",
            "monorepo",
            "--release-tag",
            "badges",
            "--pretty",
        ],)
        .expect("failed to parse CLI",);

        let args = match cli.command {
            Command::Resolve(args,) => args,
            other => panic!("unexpected command variant: {other:?}"),
        };
        assert!(args.pretty);
        assert_eq!(args.source.repo, PathBuf::from("."));
        assert_eq!(args.source.release_tag.as_deref(), Some("badges"));
    }

    #[test]
    fn cli_parses_colour_and_global_verbose()
    {
        let cli = Cli::try_parse_from([env!("CARGO_PKG_NAME"), "colour", "github.com/x/y/api", "-v",],)
            .expect("failed to parse CLI",);

        assert!(cli.verbose);
        assert!(matches!(cli.command, Command::Colour(ref args) if args.identifier == "github.com/x/y/api"));
    }

    #[test]
    fn flags_override_configuration_file()
    {
        let temp = tempdir().expect("failed to create tempdir",);
        let config_path = temp.path().join("badges.yaml",);
        fs::write(&config_path, "owner: from-file\nrepository: monorepo\nstyle: flat\n",)
            .expect("failed to write config",);

        let source = SourceArgs {
            config: Some(config_path,),
            owner: Some("from-cli".to_owned(),),
            ..SourceArgs::default()
        };

        let settings = load_settings(&source,).expect("valid settings",);
        assert_eq!(settings.owner, "from-cli");
        assert_eq!(settings.repository, "monorepo");
        assert_eq!(settings.style, "flat");
    }

    #[test]
    fn missing_owner_is_a_validation_error()
    {
        let error = load_settings(&SourceArgs::default(),).expect_err("expected validation error",);
        assert!(matches!(error, Error::Validation { .. }));
    }

    #[test]
    fn readme_path_is_relative_to_repository()
    {
        assert_eq!(
            readme_path(Path::new("/work/mono",), Path::new("README.md",),),
            PathBuf::from("/work/mono/README.md")
        );
        assert_eq!(
            readme_path(Path::new("/work/mono",), Path::new("/docs/README.md",),),
            PathBuf::from("/docs/README.md")
        );
    }

    #[test]
    fn compact_writer_emits_empty_array()
    {
        let mut buffer = Cursor::new(Vec::new(),);
        write_plans(&mut buffer, &[], false,).expect("failed to serialize plans",);

        let output = String::from_utf8(buffer.into_inner(),).expect("invalid UTF-8",);
        assert_eq!(output, "[]");
    }

    #[test]
    fn colour_prints_bare_hex_by_default()
    {
        let args = ColourArgs {
            identifier: "github.com/example/mod".to_owned(),
            json:       false,
        };
        let mut buffer = Cursor::new(Vec::new(),);
        write_colour(&mut buffer, &args,).expect("failed to write colour",);

        let output = String::from_utf8(buffer.into_inner(),).expect("invalid UTF-8",);
        assert_eq!(output, format!("{}\n", colour_for("github.com/example/mod",).hex()));
    }

    #[test]
    fn colour_json_flag_emits_object()
    {
        let cli = Cli::try_parse_from([env!("CARGO_PKG_NAME"), "colour", "--json", "github.com/x/y/api",],)
            .expect("failed to parse CLI",);
        let Command::Colour(args,) = cli.command else {
            panic!("unexpected command variant");
        };

        let mut buffer = Cursor::new(Vec::new(),);
        write_colour(&mut buffer, &args,).expect("failed to write colour",);

        let value: serde_json::Value =
            serde_json::from_slice(buffer.get_ref(),).expect("valid JSON output",);
        assert_eq!(value["identifier"], "github.com/x/y/api");
        assert_eq!(value["hex"], colour_for("github.com/x/y/api",).hex());
    }

    #[tokio::test]
    async fn publish_rejects_blank_token()
    {
        let args = PublishArgs {
            source: SourceArgs::default(),
            token:  "  ".to_owned(),
        };

        let error = run_publish(&args,).await.expect_err("expected validation error",);
        match error {
            Error::Validation {
                message,
            } => assert_eq!(message, "GITHUB_TOKEN must not be empty"),
            other => panic!("unexpected error variant: {other:?}"),
        }
    }
}
