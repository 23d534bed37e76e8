use anyhow::{Context, Result};
use clap::Parser;
use log::warn;
use std::path::PathBuf;

use repoview::application::{Config, DEFAULT_RECENTS, Filters, GenerateAction};
use repoview::query::DnfQuery;
use repoview::render::{RenderOptions, Renderer, SiteWriter};
use repoview::runtime::RealRuntime;

/// repoview - browsable HTML pages for dnf repositories
///
/// Queries a repository through dnf and generates a static HTML view of its
/// packages and groups. Each run is stateless: the whole site is rebuilt
/// from the repository's current metadata.
///
/// Examples:
///   repoview baseos                          # generate ./repoview for repo "baseos"
///   repoview --title "My Repo" -o site epel  # custom title and output dir
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Repository id as configured in yum.repos.d
    #[arg(value_name = "REPO_ID")]
    repo_id: String,

    /// Title shown on the generated index page
    #[arg(long, default_value = "Repository Packages")]
    title: String,

    /// URL the index page title links to
    #[arg(long, default_value = "https://github.com/rpm-software-management/dnf", value_name = "URL")]
    link: String,

    /// Description shown under the index page title
    #[arg(
        long,
        default_value = "Package, group, and general repository information",
        value_name = "TEXT"
    )]
    description: String,

    /// How many packages to list under "Latest packages" on the index page
    #[arg(long, default_value_t = DEFAULT_RECENTS, value_name = "N")]
    recents: usize,

    /// Output directory (recreated on every run)
    #[arg(long = "output-dir", short = 'o', default_value = "repoview", value_name = "PATH")]
    output_dir: PathBuf,

    /// Directory with *.html.tera templates overriding the built-in set
    #[arg(long = "template-dir", value_name = "PATH")]
    template_dir: Option<PathBuf>,

    /// Alternate dnf configuration file
    #[arg(long, value_name = "PATH")]
    config: Option<String>,

    /// Only include these architectures (repeatable)
    #[arg(long = "arch", value_name = "ARCH")]
    arches: Vec<String>,

    /// Exclude these architectures (repeatable)
    #[arg(long = "exclude-arch", value_name = "ARCH")]
    exclude_arches: Vec<String>,

    /// Only include these group ids (repeatable)
    #[arg(long = "group", value_name = "ID")]
    groups: Vec<String>,

    /// Exclude these group ids (repeatable)
    #[arg(long = "exclude-group", value_name = "ID")]
    exclude_groups: Vec<String>,

    /// Suppress the final summary line
    #[arg(long, short)]
    quiet: bool,

    /// dnf executable to use (also via REPOVIEW_DNF)
    #[arg(long, default_value = "dnf", env = "REPOVIEW_DNF", value_name = "BIN")]
    dnf: String,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let query = DnfQuery::with_binary(&cli.dnf).config(cli.config.clone());
    let config = Config {
        repo_id: cli.repo_id.clone(),
        title: cli.title.clone(),
        filters: Filters {
            arches: cli.arches.clone(),
            exclude_arches: cli.exclude_arches.clone(),
            groups: cli.groups.clone(),
            exclude_groups: cli.exclude_groups.clone(),
        },
        recents: cli.recents,
    };

    let (site, warnings) = GenerateAction::new(&query)
        .run(&config)
        .with_context(|| format!("Failed to build site model for '{}'", cli.repo_id))?;
    for warning in &warnings {
        warn!("{warning}");
    }

    let runtime = RealRuntime;
    let renderer = match &cli.template_dir {
        Some(dir) => Renderer::from_dir(&runtime, dir)?,
        None => Renderer::embedded()?,
    };
    let options = RenderOptions {
        link: cli.link.clone(),
        description: cli.description.clone(),
    };
    let pages = renderer.render_site(&site, &options)?;

    let writer = SiteWriter::new(&runtime, cli.output_dir.clone());
    writer.write_site(&pages)?;
    if let Some(dir) = &cli.template_dir {
        writer.copy_layout(dir)?;
    }

    if !cli.quiet {
        println!(
            "{}: {} packages, {} groups, {} pages -> {}",
            site.repo_id,
            site.package_count,
            site.group_count,
            pages.len(),
            cli.output_dir.display()
        );
    }
    Ok(())
}
