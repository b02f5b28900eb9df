use anyhow::Result;
use cdctl::config::Config;
use cdctl::director::api::DirectorApi;
use cdctl::director::inventory::Inventory;
use cdctl::error::Error;
use cdctl::gcp::auth::GcpCredentials;
use cdctl::ssh::{self, SshTarget};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing::Level;

/// Command-line client for Cluster Director
#[derive(Parser, Debug)]
#[command(name = "cdctl", version = cdctl::VERSION, about, long_about = None)]
struct Args {
    /// GCP project to use
    #[arg(short, long)]
    project: Option<String>,

    /// Region to scope the operation to (defaults to all supported regions)
    #[arg(short, long)]
    region: Option<String>,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off")]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the regions the control plane supports for this project
    Regions,
    /// List clusters across all supported regions
    List {
        /// Re-query every region instead of serving cached entries
        #[arg(long)]
        force: bool,
    },
    /// Show the full record of one cluster
    Describe {
        /// Cluster name
        name: String,
    },
    /// Run a Slurm status command on the cluster's login node
    State {
        /// Cluster name
        name: String,
        /// Command to run on the login node
        #[arg(long, default_value = "sinfo")]
        command: String,
    },
    /// Show or change stored defaults
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Print the stored defaults
    Show,
    /// Store a default project
    SetProject { project_id: String },
    /// Store a default region
    SetRegion { region: String },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

fn setup_logging(level: LogLevel) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let tracing_level = level.to_tracing_level()?;

    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .expect("Failed to open log file");

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("cdctl started with log level: {:?}", level);

    Some(guard)
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("cdctl").join("cdctl.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".cdctl").join("cdctl.log");
    }
    PathBuf::from("cdctl.log")
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let _log_guard = setup_logging(args.log_level);

    let mut config = Config::load();

    // Config edits need neither a project nor credentials.
    if let Command::Config { action } = &args.command {
        return cmd_config(&mut config, action);
    }

    let Some(project) = args.project.clone().or_else(|| config.effective_project()) else {
        anyhow::bail!(
            "No GCP project configured. Set GOOGLE_CLOUD_PROJECT or use --project"
        );
    };
    let region_hint = args.region.clone().or_else(|| config.effective_region());

    tracing::info!("using project: {}", project);

    let credentials = GcpCredentials::new().await?;
    let api = DirectorApi::new(credentials)?;
    let inventory = Inventory::new(api.clone());

    let result = match &args.command {
        Command::Regions => cmd_regions(&inventory, &project).await,
        Command::List { force } => cmd_list(&inventory, &project, *force).await,
        Command::Describe { name } => {
            cmd_describe(&api, &inventory, &project, name, region_hint.as_deref()).await
        }
        Command::State { name, command } => {
            cmd_state(&inventory, &project, name, region_hint.as_deref(), command).await
        }
        Command::Config { .. } => unreachable!("handled before client setup"),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e.user_message());
        std::process::exit(1);
    }

    Ok(())
}

async fn cmd_regions(inventory: &Inventory, project: &str) -> Result<(), Error> {
    let regions = inventory.regions(project).await?;
    for region in regions {
        println!("{region}");
    }
    Ok(())
}

async fn cmd_list(inventory: &Inventory, project: &str, force: bool) -> Result<(), Error> {
    let all = inventory.list_all(project, force).await?;

    if all.is_empty() {
        println!("No clusters found in project {project}");
        return Ok(());
    }

    println!("{:<24} {:<16} {:<20} {}", "NAME", "REGION", "ZONE", "CREATED");
    for (region, cluster) in all {
        println!(
            "{:<24} {:<16} {:<20} {}",
            cluster.short_name(),
            region,
            cluster.first_compute_zone().unwrap_or("-"),
            &cluster.create_time
        );
    }
    Ok(())
}

async fn cmd_describe(
    api: &DirectorApi,
    inventory: &Inventory,
    project: &str,
    name: &str,
    region_hint: Option<&str>,
) -> Result<(), Error> {
    // With a known region the single-cluster endpoint answers directly;
    // otherwise resolve through the inventory.
    let cluster = match region_hint {
        Some(region) => match api.get_cluster(project, region, name).await {
            Ok(cluster) => cluster,
            Err(Error::BadStatus(status)) if status.as_u16() == 404 => {
                return Err(Error::NotFound(name.to_string()));
            }
            Err(e) => return Err(e),
        },
        None => inventory.resolve(name, None, project).await?.cluster,
    };

    println!("{}", serde_json::to_string_pretty(&cluster)?);
    Ok(())
}

fn cmd_config(config: &mut Config, action: &ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => {
            println!("project: {}", config.project_id.as_deref().unwrap_or("-"));
            println!("region:  {}", config.region.as_deref().unwrap_or("-"));
        }
        ConfigAction::SetProject { project_id } => {
            config.set_project(project_id)?;
            println!("Default project set to {project_id}");
        }
        ConfigAction::SetRegion { region } => {
            config.set_region(region)?;
            println!("Default region set to {region}");
        }
    }
    Ok(())
}

async fn cmd_state(
    inventory: &Inventory,
    project: &str,
    name: &str,
    region_hint: Option<&str>,
    command: &str,
) -> Result<(), Error> {
    let resolved = inventory.resolve(name, region_hint, project).await?;

    let Some(zone) = resolved.zone() else {
        return Err(Error::NotConfigured(format!(
            "cluster {name} has no compute resource requests; cannot pick a zone"
        )));
    };

    let target = SshTarget::new(&resolved.cluster.login_node_hostname(), project, zone);
    let output = ssh::run_command(&target, command).await?;
    println!("{output}");
    Ok(())
}
