//! services/app/src/bin/pawtrack.rs

use std::path::PathBuf;

use app_lib::{
    config::Config,
    error::AppError,
    viewmodels::{
        AppState, HomeViewModel, MatchViewModel, ReportField, ReportViewModel, SightingField,
        SightingViewModel,
    },
};
use clap::{Args, Parser, Subcommand, ValueEnum};
use pawtrack_core::domain::{LostReport, ReportType, SightingStatus};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "pawtrack", version, about = "Report and find lost pets")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List active lost reports
    Feed {
        /// Only show reports whose name, breed or location contains this text
        #[arg(long)]
        search: Option<String>,
        /// List sightings instead of lost reports
        #[arg(long)]
        sightings: bool,
    },
    /// List pending matches for the signed-in user
    Matches,
    /// Publish a lost (or found) pet report
    Report(ReportArgs),
    /// Publish a sighting of a loose animal
    Sighting(SightingArgs),
    /// Store the push notification token sent along with submissions
    PushToken { token: String },
}

#[derive(Args, Debug)]
struct ReportArgs {
    #[arg(long)]
    image: PathBuf,
    #[arg(long)]
    species: String,
    #[arg(long)]
    contact: String,
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    breed: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long = "type", value_enum, default_value_t = KindArg::Lost)]
    kind: KindArg,
    #[command(flatten)]
    place: PlaceArgs,
}

#[derive(Args, Debug)]
struct SightingArgs {
    #[arg(long)]
    image: PathBuf,
    #[arg(long)]
    description: Option<String>,
    #[arg(long, value_enum, default_value_t = StatusArg::OnStreet)]
    status: StatusArg,
    #[command(flatten)]
    place: PlaceArgs,
}

#[derive(Args, Debug)]
struct PlaceArgs {
    /// Where the pet was last seen
    #[arg(long, conflicts_with = "locate")]
    location: Option<String>,
    /// Resolve the location from the configured device position
    #[arg(long)]
    locate: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum KindArg {
    Lost,
    Found,
}

impl From<KindArg> for ReportType {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Lost => ReportType::Lost,
            KindArg::Found => ReportType::Found,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum StatusArg {
    OnStreet,
    InShelter,
    Reunited,
}

impl From<StatusArg> for SightingStatus {
    fn from(status: StatusArg) -> Self {
        match status {
            StatusArg::OnStreet => SightingStatus::OnStreet,
            StatusArg::InShelter => SightingStatus::InShelter,
            StatusArg::Reunited => SightingStatus::Reunited,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let cli = Cli::parse();

    // --- 1. Load Configuration & Set Up Logging ---
    let config = Config::from_env()?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
    info!(api = %config.api_base_url, "Configuration loaded");

    // --- 2. Wire the adapters and run the command ---
    match cli.command {
        Command::Feed { search, sightings } => {
            let state = AppState::from_config(&config, None)?;
            run_feed(&state, search, sightings).await
        }
        Command::Matches => {
            let state = AppState::from_config(&config, None)?;
            run_matches(&state).await
        }
        Command::Report(args) => {
            let state = AppState::from_config(&config, Some(args.image.clone()))?;
            run_report(&state, args).await
        }
        Command::Sighting(args) => {
            let state = AppState::from_config(&config, Some(args.image.clone()))?;
            run_sighting(&state, args).await
        }
        Command::PushToken { token } => {
            let state = AppState::from_config(&config, None)?;
            state.push_tokens.save_push_token(&token).await?;
            println!("Push token saved to {}", config.storage_path.display());
            Ok(())
        }
    }
}

fn print_report(report: &LostReport) {
    println!(
        "{}  {} ({}, {})  {}  {}",
        report.id,
        report.name,
        report.species.as_str(),
        report.breed,
        report.location,
        report.created_at
    );
}

async fn run_feed(
    state: &AppState,
    search: Option<String>,
    sightings: bool,
) -> Result<(), AppError> {
    if sightings {
        let items = state.feed.get_sightings().await?;
        items.iter().for_each(print_report);
        return Ok(());
    }

    let vm = HomeViewModel::new(state);
    if let Some(query) = search {
        vm.set_search_query(query);
    }
    vm.load_reports().await;
    if let Some(message) = vm.state().error {
        return Err(AppError::Rejected(message));
    }
    let visible = vm.visible_reports();
    if visible.is_empty() {
        println!("No reports found.");
    }
    visible.iter().for_each(print_report);
    Ok(())
}

async fn run_matches(state: &AppState) -> Result<(), AppError> {
    let vm = MatchViewModel::new(state);
    vm.load_matches().await;
    let current = vm.state();
    if let Some(message) = current.error {
        return Err(AppError::Rejected(message));
    }
    if current.items.is_empty() {
        println!("No pending matches.");
    }
    for m in &current.items {
        println!(
            "{}  {} ({}, {})  score {:.2}  {}  {}",
            m.match_id,
            m.pet_name,
            m.species,
            m.breed,
            m.ai_distance_score,
            m.location_text,
            m.sighting_date
        );
    }
    Ok(())
}

async fn run_report(state: &AppState, args: ReportArgs) -> Result<(), AppError> {
    let mut vm = ReportViewModel::new(state);
    vm.set_report_type(args.kind.into());
    vm.set_field(ReportField::Species(args.species));
    vm.set_field(ReportField::ContactInfo(args.contact));
    if let Some(name) = args.name {
        vm.set_field(ReportField::PetName(name));
    }
    if let Some(breed) = args.breed {
        vm.set_field(ReportField::Breed(breed));
    }
    if let Some(description) = args.description {
        vm.set_field(ReportField::Description(description));
    }
    vm.pick_image().await;
    if args.place.locate {
        vm.select_location().await;
    } else if let Some(location) = args.place.location {
        vm.set_field(ReportField::LastSeenLocation(location));
    }

    match vm.submit().await {
        Some(report_id) => {
            println!("Report published: {}", report_id);
            Ok(())
        }
        None => Err(AppError::Rejected(vm.error().unwrap_or_default())),
    }
}

async fn run_sighting(state: &AppState, args: SightingArgs) -> Result<(), AppError> {
    let mut vm = SightingViewModel::new(state);
    vm.set_field(SightingField::Status(args.status.into()));
    if let Some(description) = args.description {
        vm.set_field(SightingField::Description(description));
    }
    vm.pick_image().await;
    if args.place.locate {
        vm.select_location().await;
    } else if let Some(location) = args.place.location {
        vm.set_field(SightingField::LocationText(location));
    }

    match vm.submit().await {
        Some(created) => {
            println!("Sighting published: {}", created.sighting_id);
            if let Some(found) = created.matches_found {
                println!("Possible matches found: {}", found);
            }
            Ok(())
        }
        None => Err(AppError::Rejected(vm.error().unwrap_or_default())),
    }
}
