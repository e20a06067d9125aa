//! FarmFlow dashboard - command line host

use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use shared::{
    render_advisory, render_error, render_outcome, FertilizerForm, PlantWateringForm,
    PredictionResult, PredictionError, RenderBlock, Session, User, YieldForm,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use farmflow_client::{services::VerifiedSession, Config, Dashboard};

#[derive(Parser)]
#[command(name = "farmflow", version, about = "FarmFlow farm decision-support dashboard")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Manage the locally stored session
    Session {
        #[command(subcommand)]
        action: SessionCommand,
    },
    /// Sign out and clear the local session
    Logout,
    /// Ranked crop recommendations for the signed-in farmer
    Crops,
    /// Fertilizer recommendation; omitted values come from the profile
    Fertilizer(FertilizerArgs),
    /// Crop types accepted by the fertilizer model
    FertilizerCrops,
    /// Plant watering recommendation using live weather
    Watering(WateringArgs),
    /// Yield estimate for a planted area
    Yield(YieldArgs),
    /// Show the weather context the watering form would use
    Weather(LocationArgs),
}

#[derive(Subcommand)]
enum SessionCommand {
    /// Store a token and user record obtained from sign-in
    Set {
        #[arg(long)]
        token: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
    },
    /// Print the stored user
    Show,
}

#[derive(Args)]
struct FertilizerArgs {
    #[arg(long)]
    crop_type: Option<String>,
    #[arg(long)]
    moisture: Option<String>,
    #[arg(long)]
    nitrogen: Option<String>,
    #[arg(long)]
    potassium: Option<String>,
    #[arg(long)]
    phosphorous: Option<String>,
}

#[derive(Args)]
struct LocationArgs {
    /// Device latitude; overrides configuration
    #[arg(long, requires = "lon", allow_hyphen_values = true)]
    lat: Option<Decimal>,
    /// Device longitude; overrides configuration
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    lon: Option<Decimal>,
}

#[derive(Args)]
struct WateringArgs {
    #[arg(long, default_value = "Rice")]
    crop_type: String,
    #[arg(long, default_value = "Loamy")]
    soil_type: String,
    #[arg(long, default_value = "Temperate")]
    region: String,
    /// Local date-time of the last watering, e.g. 2024-06-01T07:30
    #[arg(long)]
    last_watering: String,
    #[command(flatten)]
    location: LocationArgs,
}

#[derive(Args)]
struct YieldArgs {
    #[arg(long)]
    area: String,
    #[arg(long)]
    state: String,
    #[arg(long)]
    district: String,
    #[arg(long)]
    season: String,
    #[arg(long)]
    crop: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "farmflow=info,farmflow_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut config = Config::load()?;
    tracing::debug!("Environment: {}", config.environment);
    if let Command::Watering(WateringArgs { location, .. }) | Command::Weather(location) = &cli.command {
        if let (Some(lat), Some(lon)) = (location.lat, location.lon) {
            config.geolocation.latitude = Some(lat);
            config.geolocation.longitude = Some(lon);
        }
    }

    let dashboard = Dashboard::from_config(config)?;
    run(&dashboard, cli.command).await
}

async fn run(dashboard: &Dashboard, command: Command) -> anyhow::Result<ExitCode> {
    match command {
        Command::Session { action } => match action {
            SessionCommand::Set { token, name, email } => {
                dashboard.store.save(&Session::new(token, User::new(name, email)))?;
                println!("Session stored");
                Ok(ExitCode::SUCCESS)
            }
            SessionCommand::Show => match dashboard.store.load() {
                Some(session) => {
                    println!("{} <{}>", session.user.name, session.user.email);
                    Ok(ExitCode::SUCCESS)
                }
                None => {
                    println!("No session stored");
                    Ok(ExitCode::FAILURE)
                }
            },
        },
        Command::Logout => {
            let route = dashboard.guard.logout().await;
            println!("Signed out. Redirecting to {}", route.path());
            Ok(ExitCode::SUCCESS)
        }
        Command::FertilizerCrops => {
            let catalog = dashboard.orchestrator.crop_catalog().await;
            println!("{}", catalog.crops().join(", "));
            Ok(ExitCode::SUCCESS)
        }
        Command::Weather(_) => {
            let context = dashboard.context.acquire_weather().await;
            let weather = &context.weather;
            println!(
                "{}: {}°C, {} ({}), humidity {}%",
                weather.location_label,
                weather.temperature,
                weather.condition,
                weather.description,
                weather.humidity
            );
            if let Some(advisory) = context.advisory {
                println!("{}", render_advisory(advisory));
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Crops => {
            let Some(verified) = verify(dashboard).await else {
                return Ok(redirected());
            };
            let outcome = dashboard.orchestrator.predict_crops(&verified.session).await;
            Ok(present(outcome))
        }
        Command::Fertilizer(args) => {
            let Some(verified) = verify(dashboard).await else {
                return Ok(redirected());
            };
            let mut form = FertilizerForm::prefilled(&verified.defaults);
            let overrides = [
                (&mut form.crop_type, args.crop_type),
                (&mut form.moisture, args.moisture),
                (&mut form.nitrogen, args.nitrogen),
                (&mut form.potassium, args.potassium),
                (&mut form.phosphorous, args.phosphorous),
            ];
            for (field, value) in overrides {
                if let Some(value) = value {
                    *field = value;
                }
            }
            let outcome = dashboard
                .orchestrator
                .predict_fertilizer(&verified.session, &form)
                .await;
            Ok(present(outcome))
        }
        Command::Watering(args) => {
            let Some(verified) = verify(dashboard).await else {
                return Ok(redirected());
            };
            let context = dashboard.context.acquire_weather().await;
            if let Some(advisory) = context.advisory {
                println!("{}", render_advisory(advisory));
            }
            let form = PlantWateringForm {
                crop_type: args.crop_type,
                soil_type: args.soil_type,
                region: args.region,
                last_watering: args.last_watering,
            };
            let outcome = dashboard
                .orchestrator
                .predict_watering(&verified.session, &form, &context.weather)
                .await;
            Ok(present(outcome))
        }
        Command::Yield(args) => {
            let Some(verified) = verify(dashboard).await else {
                return Ok(redirected());
            };
            let form = YieldForm {
                area: args.area,
                state_name: args.state,
                district_name: args.district,
                season: args.season,
                crop: args.crop,
            };
            let outcome = dashboard
                .orchestrator
                .estimate_yield(&verified.session, &form)
                .await;
            Ok(present(outcome))
        }
    }
}

/// Run the session guard; on failure print the redirect
async fn verify(dashboard: &Dashboard) -> Option<VerifiedSession> {
    match dashboard.guard.verify_session().await {
        Ok(verified) => {
            println!("Welcome, {}", verified.session.user.name);
            Some(verified)
        }
        Err(e) => {
            println!("{}", render_error(&PredictionError::from(e)));
            None
        }
    }
}

fn redirected() -> ExitCode {
    ExitCode::from(2)
}

fn present(outcome: Result<PredictionResult, PredictionError>) -> ExitCode {
    let block = render_outcome(&outcome);
    println!("{}", block);
    match block {
        RenderBlock::Redirect { .. } => redirected(),
        _ if outcome.is_err() => ExitCode::FAILURE,
        _ => ExitCode::SUCCESS,
    }
}
