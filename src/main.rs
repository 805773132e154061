//! Reserva - command line client for the campus reservation services

use anyhow::{Context, Result};
use chrono::{DateTime, Local, NaiveDate, NaiveTime, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use serde_json::json;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use reserva_client::{
    config::AppConfig,
    filter::{
        datetime::{create_iso_string_from_date_time, parse_date, parse_time},
        AvailabilityQuery, Bound, Debouncer, FilterDraft, FilterField, FilterForm, WindowPolicy,
    },
    models::{
        domain::{NewHardware, NewHardwareType, NewSpace, NewSpaceType},
        enums::ResourceKind,
        reservation::{NewHardwareReservation, NewSpaceReservation, ReturnRates},
        user::RegisterUser,
    },
    services::resources::{INFO_HARDWARE_TYPES, INFO_SPACE_STATES, INFO_SPACE_TYPES},
    AppState,
};

#[derive(Parser)]
#[command(name = "reserva")]
#[command(about = "Client for the campus reservation services", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Kind {
    Hardware,
    Space,
}

impl From<Kind> for ResourceKind {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Hardware => ResourceKind::Hardware,
            Kind::Space => ResourceKind::Space,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Log in to the user service and keep the token
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "RESERVA_PASSWORD")]
        password: String,
    },
    /// Create an account
    Register {
        #[arg(long)]
        code: i64,
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "RESERVA_PASSWORD")]
        password: String,
        #[arg(long)]
        phone: Option<i64>,
        #[arg(long)]
        address: Option<String>,
    },
    /// Forget the stored token
    Logout,
    /// Show the claims of the stored token
    Whoami,
    /// Buildings and resource types
    Domains,
    /// Resources free in a time window
    Available {
        kind: Kind,
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Read resource names from stdin and search as you type
    Search {
        kind: Kind,
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Reservation history
    History {
        kind: Kind,
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Reservation details
    Detail { kind: Kind, id: i64 },
    /// Create a reservation
    Reserve {
        kind: Kind,
        #[command(flatten)]
        reservation: ReserveArgs,
    },
    /// Cancel a reservation
    Cancel { kind: Kind, id: String },
    /// Mark a reservation as handed over
    HandOver { kind: Kind, id: String },
    /// Mark a reservation as returned
    Return {
        kind: Kind,
        id: String,
        /// Condition of the returned resource, 1 to 5
        #[arg(long)]
        condition: u8,
        /// Rating of the service, 1 to 5
        #[arg(long)]
        service: u8,
    },
    /// Resources of the external TroyaDev system
    #[command(subcommand)]
    TroyaDev(TroyaDevCommands),
    /// Resource administration
    #[command(subcommand)]
    Resources(ResourceCommands),
    /// Probe the operation service
    Health,
}

#[derive(Subcommand)]
enum TroyaDevCommands {
    /// Resources without a booking in the window
    Available {
        #[arg(long, default_value = "")]
        name: String,
        /// Resource type id, 0 for any
        #[arg(long, default_value_t = 0)]
        type_id: i64,
        /// RFC 3339 timestamp
        #[arg(long)]
        start: String,
        /// RFC 3339 timestamp
        #[arg(long)]
        end: String,
    },
    /// Resource types
    Types,
}

#[derive(Clone, Copy, ValueEnum)]
enum InfoList {
    SpaceStates,
    SpaceTypes,
    HardwareTypes,
}

#[derive(Subcommand)]
enum ResourceCommands {
    /// List types or states known to the resource service
    Info { list: InfoList },
    CreateHardwareType {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    CreateSpaceType {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    CreateHardware {
        #[arg(long = "type")]
        hardware_type: String,
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        schedule: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    CreateSpace {
        #[arg(long)]
        code: i32,
        #[arg(long)]
        building: i32,
        #[arg(long = "type")]
        space_type: String,
        #[arg(long)]
        state: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        capacity: i32,
        #[arg(long, default_value = "")]
        schedule: String,
        #[arg(long, default_value = "")]
        description: String,
    },
}

#[derive(Args, Debug, Default)]
struct FilterArgs {
    /// Day of the window, YYYY-MM-DD
    #[arg(long)]
    date: Option<String>,
    /// Window start, HH:mm
    #[arg(long)]
    start: Option<String>,
    /// Window end, HH:mm
    #[arg(long)]
    end: Option<String>,
    #[arg(long)]
    name: Option<String>,
    #[arg(long = "type")]
    resource_type: Option<String>,
    #[arg(long)]
    building: Option<i32>,
    #[arg(long)]
    capacity: Option<u32>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    handed_over: Option<bool>,
    #[arg(long)]
    returned: Option<bool>,
    #[arg(long)]
    page: Option<u32>,
    #[arg(long)]
    page_size: Option<u32>,
    #[arg(long)]
    order_by: Option<String>,
    #[arg(long)]
    asc: Option<bool>,
}

impl FilterArgs {
    fn into_form(self, kind: Kind) -> Result<FilterForm<Local>> {
        let policy = match kind {
            Kind::Hardware => WindowPolicy::hardware(),
            Kind::Space => WindowPolicy::space(),
        };
        let mut form = FilterForm::new(policy, Local);

        form.update(FilterField::Email(self.email));
        form.update(FilterField::NameLike(self.name));
        form.update(FilterField::Type(self.resource_type));
        form.update(FilterField::Building(self.building));
        form.update(FilterField::Capacity(self.capacity));
        form.update(FilterField::IsHandedOver(self.handed_over));
        form.update(FilterField::IsReturned(self.returned));
        form.update(FilterField::Page(self.page));
        form.update(FilterField::PageSize(self.page_size));
        form.update(FilterField::OrderBy(self.order_by));
        form.update(FilterField::AscOrder(self.asc));

        if let Some(date) = self.date {
            form.set_date(parse_date(&date)?);
        }
        if let Some(start) = self.start {
            form.set_time(Bound::Start, parse_time(&start)?);
        }
        if let Some(end) = self.end {
            form.set_time(Bound::End, parse_time(&end)?);
        }

        form.apply();
        Ok(form)
    }
}

#[derive(Args, Debug)]
struct ReserveArgs {
    #[arg(long)]
    building: i32,
    /// Space or hardware code
    #[arg(long)]
    resource: i32,
    /// Stored hardware code, hardware reservations only
    #[arg(long)]
    stored: Option<i32>,
    /// Requester email, defaults to the logged in user
    #[arg(long)]
    requester: Option<String>,
    #[arg(long)]
    manager: String,
    /// YYYY-MM-DD
    #[arg(long)]
    date: String,
    /// HH:mm
    #[arg(long)]
    start: String,
    /// HH:mm
    #[arg(long)]
    end: String,
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn required_date(value: &str) -> Result<NaiveDate> {
    parse_date(value)?.context("A date is required")
}

fn required_time(value: &str) -> Result<NaiveTime> {
    parse_time(value)?.context("A time is required")
}

fn parse_instant(value: &str) -> Result<DateTime<Utc>> {
    let instant = DateTime::parse_from_rfc3339(value)
        .with_context(|| format!("Invalid timestamp '{}'", value))?;
    Ok(instant.with_timezone(&Utc))
}

async fn print_available(state: &AppState, kind: Kind, filters: &FilterDraft) -> Result<()> {
    match kind {
        Kind::Hardware => print_json(&state.services.hardware.available(filters).await?),
        Kind::Space => print_json(&state.services.space.available(filters).await?),
    }
}

/// Each stdin line replaces the searched name; the query runs once typing pauses
async fn search(
    state: &AppState,
    kind: Kind,
    filters: FilterArgs,
    cancel: CancellationToken,
) -> Result<()> {
    let mut form = filters.into_form(kind)?;
    let (mut debouncer, mut debounced) = Debouncer::new(state.config.filters.debounce());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut input_open = true;

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            line = lines.next_line(), if input_open => match line? {
                Some(name) => debouncer.push(name),
                None => {
                    input_open = false;
                    if !debouncer.is_pending() {
                        break;
                    }
                }
            },
            Some(name) = debounced.recv() => {
                let filters = form.search_name(name).clone();
                print_available(state, kind, &filters).await?;
                if !input_open {
                    break;
                }
            }
        }
    }
    Ok(())
}

async fn reserve(state: &AppState, kind: Kind, args: ReserveArgs) -> Result<()> {
    let date = required_date(&args.date)?;
    let start = create_iso_string_from_date_time(&Local, date, required_time(&args.start)?);
    let end = create_iso_string_from_date_time(&Local, date, required_time(&args.end)?);
    let requester = match args.requester {
        Some(requester) => requester,
        None => state
            .session
            .sub()
            .context("No requester given and no user logged in")?,
    };

    let created = match kind {
        Kind::Hardware => {
            let reservation = NewHardwareReservation {
                building: args.building,
                resource_code: args.resource,
                stored_resource_code: args
                    .stored
                    .context("Hardware reservations need --stored")?,
                requester,
                manager: args.manager,
                start,
                end,
            };
            state
                .services
                .operations
                .create_hardware_reservation(&reservation)
                .await?
        }
        Kind::Space => {
            let reservation = NewSpaceReservation {
                building: args.building,
                resource_code: args.resource,
                requester,
                manager: args.manager,
                start,
                end,
            };
            state
                .services
                .operations
                .create_space_reservation(&reservation)
                .await?
        }
    };
    print_json(&created)
}

async fn resources(state: &AppState, command: ResourceCommands) -> Result<()> {
    let service = &state.services.resources;
    match command {
        ResourceCommands::Info { list } => {
            let path = match list {
                InfoList::SpaceStates => INFO_SPACE_STATES,
                InfoList::SpaceTypes => INFO_SPACE_TYPES,
                InfoList::HardwareTypes => INFO_HARDWARE_TYPES,
            };
            print_json(&service.info(path).await?)?;
        }
        ResourceCommands::CreateHardwareType { name, description } => {
            service
                .create_hardware_type(&NewHardwareType { name, description })
                .await?;
        }
        ResourceCommands::CreateSpaceType { name, description } => {
            service
                .create_space_type(&NewSpaceType { name, description })
                .await?;
        }
        ResourceCommands::CreateHardware {
            hardware_type,
            name,
            schedule,
            description,
        } => {
            service
                .create_hardware(&NewHardware {
                    type_hardware: hardware_type,
                    name_hardware: name,
                    schedule_hardware: schedule,
                    desc_hardware: description,
                })
                .await?;
        }
        ResourceCommands::CreateSpace {
            code,
            building,
            space_type,
            state: space_state,
            name,
            capacity,
            schedule,
            description,
        } => {
            service
                .create_space(&NewSpace {
                    code_space: code,
                    building_space: building,
                    type_space: space_type,
                    state_space: space_state,
                    name_space: name,
                    capacity_space: capacity,
                    schedule_space: schedule,
                    desc_space: description,
                })
                .await?;
        }
    }
    Ok(())
}

async fn run(state: AppState, command: Commands, cancel: CancellationToken) -> Result<()> {
    let services = &state.services;
    match command {
        Commands::Login { email, password } => {
            services.auth.login(&email, &password).await?;
            println!("Logged in as {}", email);
        }
        Commands::Register {
            code,
            name,
            email,
            password,
            phone,
            address,
        } => {
            let user = RegisterUser {
                code,
                name,
                email,
                password,
                phone,
                address,
            };
            let logged_in = services.auth.register(&user).await?.is_some();
            print_json(&json!({ "registered": user.email, "loggedIn": logged_in }))?;
        }
        Commands::Logout => services.auth.logout()?,
        Commands::Whoami => match services.auth.whoami() {
            Some(claims) => print_json(&claims)?,
            None => println!("Not logged in"),
        },
        Commands::Domains => print_json(&services.domains.load_all().await)?,
        Commands::Available { kind, filters } => {
            let form = filters.into_form(kind)?;
            print_available(&state, kind, form.applied()).await?;
        }
        Commands::Search { kind, filters } => search(&state, kind, filters, cancel).await?,
        Commands::History { kind, filters } => {
            let form = filters.into_form(kind)?;
            match kind {
                Kind::Hardware => {
                    print_json(&services.hardware.reserved_history(form.applied()).await?)?
                }
                Kind::Space => print_json(&services.space.reserved_history(form.applied()).await?)?,
            }
        }
        Commands::Detail { kind, id } => match kind {
            Kind::Hardware => print_json(&services.hardware.reservation_details(id).await?)?,
            Kind::Space => print_json(&services.space.reservation_details(id).await?)?,
        },
        Commands::Reserve { kind, reservation } => reserve(&state, kind, reservation).await?,
        Commands::Cancel { kind, id } => services.operations.cancel(kind.into(), &id).await?,
        Commands::HandOver { kind, id } => services.operations.hand_over(kind.into(), &id).await?,
        Commands::Return {
            kind,
            id,
            condition,
            service,
        } => {
            let rates = ReturnRates {
                condition_rate: condition,
                service_rate: service,
            };
            services.operations.give_back(kind.into(), &id, rates).await?
        }
        Commands::TroyaDev(TroyaDevCommands::Available {
            name,
            type_id,
            start,
            end,
        }) => {
            let query = AvailabilityQuery {
                name,
                type_id,
                start: parse_instant(&start)?,
                end: parse_instant(&end)?,
            };
            print_json(&services.troya_dev.available(&query).await?)?;
        }
        Commands::TroyaDev(TroyaDevCommands::Types) => {
            print_json(&services.troya_dev.resource_types().await?)?
        }
        Commands::Resources(command) => resources(&state, command).await?,
        Commands::Health => {
            let healthy = services.operations.check_health().await;
            print_json(&json!({ "operations": healthy }))?;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = AppConfig::load().context("Failed to load configuration")?;

    // Logs go to stderr, stdout carries the JSON answers
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("reserva_client={},reserva={}", config.logging.level, config.logging.level).into());
    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    tracing::debug!("Starting reserva v{}", env!("CARGO_PKG_VERSION"));

    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("Interrupted, abandoning pending requests");
                cancel.cancel();
            }
        });
    }

    let state = AppState::new(config, cancel.clone())?;
    run(state, cli.command, cancel).await
}
