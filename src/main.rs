//! ColdCloud CLI
//!
//! Command-line front-end for the ColdCloud engine:
//! - Register, log in and manage the account
//! - Run the HVAC calculators
//! - Browse and export calculation history
//! - Browse services, request service, manage orders

use anyhow::Context;
use chrono::{NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};
use coldcloud::app::App;
use coldcloud::auth::{ProfilePatch, Registration, User, UserType};
use coldcloud::calc::{
    AirChangeInput, AirflowInput, CalculationKind, Climate, CoolingLoadInput, DuctDimensions,
    DuctInput, DuctShape, EnergyInput, ExportFormat, Insulation, RoomType, RoomUsage, SunExposure,
};
use coldcloud::config::{generate_default_config, Config, LoggingConfig};
use coldcloud::notify::ConsoleNotifier;
use coldcloud::services::{
    ExtraService, Frequency, IssueType, MaintenanceType, RequestDetails, ServiceCategory,
    ServiceRequest, SystemType, Urgency,
};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "coldcloud")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "HVAC calculators, customer accounts and service requests")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: search standard locations)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Data directory, overrides the config file
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Output format (table, json; csv for history export)
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create an account and log in
    Register {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        /// Defaults to --password
        #[arg(long)]
        confirm_password: Option<String>,
        #[arg(long)]
        phone: String,
        #[arg(long, default_value = "")]
        company: String,
        /// client, company or technician
        #[arg(long, default_value = "client")]
        user_type: UserType,
        /// Accept the terms and conditions
        #[arg(long)]
        agree_terms: bool,
    },

    /// Log in
    Login { email: String, password: String },

    /// Log out
    Logout,

    /// Show the logged-in account
    Whoami,

    /// Update the logged-in account
    Profile {
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        password: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        company: Option<String>,
        #[arg(long)]
        user_type: Option<UserType>,
        #[arg(long)]
        avatar: Option<String>,
    },

    /// Deactivate the logged-in account
    Deactivate,

    /// Run a calculator
    Calc {
        #[command(subcommand)]
        calculator: CalcCommand,
    },

    /// Calculation history
    History {
        #[command(subcommand)]
        command: HistoryCommand,
    },

    /// Service catalog, requests and orders
    Services {
        #[command(subcommand)]
        command: ServicesCommand,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum CalcCommand {
    /// Cooling load in BTU/h and tons (dimensions in metres)
    Btu {
        length: f64,
        width: f64,
        height: f64,
        #[arg(long, default_value = "bedroom")]
        room_type: RoomType,
        #[arg(long, default_value = "1")]
        occupants: u32,
        #[arg(long, default_value = "moderate")]
        climate: Climate,
        #[arg(long, default_value = "medium")]
        sun: SunExposure,
        #[arg(long, default_value = "average")]
        insulation: Insulation,
    },

    /// Required airflow in CFM (volume in ft³)
    Cfm {
        volume: f64,
        /// Air changes per hour (default: by usage)
        #[arg(long)]
        ach: Option<f64>,
        #[arg(long, default_value = "residential")]
        usage: RoomUsage,
    },

    /// Air changes per hour delivered by a flow
    Ach {
        /// Airflow in CFM
        flow: f64,
        /// Volume in ft³
        volume: f64,
        #[arg(long, default_value = "residential")]
        usage: RoomUsage,
    },

    /// Duct size for an airflow
    Duct {
        /// Airflow in CFM
        flow: f64,
        /// Air velocity in FPM (default: from config)
        #[arg(long)]
        velocity: Option<f64>,
        #[arg(long, default_value = "round")]
        shape: DuctShape,
        /// Width/height ratio for rectangular ducts (default: from config)
        #[arg(long)]
        aspect_ratio: Option<f64>,
    },

    /// Running cost of a cooling system
    Energy {
        /// Capacity in tons
        capacity: f64,
        /// Energy efficiency ratio (EER)
        efficiency: f64,
        /// Electricity price per kWh
        rate: f64,
        /// Daily run time (default: from config)
        #[arg(long)]
        hours: Option<f64>,
        #[arg(long, default_value = "moderate")]
        climate: Climate,
    },
}

#[derive(Subcommand)]
pub enum HistoryCommand {
    /// Show recent calculations
    List {
        /// Only this calculator, limited to the configured view size
        #[arg(short, long)]
        kind: Option<CalculationKind>,
        /// Only calculations linked to the logged-in account
        #[arg(long)]
        mine: bool,
    },

    /// Delete all calculations
    Clear,

    /// Export the whole history (--format json or csv)
    Export {
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum ServicesCommand {
    /// List offerings
    List {
        #[arg(short, long)]
        category: Option<ServiceCategory>,
    },

    /// Show maintenance plans
    Plans,

    /// Send a service request
    Request {
        #[command(subcommand)]
        details: RequestCommand,
    },

    /// Add an offering to your account
    Order {
        offering_id: u32,
        #[arg(short, long)]
        plan: Option<String>,
    },

    /// List your orders
    Orders,

    /// Cancel one of your orders
    Cancel { order_id: i64 },

    /// Next visit for a maintenance plan
    Schedule {
        plan: String,
        /// First visit (default: today)
        #[arg(long)]
        start: Option<NaiveDate>,
        #[arg(long, default_value = "quarterly")]
        frequency: Frequency,
    },

    /// Price a maintenance plan with add-ons
    Quote {
        plan: String,
        /// Add-on as name=cost
        #[arg(short, long)]
        extra: Vec<String>,
    },
}

#[derive(Args)]
pub struct Contact {
    #[arg(long)]
    name: String,
    #[arg(long)]
    phone: String,
    #[arg(long)]
    location: String,
}

#[derive(Subcommand)]
pub enum RequestCommand {
    Maintenance {
        #[command(flatten)]
        contact: Contact,
        #[arg(long, default_value = "basic")]
        maintenance_type: MaintenanceType,
        #[arg(long, default_value = "quarterly")]
        frequency: Frequency,
    },
    Repair {
        #[command(flatten)]
        contact: Contact,
        #[arg(long)]
        issue_type: IssueType,
        #[arg(long, default_value = "medium")]
        urgency: Urgency,
    },
    Installation {
        #[command(flatten)]
        contact: Contact,
        #[arg(long)]
        system_type: SystemType,
        /// Capacity in tons (1-100)
        #[arg(long)]
        capacity: u32,
    },
}

impl RequestCommand {
    fn into_request(self) -> ServiceRequest {
        let (contact, details) = match self {
            RequestCommand::Maintenance {
                contact,
                maintenance_type,
                frequency,
            } => (
                contact,
                RequestDetails::Maintenance {
                    maintenance_type,
                    frequency,
                },
            ),
            RequestCommand::Repair {
                contact,
                issue_type,
                urgency,
            } => (contact, RequestDetails::Repair { issue_type, urgency }),
            RequestCommand::Installation {
                contact,
                system_type,
                capacity,
            } => (
                contact,
                RequestDetails::Installation {
                    system_type,
                    capacity_tons: capacity,
                },
            ),
        };
        ServiceRequest::new(contact.name, contact.phone, contact.location, details)
    }
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    if let Commands::Config { output } = &cli.command {
        let config = generate_default_config();
        match output {
            Some(path) => {
                std::fs::write(path, config)
                    .with_context(|| format!("writing config to {:?}", path))?;
                println!("Config written to {:?}", path);
            }
            None => print!("{}", config),
        }
        return Ok(ExitCode::SUCCESS);
    }

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    if let Some(data_dir) = &cli.data_dir {
        config.storage.data_dir = data_dir.to_string_lossy().to_string();
    }

    init_tracing(&config.logging);
    tracing::debug!("ColdCloud v{}", env!("CARGO_PKG_VERSION"));

    let app = App::open(&config, Arc::new(ConsoleNotifier)).context("opening data store")?;
    let output = Output::new(&cli.format);

    let ok = match cli.command {
        Commands::Calc { calculator } => run_calc(&app, calculator, &output)?,
        Commands::History { command } => run_history(&app, command, &output)?,
        Commands::Services { command } => run_services(&app, command, &output)?,
        account => run_account(&app, account, &output)?,
    };

    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

/// Initialize logging; `RUST_LOG` wins over the configured level
fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("coldcloud={}", logging.level)));
    let registry = tracing_subscriber::registry().with(filter);

    if logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

struct Output {
    format: String,
}

impl Output {
    fn new(format: &str) -> Self {
        Self {
            format: format.to_lowercase(),
        }
    }

    fn json(&self) -> bool {
        self.format == "json"
    }

    /// Print `value` as JSON, or through `table` otherwise
    fn emit<T: Serialize>(&self, value: &T, table: impl FnOnce(&T)) -> anyhow::Result<()> {
        if self.json() {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            table(value);
        }
        Ok(())
    }
}

fn run_account(app: &App, command: Commands, out: &Output) -> anyhow::Result<bool> {
    let user = match command {
        Commands::Register {
            first_name,
            last_name,
            email,
            password,
            confirm_password,
            phone,
            company,
            user_type,
            agree_terms,
        } => app.register(Registration {
            first_name,
            last_name,
            email,
            confirm_password: confirm_password.unwrap_or_else(|| password.clone()),
            password,
            phone,
            company,
            user_type,
            agree_terms,
        }),
        Commands::Login { email, password } => app.login(&email, &password),
        Commands::Logout => return Ok(app.logout().is_some()),
        Commands::Whoami => match app.current_user() {
            Some(user) => Some(user),
            None => {
                println!("Not logged in");
                return Ok(false);
            }
        },
        Commands::Profile {
            first_name,
            last_name,
            email,
            password,
            phone,
            company,
            user_type,
            avatar,
        } => app.update_profile(ProfilePatch {
            first_name,
            last_name,
            email,
            password,
            phone,
            company,
            user_type,
            avatar,
        }),
        Commands::Deactivate => return Ok(app.deactivate().is_some()),
        Commands::Calc { .. }
        | Commands::History { .. }
        | Commands::Services { .. }
        | Commands::Config { .. } => return Ok(false),
    };

    match user {
        Some(user) => {
            print_user(&user, out)?;
            Ok(true)
        }
        None => Ok(false),
    }
}

fn print_user(user: &User, out: &Output) -> anyhow::Result<()> {
    let mut value = serde_json::to_value(user)?;
    if let Some(fields) = value.as_object_mut() {
        fields.remove("password");
    }

    out.emit(&value, |_| {
        println!("{} {}", user.avatar, user.full_name());
        println!("  Email:      {}", user.email);
        println!("  Phone:      {}", user.phone);
        if !user.company.is_empty() {
            println!("  Company:    {}", user.company);
        }
        println!("  Type:       {}", user.user_type);
        println!("  Member since {}", user.registration_date.format("%Y-%m-%d"));
        println!(
            "  {} calculations, {} services",
            user.calculations.len(),
            user.services.len()
        );
    })
}

fn run_calc(app: &App, calculator: CalcCommand, out: &Output) -> anyhow::Result<bool> {
    match calculator {
        CalcCommand::Btu {
            length,
            width,
            height,
            room_type,
            occupants,
            climate,
            sun,
            insulation,
        } => {
            let input = CoolingLoadInput::new(length, width, height)
                .room_type(room_type)
                .occupants(occupants)
                .climate(climate)
                .sun_exposure(sun)
                .insulation(insulation);
            let Some(recorded) = app.cooling_load(&input) else {
                return Ok(false);
            };
            out.emit(&recorded.result, |r| {
                println!("Cooling load: {} BTU/h ({} tons)", r.total_btu, r.tonnage);
                println!("Room volume:  {:.1} m³ ({})", r.volume, r.room_type.label());
                println!("{}", r.recommendation);
            })?;
        }
        CalcCommand::Cfm { volume, ach, usage } => {
            let input = AirflowInput {
                volume,
                air_changes: ach,
                usage,
            };
            let Some(recorded) = app.airflow(&input) else {
                return Ok(false);
            };
            out.emit(&recorded.result, |r| {
                println!("Required airflow: {} CFM", r.cfm);
                println!(
                    "Volume {:.0} ft³ at {} ACH ({})",
                    r.volume,
                    r.air_changes,
                    r.room_usage.label()
                );
            })?;
        }
        CalcCommand::Ach {
            flow,
            volume,
            usage,
        } => {
            let input = AirChangeInput {
                flow,
                volume,
                usage,
            };
            let Some(recorded) = app.air_changes(&input) else {
                return Ok(false);
            };
            out.emit(&recorded.result, |r| {
                println!("Air changes: {} per hour", r.ach);
                println!(
                    "Recommended for {}: {}-{} (ideal {})",
                    r.room_usage.label(),
                    r.band.min,
                    r.band.max,
                    r.band.ideal
                );
                println!("{}", r.rating.describe());
            })?;
        }
        CalcCommand::Duct {
            flow,
            velocity,
            shape,
            aspect_ratio,
        } => {
            let input = DuctInput {
                flow,
                velocity,
                shape,
                aspect_ratio,
            };
            let Some(recorded) = app.duct_size(&input) else {
                return Ok(false);
            };
            out.emit(&recorded.result, |r| {
                println!(
                    "{:.0} CFM at {:.0} FPM: area {} ft² ({} cm²)",
                    r.cfm, r.velocity, r.area, r.area_cm2
                );
                match &r.dimensions {
                    DuctDimensions::Round {
                        diameter_in,
                        diameter_mm,
                        standard_diameter_in,
                    } => {
                        println!("Diameter: {} in ({} mm)", diameter_in, diameter_mm);
                        println!("Standard size: {} in", standard_diameter_in);
                    }
                    DuctDimensions::Rectangular {
                        aspect_ratio,
                        width_in,
                        height_in,
                        standard_width_in,
                        standard_height_in,
                    } => {
                        println!(
                            "{} × {} in (ratio {})",
                            width_in, height_in, aspect_ratio
                        );
                        println!(
                            "Standard size: {} × {} in",
                            standard_width_in, standard_height_in
                        );
                    }
                }
            })?;
        }
        CalcCommand::Energy {
            capacity,
            efficiency,
            rate,
            hours,
            climate,
        } => {
            let input = EnergyInput {
                capacity_tons: capacity,
                efficiency,
                rate_per_kwh: rate,
                hours_per_day: hours,
                climate,
            };
            let Some(recorded) = app.energy_cost(&input) else {
                return Ok(false);
            };
            out.emit(&recorded.result, |r| {
                println!(
                    "{} kW for {} h/day: {} kWh/day",
                    r.power_kw, r.hours_per_day, r.daily_kwh
                );
                println!("Daily:   {:.2}", r.daily_cost);
                println!("Monthly: {:.2}", r.monthly_cost);
                println!("Yearly:  {:.2}", r.yearly_cost);
            })?;
        }
    }
    Ok(true)
}

fn run_history(app: &App, command: HistoryCommand, out: &Output) -> anyhow::Result<bool> {
    match command {
        HistoryCommand::List { kind, mine } => {
            let records = if mine {
                app.user_calculations(kind)
            } else {
                app.history(kind)
            };
            let Some(records) = records else {
                return Ok(false);
            };

            out.emit(&records, |records| {
                if records.is_empty() {
                    println!("No calculations yet.");
                    return;
                }
                println!("{:<16} {:<8} {:<20} {}", "ID", "Kind", "Time", "Summary");
                println!("{}", "-".repeat(80));
                for record in records {
                    println!(
                        "{:<16} {:<8} {:<20} {}",
                        record.id,
                        record.kind(),
                        record.display_timestamp(),
                        record.result.summary()
                    );
                }
            })?;
        }
        HistoryCommand::Clear => return Ok(app.clear_history().is_some()),
        HistoryCommand::Export { output } => {
            let format = if out.format == "csv" {
                ExportFormat::Csv
            } else {
                ExportFormat::Json
            };
            let Some(data) = app.export_history(format) else {
                return Ok(false);
            };

            match output {
                Some(path) => {
                    std::fs::write(&path, data)
                        .with_context(|| format!("writing export to {:?}", path))?;
                    println!("Exported to {:?}", path);
                }
                None => print!("{}", data),
            }
        }
    }
    Ok(true)
}

fn run_services(app: &App, command: ServicesCommand, out: &Output) -> anyhow::Result<bool> {
    match command {
        ServicesCommand::List { category } => {
            let offerings: Vec<_> = match category {
                Some(category) => app.catalog().by_category(category),
                None => app.catalog().all().iter().collect(),
            };
            out.emit(&offerings, |offerings| {
                for offering in offerings {
                    println!("[{}] {} ({})", offering.id, offering.title, offering.category);
                    println!("    {}", offering.description);
                    for feature in &offering.features {
                        println!("    - {}", feature);
                    }
                }
                println!();
                println!("Emergency hotline: {}", app.emergency_contact());
            })?;
        }
        ServicesCommand::Plans => {
            let plans: Vec<_> = app
                .catalog()
                .by_category(ServiceCategory::Maintenance)
                .into_iter()
                .flat_map(|o| o.plans.iter())
                .collect();
            out.emit(&plans, |plans| {
                for plan in plans {
                    let marker = if plan.featured { " ★" } else { "" };
                    println!("{}{}: {:.0} / year", plan.name, marker, plan.price);
                    for feature in &plan.features {
                        println!("    - {}", feature);
                    }
                }
            })?;
        }
        ServicesCommand::Request { details } => {
            let Some(receipt) = app.submit_request(&details.into_request()) else {
                return Ok(false);
            };
            out.emit(&receipt, |r| println!("Reference: {}", r.reference))?;
        }
        ServicesCommand::Order { offering_id, plan } => {
            let Some(order) = app.order_service(offering_id, plan.as_deref()) else {
                return Ok(false);
            };
            out.emit(&order, |o| println!("Order {} ({})", o.id, o.status))?;
        }
        ServicesCommand::Orders => {
            let Some(orders) = app.my_orders() else {
                return Ok(false);
            };
            out.emit(&orders, |orders| {
                if orders.is_empty() {
                    println!("No services on your account.");
                    return;
                }
                for order in orders {
                    println!(
                        "{:<16} {:<24} {:<14} {:<10} {}",
                        order.id,
                        order.title,
                        order.plan.as_deref().unwrap_or("-"),
                        order.status,
                        order.created_at.format("%Y-%m-%d")
                    );
                }
            })?;
        }
        ServicesCommand::Cancel { order_id } => return Ok(app.cancel_order(order_id).is_some()),
        ServicesCommand::Schedule {
            plan,
            start,
            frequency,
        } => {
            let start = start.unwrap_or_else(|| Utc::now().date_naive());
            let Some(schedule) = app.schedule_maintenance(&plan, start, frequency) else {
                return Ok(false);
            };
            out.emit(&schedule, |s| {
                println!(
                    "{} plan, {} visits from {}",
                    s.plan, s.frequency, s.start_date
                )
            })?;
        }
        ServicesCommand::Quote { plan, extra } => {
            let extras = extra
                .iter()
                .map(|raw| parse_extra(raw))
                .collect::<anyhow::Result<Vec<_>>>()?;
            let Some(total) = app.quote(&plan, &extras) else {
                return Ok(false);
            };
            out.emit(&total, |total| println!("Total: {:.2}", total))?;
        }
    }
    Ok(true)
}

/// Parse `name=cost`; a bare name is a free add-on
fn parse_extra(raw: &str) -> anyhow::Result<ExtraService> {
    match raw.split_once('=') {
        Some((name, cost)) => Ok(ExtraService {
            name: name.trim().to_string(),
            cost: Some(
                cost.trim()
                    .parse()
                    .with_context(|| format!("invalid cost in '{}'", raw))?,
            ),
        }),
        None => Ok(ExtraService {
            name: raw.trim().to_string(),
            cost: None,
        }),
    }
}
