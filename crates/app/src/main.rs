//! Courtside CLI
//!
//! Thin operational front end over the booking services: manage reference
//! data, render a day board, and exercise the commit/cancel/confirm paths.
//! The production HTTP surface lives with an external collaborator.

use std::process;

use clap::{Args, Parser, Subcommand};
use courtside::{
    availability::{Cell, Classification},
    courts::{CourtId, CourtStatus},
    draft::BookingDraft,
    slots::Slot,
};
use courtside_app::context::AppContext;
use courtside_app::domain::bookings::models::{ReservationId, UserId};
use courtside_app::domain::{courts::models::NewCourt, equipment::models::NewEquipment};
use jiff::{Zoned, civil::Date};

#[derive(Debug, Parser)]
#[command(name = "courtside-app", about = "Courtside CLI", long_about = None)]
struct Cli {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", global = true)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Manage courts
    Court(CourtCommand),
    /// Manage rental equipment
    Equipment(EquipmentCommand),
    /// Show the availability board for a date
    Board(BoardArgs),
    /// Book one or more slots on a court
    Book(BookArgs),
    /// Cancel a reservation from history
    Cancel(CancelArgs),
    /// Confirm a pending reservation (payment callback stand-in)
    Confirm(ConfirmArgs),
}

#[derive(Debug, Args)]
struct CourtCommand {
    #[command(subcommand)]
    command: CourtSubcommand,
}

#[derive(Debug, Subcommand)]
enum CourtSubcommand {
    /// Register a court
    Add {
        /// Display name
        #[arg(long)]
        name: String,

        /// Hourly price in minor units
        #[arg(long)]
        price: u64,
    },
    /// List all courts
    List,
    /// Set a court's lifecycle status
    SetStatus {
        #[arg(long)]
        id: i64,

        #[arg(long, value_enum)]
        status: StatusArg,
    },
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum StatusArg {
    Available,
    Maintenance,
}

impl From<StatusArg> for CourtStatus {
    fn from(value: StatusArg) -> Self {
        match value {
            StatusArg::Available => Self::Available,
            StatusArg::Maintenance => Self::Maintenance,
        }
    }
}

#[derive(Debug, Args)]
struct EquipmentCommand {
    #[command(subcommand)]
    command: EquipmentSubcommand,
}

#[derive(Debug, Subcommand)]
enum EquipmentSubcommand {
    /// Register a piece of equipment
    Add {
        #[arg(long)]
        name: String,

        /// Hourly price in minor units
        #[arg(long)]
        price: u64,

        #[arg(long)]
        stock: u32,
    },
    /// List all equipment
    List,
}

#[derive(Debug, Args)]
struct BoardArgs {
    /// Target date, e.g. 2026-06-02
    #[arg(long)]
    date: Date,
}

#[derive(Debug, Args)]
struct BookArgs {
    /// Target date, e.g. 2026-06-02
    #[arg(long)]
    date: Date,

    /// Court id
    #[arg(long)]
    court: i64,

    /// Slot labels such as "8:00 am - 9:00 am"; repeatable
    #[arg(long = "slot", required = true)]
    slots: Vec<String>,

    /// Booking user id
    #[arg(long)]
    user: i64,
}

#[derive(Debug, Args)]
struct CancelArgs {
    /// Reservation id
    #[arg(long)]
    id: i64,

    /// Requesting user id
    #[arg(long)]
    user: i64,
}

#[derive(Debug, Args)]
struct ConfirmArgs {
    /// Reservation id
    #[arg(long)]
    id: i64,
}

#[tokio::main]
async fn main() {
    let _env = dotenvy::dotenv();

    let cli = Cli::parse();

    if let Err(error) = run(cli).await {
        eprintln!("{error}");
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), String> {
    let database_url = cli
        .database_url
        .ok_or_else(|| "DATABASE_URL is not set".to_string())?;

    let ctx = AppContext::from_database_url(&database_url)
        .await
        .map_err(|error| format!("failed to initialize: {error}"))?;

    match cli.command {
        Commands::Court(CourtCommand { command }) => match command {
            CourtSubcommand::Add { name, price } => {
                let court = ctx
                    .courts
                    .create_court(NewCourt {
                        name,
                        hourly_price: price,
                        status: CourtStatus::Available,
                    })
                    .await
                    .map_err(|error| format!("failed to create court: {error}"))?;

                println!("court {}: {}", court.id, court.name);
            }
            CourtSubcommand::List => {
                let courts = ctx
                    .courts
                    .list_courts()
                    .await
                    .map_err(|error| format!("failed to list courts: {error}"))?;

                for court in courts {
                    println!(
                        "{}\t{}\t{}\t{}",
                        court.id,
                        court.name,
                        court.hourly_price,
                        court.status.as_db()
                    );
                }
            }
            CourtSubcommand::SetStatus { id, status } => {
                ctx.courts
                    .set_court_status(CourtId::from_i64(id), status.into())
                    .await
                    .map_err(|error| format!("failed to set status: {error}"))?;

                println!("court {id} is now {}", CourtStatus::from(status).as_db());
            }
        },
        Commands::Equipment(EquipmentCommand { command }) => match command {
            EquipmentSubcommand::Add { name, price, stock } => {
                let equipment = ctx
                    .equipment
                    .create_equipment(NewEquipment {
                        name,
                        hourly_price: price,
                        stock,
                    })
                    .await
                    .map_err(|error| format!("failed to create equipment: {error}"))?;

                println!("equipment {}: {}", equipment.id, equipment.name);
            }
            EquipmentSubcommand::List => {
                let equipment = ctx
                    .equipment
                    .list_equipment()
                    .await
                    .map_err(|error| format!("failed to list equipment: {error}"))?;

                for item in equipment {
                    println!(
                        "{}\t{}\t{}\t{}",
                        item.id, item.name, item.hourly_price, item.stock
                    );
                }
            }
        },
        Commands::Board(args) => {
            let board = ctx
                .bookings
                .board(args.date, Zoned::now())
                .await
                .map_err(|error| format!("failed to resolve board: {error}"))?;

            println!("board for {}", board.date);

            for court in &board.courts {
                let row: String = board
                    .slots
                    .iter()
                    .map(|slot| {
                        match board.classification(Cell {
                            court: court.id,
                            slot: *slot,
                        }) {
                            Some(Classification::Available) => '.',
                            Some(Classification::Reserved) => 'R',
                            Some(Classification::Maintenance) => 'M',
                            Some(Classification::Past) => '-',
                            Some(Classification::Selected) => 'S',
                            None => '?',
                        }
                    })
                    .collect();

                println!("{}\t{}\t{row}", court.id, court.name);
            }
        }
        Commands::Book(args) => {
            let court = CourtId::from_i64(args.court);

            let cells = args
                .slots
                .iter()
                .map(|label| {
                    Slot::from_label(label)
                        .map(|slot| Cell { court, slot })
                        .map_err(|error| error.to_string())
                })
                .collect::<Result<Vec<_>, _>>()?;

            let receipt = ctx
                .bookings
                .commit(
                    BookingDraft {
                        date: args.date,
                        cells,
                        equipment: vec![],
                    },
                    UserId::new(args.user),
                    Zoned::now(),
                )
                .await
                .map_err(|error| format!("booking failed: {error}"))?;

            println!("batch {}", receipt.batch);
            for id in &receipt.reservations {
                println!("reservation {id}");
            }
            println!("total {}", receipt.total);
        }
        Commands::Cancel(args) => {
            ctx.bookings
                .cancel(
                    ReservationId::from_i64(args.id),
                    UserId::new(args.user),
                    Zoned::now(),
                )
                .await
                .map_err(|error| format!("cancel failed: {error}"))?;

            println!("reservation {} cancelled", args.id);
        }
        Commands::Confirm(args) => {
            ctx.bookings
                .confirm(ReservationId::from_i64(args.id))
                .await
                .map_err(|error| format!("confirm failed: {error}"))?;

            println!("reservation {} confirmed", args.id);
        }
    }

    Ok(())
}
