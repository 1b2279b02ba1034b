use clap::Parser;
use miette::{IntoDiagnostic, Result};
use migration::MigratorTrait;
use tracing_subscriber::{fmt, EnvFilter};

use shiftboard::ability::Role;
use shiftboard::storage::{self, NewShift, NewUser};
use shiftboard::{ability::Ability, settings};

#[derive(Parser, Debug)]
#[command(name = "shiftboard", version, about = "Shift scheduling backend")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Seed demo users and shifts
    #[arg(long)]
    seed: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // logging
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();

    // load settings
    let settings = settings::Settings::load(&cli.config)?;
    tracing::info!(?settings, "Loaded configuration");

    // init storage (database) and bring the schema up to date
    let db = storage::init(&settings.database).await?;
    migration::Migrator::up(&db, None)
        .await
        .into_diagnostic()?;

    if cli.seed {
        seed_demo_data(&db).await?;
    }

    Ok(())
}

/// Create one user per role plus a pair of shifts. Safe to run twice:
/// existing rows are left alone.
async fn seed_demo_data(db: &sea_orm::DatabaseConnection) -> Result<()> {
    let admin = ensure_user(db, "Admin", "admin@example.com", None, Some(Role::Admin)).await?;
    let scheduler = ensure_user(
        db,
        "Scheduler",
        "scheduler@example.com",
        None,
        Some(Role::Scheduler),
    )
    .await?;
    let employee = ensure_user(
        db,
        "Employee",
        "employee@example.com",
        Some("EMP12"),
        Some(Role::Employee),
    )
    .await?;
    tracing::info!(admin = %admin.id, scheduler = %scheduler.id, employee = %employee.id, "Seeded demo users");

    let ability = Ability::new(Some(&scheduler));
    if storage::accessible_shifts(db, &ability)
        .await
        .into_diagnostic()?
        .is_empty()
    {
        let start = chrono::Utc::now().timestamp();
        let hour = 3600;
        for (from, to) in [(start, start + 8 * hour), (start + 24 * hour, start + 32 * hour)] {
            storage::create_shift(
                db,
                &ability,
                NewShift {
                    user_id: employee.id.clone(),
                    start_time: from,
                    end_time: to,
                    notes: None,
                },
            )
            .await
            .into_diagnostic()?;
        }
        tracing::info!("Seeded demo shifts");
    }

    Ok(())
}

async fn ensure_user(
    db: &sea_orm::DatabaseConnection,
    name: &str,
    email: &str,
    employee_id: Option<&str>,
    role: Option<Role>,
) -> Result<shiftboard::entities::user::Model> {
    if let Some(existing) = storage::get_user_by_email(db, email)
        .await
        .into_diagnostic()?
    {
        return Ok(existing);
    }
    let created = storage::create_user(
        db,
        NewUser {
            name: name.to_string(),
            email: email.to_string(),
            // placeholder; real credentials come from the auth layer
            password_hash: "!".to_string(),
            employee_id: employee_id.map(str::to_string),
            role,
        },
    )
    .await
    .into_diagnostic()?;
    tracing::info!(id = %created.id, email, "Created demo user");
    Ok(created)
}
