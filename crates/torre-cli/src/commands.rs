//! Subcommand handlers. Each returns the process exit code: refusals and
//! denials exit 1, empty-queue outcomes exit 0.

use anyhow::Result;
use chrono::{Local, NaiveDateTime};

use torre_core::QueueKind;
use torre_engine::{
    render_plans_table, render_status, sort_plans, write_report, AuditLog, Config, Engine,
    ListOrder, QueueStore, Registry, Release,
};

// The only clock read in the crate; everything below takes `now` explicitly.
fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

fn open_engine(config: &Config) -> Result<Engine> {
    let registry = Registry::load(config)?;
    let store = QueueStore::open(config)?;
    let audit = AuditLog::open(config)?;
    Ok(Engine::new(registry, store, audit))
}

/// Check that every registry file is present, load them, and reset both
/// queues for the new operating period.
pub fn import_data(config: &Config) -> Result<i32> {
    Registry::verify_files(config)?;
    let registry = Registry::load(config)?;
    let mut store = QueueStore::open(config)?;
    store.clear()?;
    println!(
        "Imported {} flight plans, {} runways, {} fleet types, {} pilots.",
        registry.plans.len(),
        registry.runways.len(),
        registry.fleet.len(),
        registry.pilots.len(),
    );
    println!(
        "Loaded {} weather reports and {} advisories. Queues reset.",
        registry.weather.len(),
        registry.advisories.len(),
    );
    Ok(0)
}

pub fn list(config: &Config, order: ListOrder, json: bool) -> Result<i32> {
    let registry = Registry::load(config)?;
    let mut plans = registry.plans;
    sort_plans(&mut plans, order);
    if json {
        println!("{}", serde_json::to_string_pretty(&plans)?);
    } else {
        print!("{}", render_plans_table(&plans));
    }
    Ok(0)
}

pub fn enqueue(config: &Config, flight_id: &str, kind: QueueKind) -> Result<i32> {
    let engine = open_engine(config)?;
    let admission = engine.enqueue(flight_id, kind, now())?;
    if let Some(warning) = &admission.fleet_warning {
        println!("warning: {warning}");
    }
    println!(
        "{} admitted to the {} queue, scheduled {} (pilot {} {})",
        admission.entry.flight_id,
        kind,
        admission.entry.scheduled_time.format("%H:%M"),
        admission.pilot_id,
        admission.pilot_name,
    );
    Ok(0)
}

pub fn authorize(config: &Config, kind: QueueKind, runway_id: &str) -> Result<i32> {
    let engine = open_engine(config)?;
    match engine.authorize(kind, runway_id, now())? {
        Release::Authorized { entry, runway_id } => {
            println!("AUTHORIZED {} on runway {}", entry.flight_id, runway_id);
            Ok(0)
        }
        Release::Denied(reason) => {
            println!("DENIED: {reason}");
            Ok(1)
        }
        Release::QueueEmpty => {
            println!("The {kind} queue is empty.");
            Ok(0)
        }
        Release::NoEligibleFlight => {
            println!("No flight in the {kind} queue matches a registered plan.");
            Ok(0)
        }
    }
}

pub fn status(config: &Config, json: bool) -> Result<i32> {
    let engine = open_engine(config)?;
    let snapshot = engine.status(now())?;
    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        print!("{}", render_status(&snapshot));
    }
    Ok(0)
}

pub fn report(config: &Config) -> Result<i32> {
    let engine = open_engine(config)?;
    let report = engine.period_report(now())?;
    let path = write_report(config, &report)?;
    println!("Report written to {}", path.display());
    Ok(0)
}
