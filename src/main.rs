use anyhow::{bail, Context, Result};
use std::env;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use campus_records::{
    export_roster, FlatFileGateway, RecordsConfig, Role, SnapshotStore, UserDirectory,
};

const USAGE: &str = "Usage: campus-records [--config <path>] [summary | roster <out.csv> | snapshot | restore]";

fn main() -> Result<()> {
    let mut args: Vec<String> = env::args().skip(1).collect();

    let config_path = match args.iter().position(|a| a == "--config") {
        Some(i) => {
            if i + 1 >= args.len() {
                bail!("--config needs a path\n{}", USAGE);
            }
            let path = PathBuf::from(args.remove(i + 1));
            args.remove(i);
            Some(path)
        }
        None => None,
    };

    let config = RecordsConfig::resolve(config_path.as_deref())?;
    init_logging(&config);

    match args.first().map(String::as_str) {
        None | Some("summary") => run_summary(&config),
        Some("roster") => {
            let out = args.get(1).context(USAGE)?;
            run_roster(&config, PathBuf::from(out))
        }
        Some("snapshot") => run_snapshot(&config),
        Some("restore") => run_restore(&config),
        Some(other) => bail!("Unknown command: {}\n{}", other, USAGE),
    }
}

fn init_logging(config: &RecordsConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Load both flat files and apply the bootstrap admin, if configured
fn load_directory(config: &RecordsConfig) -> Result<UserDirectory> {
    let gateway = FlatFileGateway::from_config(config);
    let mut directory = UserDirectory::new();

    let summary = gateway.load(&mut directory)?;
    if !summary.is_complete() {
        tracing::warn!(
            student_stop = ?summary.student_stop,
            faculty_stop = ?summary.faculty_stop,
            "Load stopped early at a malformed record"
        );
    }

    if let Some(admin) = &config.bootstrap_admin {
        if !directory.contains_username(&admin.username) {
            directory.register_admin(&admin.username, &admin.password)?;
        }
    }

    Ok(directory)
}

fn run_summary(config: &RecordsConfig) -> Result<()> {
    let directory = load_directory(config)?;

    println!("Campus Records v{}", campus_records::VERSION);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("Students: {}", directory.count_by_role(Role::Student));
    println!("Faculty:  {}", directory.count_by_role(Role::Faculty));
    println!("Admins:   {}", directory.count_by_role(Role::Admin));
    println!();
    print!("{}", directory.user_listing());

    Ok(())
}

fn run_roster(config: &RecordsConfig, out: PathBuf) -> Result<()> {
    let directory = load_directory(config)?;
    let rows = export_roster(&out, &directory)?;
    println!("✓ Wrote {} roster rows to {}", rows, out.display());
    Ok(())
}

fn run_snapshot(config: &RecordsConfig) -> Result<()> {
    let directory = load_directory(config)?;
    let mut store = SnapshotStore::open(&config.snapshot_path())?;
    let info = store.save(&directory)?;
    println!(
        "✓ Snapshot {} ({} identities, {})",
        info.snapshot_id,
        info.identity_count,
        info.taken_at.to_rfc3339()
    );
    Ok(())
}

/// Rewrite the flat files from the latest snapshot (scalar fields only)
fn run_restore(config: &RecordsConfig) -> Result<()> {
    let store = SnapshotStore::open(&config.snapshot_path())?;
    let Some(directory) = store.load_latest()? else {
        bail!("No snapshot found in {}", config.snapshot_path().display());
    };

    let saved = FlatFileGateway::from_config(config).save(&directory)?;
    println!(
        "✓ Restored {} students and {} faculty to flat files",
        saved.students, saved.faculty
    );
    if !saved.is_complete() {
        println!("  ⚠ {} records could not be written (see log)", saved.skipped);
    }
    Ok(())
}
