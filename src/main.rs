use anyhow::Result;
use levelplan::{migrate, paths, state::PState};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let mut data_dir: Option<PathBuf> = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--data-dir" | "-d" => {
                if let Some(path) = args.next() {
                    data_dir = Some(PathBuf::from(path));
                } else {
                    eprintln!("--data-dir requires a path");
                }
            }
            "--help" | "-h" => {
                println!("levelplan");
                println!("  --data-dir <path>   Plugin data directory (default: platform data dir)");
                return Ok(());
            }
            _ => {}
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let data_dir = match data_dir {
        Some(dir) => dir,
        None => paths::default_data_dir()?,
    };

    migrate::migrate(&data_dir)?;

    match PState::load(&data_dir)? {
        Some(state) => println!(
            "{} holds {} template(s), schema {}",
            paths::state_path(&data_dir).display(),
            state.templates.len(),
            state.version
        ),
        None => println!(
            "No canonical state file in {}; the store will start from defaults",
            data_dir.display()
        ),
    }

    Ok(())
}
