use std::error::Error;

use services::{AppServices, Clock};

mod args;
mod commands;
mod play;
mod render;

use args::{ArgsError, Command, Env, Invocation, print_usage};

async fn run() -> Result<(), Box<dyn Error>> {
    let argv: Vec<String> = std::env::args().skip(1).collect();
    let (cmd, parsed) = match args::parse(argv, &Env::from_process()) {
        Ok(Invocation::Help) => {
            print_usage();
            return Ok(());
        }
        Ok(Invocation::Run(cmd, parsed)) => (cmd, parsed),
        Err(e) => {
            eprintln!("{e}");
            print_usage();
            return Err(e.into());
        }
    };

    // Open + migrate SQLite at startup. Keep this in the binary glue so core/services stay pure.
    prepare_sqlite_file(&parsed.db_url)?;
    let services =
        AppServices::new_sqlite(&parsed.db_url, parsed.sets_dir.clone(), Clock::system()).await?;

    match cmd {
        Command::Play => play::run(&services, parsed.config).await,
        Command::Sets => {
            let catalog = services.loader().catalog().await?;
            println!("{}", render::catalog(&catalog));
            Ok(())
        }
        Command::Stats => {
            let summary = services.statistics().summary(parsed.recent).await?;
            println!("{}", render::statistics(&summary));
            Ok(())
        }
        Command::ClearStats => {
            if !parsed.assume_yes {
                eprintln!("Clear all statistics? [y/N]");
                let mut answer = String::new();
                std::io::stdin().read_line(&mut answer)?;
                if !play::is_yes(&answer) {
                    eprintln!("Nothing cleared.");
                    return Ok(());
                }
            }
            services.statistics().clear().await?;
            eprintln!("Statistics cleared.");
            Ok(())
        }
    }
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
