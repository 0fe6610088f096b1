use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use hopmap::cli::Args;
use hopmap::config::Config;
use hopmap::lookup::GeoReader;
use hopmap::probe::UdpProbe;
use hopmap::resolve::resolve_ipv4;
use hopmap::trace::{trace, Session};

fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    // Initialize logging; trace results themselves go to stdout only.
    if args.verbose {
        tracing_subscriber::fmt().with_env_filter("debug").init();
    } else {
        tracing_subscriber::fmt().with_env_filter("warn").init();
    }

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("hopmap: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    let mut config = Config::from(&args);

    let host = match args.host {
        Some(host) => host,
        None => {
            let (host, max_hops) = prompt_for_target(config.max_hops)?;
            config.max_hops = max_hops;
            host
        }
    };

    let dest = resolve_ipv4(&host)?;

    // The database must open before any probing starts.
    let geo = match &config.geoip_db {
        Some(path) => GeoReader::open(path),
        None => GeoReader::open_default(),
    }?;

    let session = match config.port {
        Some(port) => Session::with_port(host, dest, config.max_hops, port),
        None => Session::new(host, dest, config.max_hops),
    };

    let mut prober = UdpProbe::new(session.dest, session.port, config.timeout);
    let stdout = io::stdout();
    let outcome = trace(&session, &mut prober, &geo, &mut stdout.lock())?;
    tracing::debug!(?outcome, "trace finished");

    Ok(())
}

/// Interactive fallback when no host argument was given: ask for the
/// destination and the hop limit, empty hop input keeping the default.
fn prompt_for_target(default_hops: u8) -> Result<(String, u8)> {
    let stdin = io::stdin();
    let mut line = String::new();

    print!("Destination host: ");
    io::stdout().flush()?;
    stdin.lock().read_line(&mut line)?;
    let host = line.trim().to_string();
    if host.is_empty() {
        anyhow::bail!("no destination host given");
    }

    print!("Maximum hops (default {}): ", default_hops);
    io::stdout().flush()?;
    line.clear();
    stdin.lock().read_line(&mut line)?;
    let trimmed = line.trim();
    let max_hops = if trimmed.is_empty() {
        default_hops
    } else {
        let hops: u8 = trimmed.parse().context("invalid hop count")?;
        if hops == 0 {
            anyhow::bail!("hop count must be at least 1");
        }
        hops
    };

    Ok((host, max_hops))
}
