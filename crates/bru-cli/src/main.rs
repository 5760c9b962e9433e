//! `bru` — command-line interface for the BRU control plane.
//!
//! ```text
//! USAGE:
//!   bru status                       All four reports
//!   bru domains [BUDGETS...]         Report or set per-domain budgets
//!   bru enable [VALUE]               Report or set the global enable
//!   bru period [CYCLES]              Report or set the replenishment period
//!   bru clients [ENABLE MASK ...]    Report or set per-client enable/domain pairs
//! ```
//!
//! With no value arguments a subcommand prints the endpoint's report; with
//! arguments it joins them into the line-oriented record and feeds it
//! through the same control-plane parser any other transport would use.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use bru_chip::{window, Layout};
use bru_driver::{Bru, ControlPlane, MappedWindow, RegisterWindow, SimWindow};

#[derive(Parser)]
#[command(name = "bru", about = "Bandwidth Regulation Unit control CLI", version)]
struct Cli {
    /// Physical base address of the register window.
    #[arg(long, default_value_t = window::WINDOW_BASE, value_parser = parse_maybe_hex)]
    base: u64,

    /// Window length in bytes.
    #[arg(long, default_value_t = window::WINDOW_LEN)]
    len: usize,

    /// Number of budget domains.
    #[arg(long, default_value_t = Layout::default().domains)]
    domains: usize,

    /// Number of hardware clients.
    #[arg(long, default_value_t = Layout::default().clients)]
    clients: usize,

    /// Drive an in-memory window instead of hardware (protocol dry run).
    #[arg(long)]
    sim: bool,

    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Print every endpoint's report.
    Status,
    /// Report domain budgets, or set them (one budget per domain, ascending).
    Domains {
        /// Budgets in accesses; 0 is rejected per domain.
        budgets: Vec<String>,
    },
    /// Report the global enable, or set it (0 = off, nonzero = on).
    Enable {
        /// Raw enable value, stored verbatim.
        value: Option<String>,
    },
    /// Report the replenishment period, or set it.
    Period {
        /// Period in cycles.
        cycles: Option<String>,
    },
    /// Report client state, or set it (enable and domain-mask pair per client).
    Clients {
        /// Alternating enable flags and one-hot domain masks.
        pairs: Vec<String>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .init();

    let cli = Cli::parse();
    let layout = Layout::new(cli.domains, cli.clients);

    if cli.sim {
        run(ControlPlane::new(Bru::new(SimWindow::new(cli.len), layout)?), &cli.command)
    } else {
        let win = MappedWindow::open(cli.base, cli.len)?;
        run(ControlPlane::new(Bru::new(win, layout)?), &cli.command)
    }
}

fn run<W: RegisterWindow>(plane: ControlPlane<W>, cmd: &Cmd) -> Result<()> {
    match cmd {
        Cmd::Status => {
            print!("{}", plane.enable_report()?);
            print!("{}", plane.period_report()?);
            print!("{}", plane.domain_report()?);
            print!("{}", plane.client_report()?);
        }
        Cmd::Domains { budgets } if budgets.is_empty() => print!("{}", plane.domain_report()?),
        Cmd::Domains { budgets } => plane.apply_domain_budgets(&budgets.join(" "))?,
        Cmd::Enable { value: None } => print!("{}", plane.enable_report()?),
        Cmd::Enable { value: Some(v) } => plane.apply_enable(v)?,
        Cmd::Period { cycles: None } => print!("{}", plane.period_report()?),
        Cmd::Period { cycles: Some(c) } => plane.apply_period(c)?,
        Cmd::Clients { pairs } if pairs.is_empty() => print!("{}", plane.client_report()?),
        Cmd::Clients { pairs } => plane.apply_clients(&pairs.join(" "))?,
    }
    Ok(())
}

/// Accept `0x`-prefixed hex or plain decimal for the base address.
fn parse_maybe_hex(s: &str) -> std::result::Result<u64, String> {
    let parsed = if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u64::from_str_radix(hex, 16)
    } else {
        s.parse()
    };
    parsed.map_err(|e| format!("invalid address '{s}': {e}"))
}
