use std::{fs, path::PathBuf, process::ExitCode};

use clap::Parser;
use itertools::Itertools;
use qram_circuit::{AddressRegister, Circuit, MemoryRegister, Reversible};
use qram_memory::{MemoryBank, MemoryCell, MemoryError};
use qram_oracle::{Layout, OracleConfig, OracleError, Qrom, Strategy};
use qram_sim::{
    Backend, ResourceCount, ResourceEstimator, SimError, SimulatorConfig, SparseSimulator,
};
use qram_utils::{bit_string, setup_logger};
use serde::Serialize;
use thiserror::Error;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Simulate bucket-brigade QRAM reads", long_about = None)]
struct Args {
    /// JSON file with the memory cells, e.g. `[{"address": 3, "value": "111"}]`.
    #[clap(short, long)]
    bank: Option<PathBuf>,
    /// A memory cell given inline as `<address>:<bits>`.
    #[clap(short, long)]
    cell: Vec<MemoryCell>,
    /// An address to read; may be repeated.
    #[clap(short, long, required = true)]
    address: Vec<u64>,
    #[clap(short, long, default_value_t = Strategy::Standard, env = "QRAM_STRATEGY")]
    strategy: Strategy,
    /// Store one qubit per address instead of one slot of `data_size` qubits.
    #[clap(long)]
    single_bit: bool,
    /// Seed for measurement sampling.
    #[clap(long, default_value_t = 0)]
    seed: u64,
    /// Print the report as JSON.
    #[clap(long)]
    json: bool,
}

#[derive(Debug, Error)]
enum CliError {
    #[error("failed to read {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },
    #[error("failed to parse the memory bank: {0}")]
    Json(#[from] serde_json::Error),
    #[error("no memory cells given, pass --bank or --cell")]
    NoCells,
    #[error(transparent)]
    Memory(#[from] MemoryError),
    #[error(transparent)]
    Oracle(#[from] OracleError),
    #[error(transparent)]
    Sim(#[from] SimError),
}

#[derive(Debug, Serialize)]
struct ReadOutcome {
    address: u64,
    value: String,
}

#[derive(Debug, Serialize)]
struct Report {
    address_size: usize,
    data_size: usize,
    strategy: Strategy,
    reads: Vec<ReadOutcome>,
    resources: ResourceCount,
}

fn load_bank(args: &Args) -> Result<MemoryBank, CliError> {
    let mut cells = match &args.bank {
        Some(path) => {
            let json = fs::read_to_string(path)
                .map_err(|source| CliError::Io { path: path.clone(), source })?;
            serde_json::from_str::<MemoryBank>(&json)?.cells().to_vec()
        }
        None => Vec::new(),
    };
    cells.extend(args.cell.iter().cloned());
    if cells.is_empty() {
        return Err(CliError::NoCells);
    }
    Ok(MemoryBank::generate(cells)?)
}

/// Builds the oracle, simulates one read per address and estimates the cost of a single read.
fn run(
    bank: &MemoryBank,
    addresses: &[u64],
    config: OracleConfig,
    single_bit: bool,
    seed: u64,
) -> Result<Report, CliError> {
    let layout = if single_bit { Layout::BitPerAddress } else { Layout::Sliced };
    let mut circuit = Circuit::new();
    let width = layout
        .memory_width(bank.address_size(), bank.data_size())
        .ok_or(OracleError::AddressSpaceTooLarge(bank.address_size()))?;
    let memory = MemoryRegister::new(circuit.allocate(width));
    let qrom = if single_bit {
        Qrom::single_bit(&mut circuit, memory, bank, config)?
    } else {
        Qrom::bucket_brigade(&mut circuit, memory, bank, config)?
    };
    let address_register = AddressRegister::new(circuit.allocate(qrom.address_size()));
    let target = circuit.allocate(qrom.data_size());
    let read = qrom.read(&address_register, &target)?;

    let num_addresses = qrom.num_addresses();
    let mut resources = ResourceCount::default();
    let reads = addresses
        .iter()
        .map(|&address| -> Result<ReadOutcome, CliError> {
            if address >= num_addresses as u64 {
                return Err(OracleError::AddressOutOfRange { address, num_addresses }.into());
            }
            let mut query = circuit.clone();
            for (i, &qubit) in address_register.iter().enumerate() {
                if (address >> i) & 1 == 1 {
                    query.x(qubit);
                }
            }
            read.apply(&mut query);

            let mut estimator = ResourceEstimator::new();
            estimator.run(&query).unwrap_or_else(|never| match never {});
            resources = estimator.count();

            let mut sim = SparseSimulator::new(SimulatorConfig { seed, ..Default::default() });
            sim.run(&query)?;
            let value = sim.measure_register(&target)?;
            tracing::info!("address {} holds {}", address, bit_string(&value));
            Ok(ReadOutcome { address, value: bit_string(&value) })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Report {
        address_size: qrom.address_size(),
        data_size: qrom.data_size(),
        strategy: config.strategy,
        reads,
        resources,
    })
}

fn main() -> ExitCode {
    setup_logger();
    let args = Args::parse();

    let config = OracleConfig::with_strategy(args.strategy);
    let report = load_bank(&args)
        .and_then(|bank| run(&bank, &args.address, config, args.single_bit, args.seed));
    let report = match report {
        Ok(report) => report,
        Err(err) => {
            tracing::error!("{}", err);
            return ExitCode::FAILURE;
        }
    };

    if args.json {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(err) => {
                tracing::error!("{}", err);
                return ExitCode::FAILURE;
            }
        }
    } else {
        println!(
            "{} strategy, address size {}, data size {}",
            report.strategy, report.address_size, report.data_size
        );
        let mut reads = report.reads.iter().map(|r| format!("{} -> {}", r.address, r.value));
        println!("{}", reads.join("\n"));
        println!("{}", report.resources);
    }
    ExitCode::SUCCESS
}
