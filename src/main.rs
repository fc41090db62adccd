use clap::Parser;
use custodian::application::escrow::EscrowEngine;
use custodian::application::service::CustodyService;
use custodian::application::wallet::MultiSigLedger;
use custodian::domain::funds::Amount;
use custodian::domain::ports::Settlement;
use custodian::domain::wallet::OwnerSet;
use custodian::infrastructure::in_memory::InMemorySettlement;
use custodian::interfaces::csv::op_reader::OperationReader;
use custodian::interfaces::csv::report::ReportWriter;
use miette::{IntoDiagnostic, Result};
use rust_decimal::Decimal;
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input operations CSV file
    input: PathBuf,

    /// Wallet owner identities (comma separated)
    #[arg(long, value_delimiter = ',', required = true)]
    owners: Vec<String>,

    /// Confirmations required before a wallet transaction may execute
    #[arg(long)]
    threshold: usize,

    /// Escrow service fee in basis points
    #[arg(long, default_value_t = 250)]
    fee_rate: u16,

    /// Account credited with service fees
    #[arg(long, default_value = "fees")]
    fee_account: String,

    /// Identity allowed to resolve disputed escrows
    #[arg(long, default_value = "arbiter")]
    arbiter: String,

    /// Initial deposit into wallet custody
    #[arg(long)]
    fund: Option<Decimal>,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let settlement = Arc::new(InMemorySettlement::new());
    if let Some(fund) = cli.fund {
        let amount = Amount::new(fund).into_diagnostic()?;
        settlement.deposit(amount).await.into_diagnostic()?;
    }

    let owners = OwnerSet::new(cli.owners, cli.threshold).into_diagnostic()?;
    let port: Arc<dyn Settlement> = settlement.clone();
    let wallet = MultiSigLedger::new(owners, port.clone());
    let escrow =
        EscrowEngine::new(cli.fee_rate, cli.fee_account, cli.arbiter, port).into_diagnostic()?;
    let mut service = CustodyService::new(wallet, escrow);

    // Replay the script; a failed row is reported and does not stop the run.
    let file = File::open(cli.input).into_diagnostic()?;
    let reader = OperationReader::new(file);
    for op_result in reader.operations() {
        match op_result {
            Ok(op) => {
                if let Err(e) = service.apply(op).await {
                    eprintln!("Error applying operation: {}", e);
                }
            }
            Err(e) => {
                eprintln!("Error reading operation: {}", e);
            }
        }
    }

    // Output final state
    let credits = settlement.credits().await;
    let stdout = io::stdout();
    let mut writer = ReportWriter::new(stdout.lock());
    writer
        .write_report(&credits, service.escrow.escrows(), service.wallet.transactions())
        .into_diagnostic()?;

    Ok(())
}
