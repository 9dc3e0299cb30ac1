use bill_of_exchange::catalog::{ContractBook, SupplierList, suggestions};
use bill_of_exchange::config::Config;
use bill_of_exchange::format::{amount_to_words, format_currency};
use bill_of_exchange::render::generate_reports;
use bill_of_exchange::report::{Report, parse_number};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage:
  bill_of_exchange generate <bill.toml> [out_dir]
  bill_of_exchange totals <bill.toml>
  bill_of_exchange words <amount>
  bill_of_exchange lookup <file_no>
  bill_of_exchange suggest <buyers|suppliers|contracts> <text>";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // init tracing
    tracing_subscriber::fmt()
        .with_target(true)
        .with_level(true)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let cfg = Config::load_or_default(Config::resolve_path())?;

    match args.iter().map(String::as_str).collect::<Vec<_>>().as_slice() {
        ["generate", bill, rest @ ..] => {
            let report = load_bill(bill)?;
            let out_dir = rest
                .first()
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(&cfg.output_dir));

            let outcomes = generate_reports(&report, &cfg, &out_dir)?;
            let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
            if failed > 0 {
                return Err(format!("{failed} of {} documents failed", outcomes.len()).into());
            }
        }
        ["totals", bill] => {
            let report = load_bill(bill)?;
            let totals = report.totals();
            let summary = serde_json::json!({
                "totals": totals,
                "total_value_display": format_currency(totals.total_value),
                "in_words": amount_to_words(totals.total_value),
                "qty_mismatch": totals.has_qty_mismatch(),
                "filename": report.base_filename(),
            });
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        ["words", amount] => {
            println!("{}", amount_to_words(parse_number(amount)));
        }
        ["lookup", file_no] => {
            let book = ContractBook::load(&cfg.data.contracts_csv)?;
            let hit = book.resolve_file_no(file_no, &cfg.file_no_prefix);
            match &hit.buyer {
                Some(buyer) => info!(file_no = %hit.file_no, buyer = %buyer, "Contract found"),
                None => warn!(file_no = %hit.file_no, "No contract for file number"),
            }
            println!("{}", hit.buyer.unwrap_or_default());
        }
        ["suggest", source, text] => {
            let candidates = match *source {
                "buyers" => ContractBook::load(&cfg.data.contracts_csv)?.buyers(),
                "contracts" => ContractBook::load(&cfg.data.contracts_csv)?.contracts(),
                "suppliers" => SupplierList::load(&cfg.data.suppliers)?.names().to_vec(),
                other => return Err(format!("unknown suggestion source {other:?}\n{USAGE}").into()),
            };
            for name in suggestions(text, &candidates, cfg.suggest_threshold) {
                println!("{name}");
            }
        }
        _ => {
            eprintln!("{USAGE}");
            return Err("missing or unknown command".into());
        }
    }

    Ok(())
}

fn load_bill(path: &str) -> Result<Report, Box<dyn std::error::Error>> {
    let report = Report::from_toml(&std::fs::read_to_string(path)?)?;
    let (filled, total) = report.coverage();
    info!(path = %path, items = report.items.len(), filled, total, "Loaded bill");
    Ok(report)
}
