use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use masweep::prelude::*;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "masweep")]
#[command(about = "A moving-average crossover sweep backtester for currency pairs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    //run a sweep
    Run {
        //json configuration file (flags below override it)
        #[arg(long)]
        config: Option<PathBuf>,

        //comma separated currencies used to build pairs (eg BTC,USD,ETH)
        #[arg(long)]
        currencies: Option<String>,

        //price data granularity (eg 1m, M5)
        #[arg(long)]
        granularity: Option<String>,

        //short moving average windows (eg 8,10,12)
        #[arg(long, value_delimiter = ',')]
        ma_short: Vec<usize>,

        //long moving average windows (eg 21,34,55)
        #[arg(long, value_delimiter = ',')]
        ma_long: Vec<usize>,

        //directory holding his_data_{pair}_{granularity}.csv files
        #[arg(long)]
        data_dir: Option<PathBuf>,

        //instrument metadata csv
        #[arg(long)]
        instruments: Option<PathBuf>,

        //output path for the sweep report csv
        #[arg(long)]
        output: Option<PathBuf>,

        //failure policy (isolate, fail-fast)
        #[arg(long)]
        policy: Option<String>,

        //gain unit (price, pips)
        #[arg(long)]
        gain_unit: Option<String>,

        //also test self pairs such as USD_USD
        #[arg(long)]
        include_self_pairs: bool,

        //run pairs one after another instead of on the thread pool
        #[arg(long)]
        sequential: bool,

        //number of best combinations to print
        #[arg(long, default_value = "10")]
        top: usize,
    },

    //list the pairs a sweep would test
    Pairs {
        //json configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        //comma separated currencies
        #[arg(long)]
        currencies: Option<String>,

        //instrument metadata csv
        #[arg(long)]
        instruments: Option<PathBuf>,

        //also list self pairs such as USD_USD
        #[arg(long)]
        include_self_pairs: bool,
    },

    //write the default configuration to a json file
    InitConfig {
        path: PathBuf,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            currencies,
            granularity,
            ma_short,
            ma_long,
            data_dir,
            instruments,
            output,
            policy,
            gain_unit,
            include_self_pairs,
            sequential,
            top,
        } => {
            let mut config = load_config(config)?;

            if let Some(currencies) = currencies {
                config.currencies = parse_currencies(&currencies);
            }
            if let Some(granularity) = granularity {
                config.granularity = granularity;
            }
            if !ma_short.is_empty() {
                config.ma_short = ma_short;
            }
            if !ma_long.is_empty() {
                config.ma_long = ma_long;
            }
            if let Some(data_dir) = data_dir {
                config.data_dir = data_dir;
            }
            if let Some(instruments) = instruments {
                config.instruments_path = instruments;
            }
            if let Some(output) = output {
                config.output_path = output;
            }
            if let Some(policy) = policy {
                config.failure_policy = FailurePolicy::parse(&policy)
                    .ok_or_else(|| anyhow::anyhow!("Unknown failure policy: {}", policy))?;
            }
            if let Some(unit) = gain_unit {
                config.gain_unit = GainUnit::parse(&unit)
                    .ok_or_else(|| anyhow::anyhow!("Unknown gain unit: {}", unit))?;
            }
            if include_self_pairs {
                config.include_self_pairs = true;
            }
            if sequential {
                config.parallel = false;
            }

            run_sweep(&config, top)?;
        }
        Commands::Pairs {
            config,
            currencies,
            instruments,
            include_self_pairs,
        } => {
            let mut config = load_config(config)?;
            if let Some(currencies) = currencies {
                config.currencies = parse_currencies(&currencies);
            }
            if let Some(instruments) = instruments {
                config.instruments_path = instruments;
            }
            if include_self_pairs {
                config.include_self_pairs = true;
            }

            let catalog = InstrumentCatalog::load(&config.instruments_path).context(format!(
                "Failed to load instruments from {:?}",
                config.instruments_path
            ))?;
            for pair in catalog.test_pairs(&config.currencies, config.include_self_pairs) {
                println!("{}", pair);
            }
        }
        Commands::InitConfig { path } => {
            SweepConfiguration::default().to_json_file(&path)?;
            println!("Default configuration written to {:?}", path);
        }
    }

    Ok(())
}

fn load_config(path: Option<PathBuf>) -> Result<SweepConfiguration> {
    match path {
        Some(path) => SweepConfiguration::from_json_file(&path),
        None => Ok(SweepConfiguration::default()),
    }
}

fn run_sweep(config: &SweepConfiguration, top: usize) -> Result<()> {
    config.validate()?;

    println!("MA Crossover Sweep");
    println!("==================\n");

    //load instruments
    let catalog = InstrumentCatalog::load(&config.instruments_path).context(format!(
        "Failed to load instruments from {:?}",
        config.instruments_path
    ))?;

    let pairs = catalog.test_pairs(&config.currencies, config.include_self_pairs);
    if pairs.is_empty() {
        anyhow::bail!(
            "No pairs in {:?} match currencies {:?}",
            config.instruments_path,
            config.currencies
        );
    }

    println!("Pairs: {}", pairs.join(", "));
    println!("Granularity: {}", config.granularity);
    println!("MA short: {:?}", config.ma_short);
    println!("MA long: {:?}\n", config.ma_long);

    //run sweep
    let source = CsvPriceSource::new(&config.data_dir);
    let engine = SweepEngine::new(SweepConfig::from(config), &catalog, &source);
    let report = engine.run(&pairs)?;

    if report.results.is_empty() && !report.failures.is_empty() {
        for failure in &report.failures {
            eprintln!("  {}: {}", failure.pair, failure.reason);
        }
        anyhow::bail!("All {} pairs failed, no report written", report.failures.len());
    }

    write_report(&report.results, &config.output_path)?;

    //display results
    println!("Top {} combinations by total gain", top);
    let ranked = rank_by_total_gain(&report.results);
    pretty_print_table(&ranked[..top.min(ranked.len())]);

    println!("\nBest combination per pair");
    pretty_print_table(&best_by_pair(&report.results));

    println!(
        "\n{} combinations, {} trades. Report saved to {:?}",
        report.results.len(),
        report.total_trades(),
        config.output_path
    );

    if !report.failures.is_empty() {
        println!("\nFailed pairs ({}):", report.failures.len());
        for failure in &report.failures {
            println!("  {}: {}", failure.pair, failure.reason);
        }
    }

    Ok(())
}
