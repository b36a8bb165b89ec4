use clap::Parser;
use city_distance::core::export::ReportExporter;
use city_distance::utils::{logger, validation::Validate};
use city_distance::{
    CalculatorSession, CliArgs, Command, Console, Flow, GeocodeResolver, HistoryLedger,
    LocalStorage, NominatimGeocoder,
};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    if args.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(args.verbose);
    }

    let config = match args.load_config().and_then(|config| {
        config.validate()?;
        Ok(config)
    }) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration failed: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };
    tracing::debug!("Config: {:?}", config);

    // 建立各元件
    let geocoder = NominatimGeocoder::new(&config.geocoder)?;
    let storage = LocalStorage::new(config.export.output_path.clone());
    let exporter = ReportExporter::with_layout(
        storage,
        config.export.file_name.clone(),
        config.export.layout.clone(),
    );
    let session = CalculatorSession::with_ledger(
        GeocodeResolver::new(geocoder),
        exporter,
        HistoryLedger::with_capacity(config.history.capacity),
    );
    let mut console = Console::new(session, config.place_catalog())?;

    tracing::info!("Geocoding via {}", config.geocoder.endpoint);
    println!("City Distance Calculator. Type 'help' for commands.");

    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        let result = match Command::parse(&line) {
            Ok(Some(command)) => console.execute(command).await,
            Ok(None) => continue,
            Err(e) => Err(e),
        };

        match result {
            Ok(Flow::Continue(output)) => println!("{}", output),
            Ok(Flow::Quit) => break,
            Err(e) => {
                tracing::debug!("Command failed: {}", e);
                eprintln!("❌ {}", e.user_friendly_message());
            }
        }
    }

    Ok(())
}
