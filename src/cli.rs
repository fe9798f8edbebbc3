//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::price_store::{CachedDataPort, PriceStore};
use crate::adapters::series_export::CsvSeriesExporter;
use crate::adapters::typst_report::TypstReportAdapter;
use crate::domain::config_validation::{
    DataConfig, build_data_config, build_pipeline_config, build_report_config,
};
use crate::domain::error::VoltrendError;
use crate::domain::pipeline::{PipelineConfig, PipelineOutput, run_pipeline};
use crate::domain::price::PriceSeries;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::{ReportData, ReportPort};

#[derive(Parser, Debug)]
#[command(
    name = "voltrend",
    about = "Trend-filtered, volatility-targeted position sizing"
)]
pub struct Cli {
    /// Log at debug level (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the signal pipeline and write a report
    Run {
        #[arg(short, long)]
        config: PathBuf,
        /// Override `[data] symbol`
        #[arg(long)]
        symbol: Option<String>,
        /// Override `[report] output`
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Also export every series as CSV to this path
        #[arg(long)]
        series: Option<PathBuf>,
    },
    /// Validate a configuration file without loading prices
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show the available price range for a symbol
    Info {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: Option<String>,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Run {
            config,
            symbol,
            output,
            series,
        } => run_signals(&config, symbol.as_deref(), output, series),
        Command::Validate { config } => run_validate(&config),
        Command::Info { config, symbol } => run_info(&config, symbol.as_deref()),
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| report_error(&e))
}

fn report_error(err: &VoltrendError) -> ExitCode {
    eprintln!("error: {err}");
    err.into()
}

fn load_data_config(
    adapter: &FileConfigAdapter,
    symbol_override: Option<&str>,
) -> Result<DataConfig, VoltrendError> {
    let mut data = build_data_config(adapter)?;
    if let Some(symbol) = symbol_override.map(str::trim).filter(|s| !s.is_empty()) {
        data.symbol = symbol.to_uppercase();
    }
    Ok(data)
}

/// Load prices for `data` through `data_port` and run the pipeline over them.
pub fn run_pipeline_with(
    data_port: &dyn DataPort,
    data: &DataConfig,
    config: &PipelineConfig,
) -> Result<(PriceSeries, PipelineOutput), VoltrendError> {
    let (start, end) = data.date_range();
    let prices = data_port.fetch_prices(&data.symbol, start, end)?;
    info!(
        symbol = %data.symbol,
        prices = prices.len(),
        "loaded price series"
    );
    let output = run_pipeline(&prices, config)?;
    Ok((prices, output))
}

fn run_signals(
    config_path: &Path,
    symbol_override: Option<&str>,
    output_override: Option<PathBuf>,
    series_override: Option<PathBuf>,
) -> ExitCode {
    // Stage 1: Load and validate config
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    let pipeline_config = match build_pipeline_config(&adapter) {
        Ok(c) => c,
        Err(e) => return report_error(&e),
    };
    let data_config = match load_data_config(&adapter, symbol_override) {
        Ok(c) => c,
        Err(e) => return report_error(&e),
    };
    let mut report_config = build_report_config(&adapter);
    if let Some(output) = output_override {
        report_config.output = output;
    }
    if series_override.is_some() {
        report_config.series_output = series_override;
    }

    // Stage 2: Load prices and run the pipeline
    let store = PriceStore::new();
    let data_port = CachedDataPort::new(CsvAdapter::new(data_config.path.clone()), &store);
    let (prices, output) = match run_pipeline_with(&data_port, &data_config, &pipeline_config) {
        Ok(r) => r,
        Err(e) => return report_error(&e),
    };

    // Stage 3: Console summary
    print_summary(&data_config.symbol, &output);

    // Stage 4: Reports
    let report = ReportData {
        symbol: &data_config.symbol,
        config: &pipeline_config,
        prices: &prices,
        output: &output,
    };
    let typst = TypstReportAdapter::new(
        report_config.template_path.clone(),
        report_config.regime_table,
    );
    if let Err(e) = typst.write(&report, &report_config.output) {
        return report_error(&e);
    }
    eprintln!("\nReport written to: {}", report_config.output.display());

    if let Some(series_path) = &report_config.series_output {
        if let Err(e) = CsvSeriesExporter::new().write(&report, series_path) {
            return report_error(&e);
        }
        eprintln!("Series written to: {}", series_path.display());
    }

    ExitCode::SUCCESS
}

fn print_summary(symbol: &str, output: &PipelineOutput) {
    eprintln!("\n=== {} ===", symbol);
    if let (Some(regime), Some(vol), Some(position)) = (
        output.regime.last(),
        output.volatility.last(),
        output.positions.last(),
    ) {
        eprintln!("As of:            {}", position.date);
        eprintln!(
            "Regime:           {}",
            if regime.is_bullish { "bullish" } else { "bearish" }
        );
        eprintln!("Realized Vol:     {:.2}%", vol.realized_vol * 100.0);
        eprintln!("Target Weight:    {:.4}", position.weight);
    }

    let summary = &output.summary;
    eprintln!("\n=== Performance ===");
    eprintln!("Total Return:     {:.2}%", summary.total_return * 100.0);
    eprintln!(
        "Annualized:       {:.2}%",
        summary.annualized_return * 100.0
    );
    eprintln!("Sharpe Ratio:     {:.2}", summary.sharpe_ratio);
    eprintln!("Max Drawdown:     -{:.1}%", summary.max_drawdown * 100.0);
    eprintln!("Time in Market:   {:.1}%", summary.time_in_market * 100.0);

    eprintln!("\n=== Horizons ===");
    for (horizon, series) in &output.pnl {
        let cumulative = series.last().map(|p| p.cumulative_return).unwrap_or(0.0);
        let sign = if cumulative >= 0.0 { "+" } else { "" };
        eprintln!(
            "  {:>5} periods:  {}{:.2}% over {} points",
            horizon,
            sign,
            cumulative * 100.0,
            series.len()
        );
    }
}

fn run_validate(config_path: &Path) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let pipeline_config = match build_pipeline_config(&adapter) {
        Ok(c) => c,
        Err(e) => return report_error(&e),
    };
    let data_config = match build_data_config(&adapter) {
        Ok(c) => c,
        Err(e) => return report_error(&e),
    };
    let report_config = build_report_config(&adapter);

    let horizons: Vec<String> = pipeline_config
        .horizons
        .iter()
        .map(|h| h.to_string())
        .collect();
    eprintln!("\nStrategy:");
    eprintln!("  trend_window:         {}", pipeline_config.trend_window);
    eprintln!("  vol_window:           {}", pipeline_config.vol_window);
    eprintln!(
        "  annualization_factor: {}",
        pipeline_config.annualization_factor
    );
    eprintln!(
        "  target_annual_vol:    {}",
        pipeline_config.target_annual_vol
    );
    eprintln!("  max_leverage:         {}", pipeline_config.max_leverage);
    eprintln!("  horizons:             {}", horizons.join(", "));
    eprintln!(
        "  minimum prices:       {}",
        pipeline_config.minimum_prices()
    );
    eprintln!("\nData:");
    eprintln!("  symbol: {}", data_config.symbol);
    eprintln!("  path:   {}", data_config.path.display());
    eprintln!("\nReport:");
    eprintln!("  output: {}", report_config.output.display());

    eprintln!("\nConfiguration is valid");
    ExitCode::SUCCESS
}

fn run_info(config_path: &Path, symbol_override: Option<&str>) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    let data_config = match load_data_config(&adapter, symbol_override) {
        Ok(c) => c,
        Err(e) => return report_error(&e),
    };

    let data_port = CsvAdapter::new(data_config.path.clone());
    match data_port.get_data_range(&data_config.symbol) {
        Ok(Some((first, last, count))) => {
            println!(
                "{}: {} to {} ({} prices)",
                data_config.symbol, first, last, count
            );
            if let Ok(pipeline_config) = build_pipeline_config(&adapter) {
                let needed = pipeline_config.minimum_prices();
                if count < needed {
                    eprintln!(
                        "warning: {} prices available, pipeline needs at least {}",
                        count, needed
                    );
                }
            }
            ExitCode::SUCCESS
        }
        Ok(None) => {
            eprintln!("No data for {}", data_config.symbol);
            ExitCode::SUCCESS
        }
        Err(e) => report_error(&e),
    }
}
