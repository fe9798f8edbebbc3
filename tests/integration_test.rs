//! Integration tests for the signal pipeline.
//!
//! Tests cover:
//! - The seven-price end-to-end scenario with hand-computed values
//! - Degenerate inputs (empty series, zero volatility, long horizons)
//! - Loader -> pipeline -> report wiring through MockDataPort
//! - Pipeline-level properties

mod common;

use approx::assert_relative_eq;
use common::*;
use voltrend::domain::error::VoltrendError;
use voltrend::domain::pipeline::run_pipeline;

mod end_to_end_scenario {
    use super::*;

    #[test]
    fn regime_flags() {
        let prices = make_series("2024-01-01", &E2E_PRICES);
        let out = run_pipeline(&prices, &e2e_config(&[5])).unwrap();

        let flags: Vec<bool> = out.regime.iter().map(|r| r.is_bullish).collect();
        assert_eq!(flags, vec![false, true, true, false, true]);
        assert_eq!(out.regime[0].date, date("2024-01-03"));
    }

    #[test]
    fn realized_volatility() {
        let prices = make_series("2024-01-01", &E2E_PRICES);
        let out = run_pipeline(&prices, &e2e_config(&[5])).unwrap();

        let expected = [0.3949386886, 0.4116940228, 0.6577243041, 0.7702584597];
        assert_eq!(out.volatility.len(), expected.len());
        assert_eq!(out.volatility[0].date, date("2024-01-04"));
        for (point, want) in out.volatility.iter().zip(expected) {
            assert_relative_eq!(point.realized_vol, want, epsilon = 1e-8);
        }
    }

    #[test]
    fn position_weights() {
        let prices = make_series("2024-01-01", &E2E_PRICES);
        let out = run_pipeline(&prices, &e2e_config(&[5])).unwrap();

        let expected = [0.2532, 0.2429, 0.0, 0.1298];
        assert_eq!(out.positions.len(), expected.len());
        for (point, want) in out.positions.iter().zip(expected) {
            assert!(
                (point.weight - want).abs() < 1e-4,
                "{}: got {}, want {}",
                point.date,
                point.weight,
                want
            );
        }
        // Bearish day is flat.
        assert_eq!(out.positions[2].weight, 0.0);
    }

    #[test]
    fn cumulative_pnl_full_horizon() {
        let prices = make_series("2024-01-01", &E2E_PRICES);
        let out = run_pipeline(&prices, &e2e_config(&[5])).unwrap();

        let pnl = &out.pnl[&5];
        // Three periods: the last position has no following price.
        assert_eq!(pnl.len(), 3);
        assert_eq!(pnl[0].date, date("2024-01-04"));
        assert_relative_eq!(pnl[0].cumulative_return, 0.0072343960, epsilon = 1e-8);
        assert_relative_eq!(pnl[1].cumulative_return, -0.0018269398, epsilon = 1e-8);
        assert_relative_eq!(pnl[2].cumulative_return, -0.0018269398, epsilon = 1e-8);
    }

    #[test]
    fn shorter_horizon_compounds_from_its_own_start() {
        let prices = make_series("2024-01-01", &E2E_PRICES);
        let out = run_pipeline(&prices, &e2e_config(&[2, 5])).unwrap();

        let short = &out.pnl[&2];
        assert_eq!(short.len(), 2);
        assert_eq!(short[0].date, date("2024-01-05"));
        assert_relative_eq!(short[0].cumulative_return, -0.0089962533, epsilon = 1e-8);
        assert_relative_eq!(short[1].cumulative_return, -0.0089962533, epsilon = 1e-8);
    }

    #[test]
    fn performance_summary() {
        let prices = make_series("2024-01-01", &E2E_PRICES);
        let out = run_pipeline(&prices, &e2e_config(&[5])).unwrap();

        assert_eq!(out.summary.periods, 3);
        assert_relative_eq!(out.summary.total_return, -0.0018269398, epsilon = 1e-8);
        assert_relative_eq!(out.summary.time_in_market, 0.6, epsilon = 1e-12);
        assert!(out.summary.max_drawdown > 0.0);
    }
}

mod degenerate_inputs {
    use super::*;
    use std::collections::BTreeSet;
    use voltrend::domain::pnl;
    use voltrend::domain::sizing;

    #[test]
    fn empty_sizing_inputs_give_empty_positions() {
        let positions = sizing::size(&[], &[], 0.1, 2.0).unwrap();
        assert!(positions.is_empty());
    }

    #[test]
    fn empty_positions_give_empty_series_per_horizon() {
        let prices = make_series("2024-01-01", &E2E_PRICES);
        let horizons: BTreeSet<usize> = [1, 21, 252].into_iter().collect();
        let result = pnl::compose(&[], &prices, &horizons);
        assert_eq!(result.len(), 3);
        assert!(result.values().all(|series| series.is_empty()));
    }

    #[test]
    fn zero_volatility_in_bull_regime_is_max_leverage() {
        // Doubling every period: identical returns, strictly rising price.
        let prices = make_series("2024-01-01", &[1.0, 2.0, 4.0, 8.0, 16.0, 32.0]);
        let out = run_pipeline(&prices, &e2e_config(&[3])).unwrap();

        assert!(out.volatility.iter().all(|v| v.realized_vol == 0.0));
        assert!(out.positions.iter().all(|p| p.weight == 2.0));
    }

    #[test]
    fn horizon_longer_than_history_uses_full_span() {
        let prices = make_series("2024-01-01", &E2E_PRICES);
        let out = run_pipeline(&prices, &e2e_config(&[5, 1000])).unwrap();
        assert_eq!(out.pnl[&1000], out.pnl[&5]);
    }

    #[test]
    fn too_few_prices_is_insufficient_data() {
        let prices = make_series("2024-01-01", &[100.0, 101.0, 102.0]);
        let err = run_pipeline(&prices, &e2e_config(&[5])).unwrap_err();
        assert!(matches!(err, VoltrendError::InsufficientData { .. }));
    }

    #[test]
    fn empty_price_series_is_insufficient_data() {
        let err = run_pipeline(&PriceSeries::empty(), &e2e_config(&[5])).unwrap_err();
        assert!(matches!(err, VoltrendError::InsufficientData { .. }));
    }
}

mod loader_to_report {
    use super::*;
    use voltrend::adapters::series_export::CsvSeriesExporter;
    use voltrend::adapters::typst_report::TypstReportAdapter;
    use voltrend::cli;
    use voltrend::domain::config_validation::DataConfig;
    use voltrend::ports::report_port::{ReportData, ReportPort};

    fn data_config(symbol: &str) -> DataConfig {
        DataConfig {
            symbol: symbol.to_string(),
            path: "unused".into(),
            start_date: None,
            end_date: None,
        }
    }

    #[test]
    fn mock_port_through_pipeline_and_reports() {
        let mock = MockDataPort::new()
            .with_prices("NFLX", make_points("2023-01-02", &generate_prices(120, 300.0)));
        let config = e2e_config(&[21, 63]);
        let data = data_config("NFLX");

        let (prices, output) = cli::run_pipeline_with(&mock, &data, &config).unwrap();
        assert_eq!(prices.len(), 120);
        assert_eq!(output.regime.len(), 118);
        assert_eq!(output.volatility.len(), 117);
        assert_eq!(output.positions.len(), 117);
        assert_eq!(output.pnl[&21].len(), 21);
        assert_eq!(output.pnl[&63].len(), 63);

        let dir = tempfile::TempDir::new().unwrap();
        let report = ReportData {
            symbol: "NFLX",
            config: &config,
            prices: &prices,
            output: &output,
        };
        let typ = dir.path().join("report.typ");
        let csv = dir.path().join("series.csv");
        TypstReportAdapter::default().write(&report, &typ).unwrap();
        CsvSeriesExporter::new().write(&report, &csv).unwrap();

        let content = std::fs::read_to_string(&typ).unwrap();
        assert!(content.contains("[NFLX]"));
        assert!(!content.contains("{{"));
        let rows = std::fs::read_to_string(&csv).unwrap();
        assert_eq!(rows.lines().count(), 121);
    }

    #[test]
    fn date_range_is_applied() {
        let mock = MockDataPort::new()
            .with_prices("SPY", make_points("2024-01-01", &generate_prices(30, 450.0)));
        let data = DataConfig {
            start_date: Some(date("2024-01-11")),
            end_date: Some(date("2024-01-20")),
            ..data_config("SPY")
        };
        let (prices, output) = cli::run_pipeline_with(&mock, &data, &e2e_config(&[5])).unwrap();
        assert_eq!(prices.len(), 10);
        assert_eq!(prices.first_date(), Some(date("2024-01-11")));
        assert_eq!(output.regime.len(), 8);
    }

    #[test]
    fn loader_failure_is_surfaced() {
        let mock = MockDataPort::new().with_error("BAD", "connection refused");
        let err = cli::run_pipeline_with(&mock, &data_config("BAD"), &e2e_config(&[5])).unwrap_err();
        assert!(matches!(err, VoltrendError::Data { .. }));
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn unknown_symbol_is_insufficient_data() {
        let mock = MockDataPort::new();
        let err = cli::run_pipeline_with(&mock, &data_config("NONE"), &e2e_config(&[5])).unwrap_err();
        assert!(matches!(err, VoltrendError::InsufficientData { .. }));
    }
}

mod properties {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    proptest! {
        #[test]
        fn positions_are_bounded_and_joined(
            prices in prop::collection::vec(1.0f64..1000.0, 12..80),
            trend_window in 2usize..8,
            vol_window in 2usize..8,
            max_leverage in 0.5f64..4.0,
        ) {
            let series = make_series("2020-01-01", &prices);
            let mut config = e2e_config(&[10]);
            config.trend_window = trend_window;
            config.vol_window = vol_window;
            config.max_leverage = max_leverage;

            let out = run_pipeline(&series, &config).unwrap();

            let regime_dates: HashSet<_> = out.regime.iter().map(|r| r.date).collect();
            let vol_dates: HashSet<_> = out.volatility.iter().map(|v| v.date).collect();
            prop_assert_eq!(
                out.positions.len(),
                regime_dates.intersection(&vol_dates).count()
            );
            for p in &out.positions {
                prop_assert!(p.weight >= 0.0 && p.weight <= max_leverage);
            }
            prop_assert!(out.pnl[&10].len() <= 10);
        }
    }
}
