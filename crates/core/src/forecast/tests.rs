//! End-to-end forecast tests.

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal_macros::dec;
use serde_json::json;
use treso_shared::AppConfig;

use super::engine::{EngineSettings, ForecastEngine};
use super::types::{ForecastReport, ForecastRequest};
use crate::aggregate::Totals;
use crate::cache::NoopCache;
use crate::entry::FrequencyClass;
use crate::expansion::ExpansionMode;

fn request() -> ForecastRequest {
    serde_json::from_value(json!({
        "view": "month",
        "anchor": "2024-01-15",
        "horizon": 3,
        "entries": [
            {
                "id": "e1", "amount": 1000, "direction": "inflow", "frequency": "monthly",
                "startDate": "2024-01-05", "budgetId": 42, "categoryId": "sales_online"
            },
            {
                "id": "e2", "amount": 600, "direction": "outflow", "frequency": "one-time",
                "startDate": "2024-02-10", "amountType": "gross", "vatRate": 20,
                "amountHt": 500, "amountTtc": 600, "categoryId": "it"
            },
            {
                "id": "e3", "amount": "abc", "direction": "outflow", "frequency": "monthly",
                "startDate": "2024-01-01"
            }
        ],
        "categories": [
            { "id": "sales", "name": "Sales" },
            { "id": "sales_online", "name": "Online", "parentId": "sales" }
        ],
        "vatRegime": { "name": "normal", "regimeType": "monthly", "paymentDelayMonths": 1 },
        "realBudgetItems": [
            { "budgetId": "42", "collectionDate": "2024-01-20", "collectionAmount": 300 }
        ],
        "transactions": [
            { "id": "t1", "budgetId": "e1", "payments": [
                { "paymentDate": "2024-01-25", "paidAmount": 100 }
            ]}
        ],
        "cashAccounts": [
            { "id": "bank", "initialBalance": 10000 },
            { "id": "new", "initial_amount": 0, "isConfigured": false }
        ]
    }))
    .unwrap()
}

fn engine() -> ForecastEngine {
    ForecastEngine::new(Arc::new(NoopCache), EngineSettings::default())
}

#[test]
fn test_full_pipeline() {
    let report = engine().run(&request());

    assert_eq!(report.starting_balance, dec!(10000));
    assert_eq!(report.periods.len(), 3);
    assert_eq!(report.issues.len(), 1);

    let budget_finals: Vec<_> = report
        .periods
        .iter()
        .map(|p| p.budget_position.final_balance)
        .collect();
    // Jan +1000; Feb +1000 -500 -100; Mar +1000 and the VAT credit of 100.
    assert_eq!(budget_finals, vec![dec!(11000), dec!(11400), dec!(12500)]);

    let actual_finals: Vec<_> = report
        .periods
        .iter()
        .map(|p| p.actual_position.final_balance)
        .collect();
    // The collection wins over the transaction.
    assert_eq!(actual_finals, vec![dec!(10300), dec!(10300), dec!(10300)]);
    assert_eq!(report.periods[0].reste, dec!(700));

    for window in report.periods.windows(2) {
        assert_eq!(
            window[1].budget_position.initial,
            window[0].budget_position.final_balance
        );
        assert_eq!(
            window[1].actual_position.initial,
            window[0].actual_position.final_balance
        );
    }

    let row_ids: Vec<&str> = report.rows.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(row_ids, vec!["e1", "e2", "e2_vat", "e3", "vat_due_2024-02-01"]);
    let vat_due = report.rows.last().unwrap();
    assert!(vat_due.derived);
    assert_eq!(vat_due.cells[2].budget, dec!(100));

    let jan_categories: Vec<(&str, rust_decimal::Decimal)> = report.periods[0]
        .categories
        .iter()
        .map(|c| (c.category.as_str(), c.totals.budget))
        .collect();
    assert!(jan_categories.contains(&("sales", dec!(1000))));
}

#[test]
fn test_frequency_filter_hides_rows_but_not_positions() {
    let all = engine().run(&request());
    let mut filtered_request = request();
    filtered_request.visible_frequencies = vec![FrequencyClass::Monthly];
    let filtered = engine().run(&filtered_request);

    let row_ids: Vec<&str> = filtered.rows.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(row_ids, vec!["e1", "e3"]);
    assert_eq!(
        filtered.periods.last().unwrap().budget_position,
        all.periods.last().unwrap().budget_position
    );
}

#[test]
fn test_consolidated_mode_has_no_payment_rows() {
    let mut consolidated = request();
    consolidated.mode = ExpansionMode::Consolidated;
    let report = engine().run(&consolidated);
    assert!(report.rows.iter().all(|r| !r.id.as_str().starts_with("vat_due_")));
    assert_eq!(
        report.periods.last().unwrap().budget_position.final_balance,
        dec!(12400)
    );
}

#[test]
fn test_unknown_view_falls_back_to_one_day() {
    let report = engine().run(&ForecastRequest::new(
        "fortnightly-ish",
        NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
    ));
    assert_eq!(report.periods.len(), 1);
    assert_eq!(report.periods[0].period.days(), 1);
}

#[test]
fn test_cached_engine_matches_uncached() {
    let cached = ForecastEngine::from_config(&AppConfig::default());
    let first = cached.run(&request());
    let second = cached.run(&request());
    assert_eq!(first, second);
    assert_eq!(first, engine().run(&request()));
}

#[test]
fn test_default_horizon_applies() {
    let engine = ForecastEngine::new(
        Arc::new(NoopCache),
        EngineSettings {
            default_horizon: 4,
            placeholder_balance: dec!(0),
        },
    );
    let report = engine.run(&ForecastRequest::new(
        "quarter",
        NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
    ));
    assert_eq!(report.periods.len(), 4);
}

#[test]
fn test_report_round_trips_through_json() {
    let report = engine().run(&request());
    let json = serde_json::to_string(&report).unwrap();
    assert!(json.contains("\"final\""));
    let back: ForecastReport = serde_json::from_str(&json).unwrap();
    assert_eq!(back, report);
}

fn single_entry_request(view: &str, entry: serde_json::Value) -> ForecastRequest {
    serde_json::from_value(json!({
        "view": view,
        "anchor": "2024-01-15",
        "horizon": 1,
        "entries": [entry],
        "cashAccounts": [{ "id": "bank", "initialBalance": 1000 }]
    }))
    .unwrap()
}

fn collected_entry(amount: u32, collected: u32) -> ForecastRequest {
    single_entry_request(
        "month",
        json!({
            "id": "e1", "amount": amount, "direction": "inflow", "frequency": "monthly",
            "startDate": "2024-01-05",
            "collectionData": { "collection": [
                { "collectionDate": "2024-01-20", "collectionAmount": collected }
            ]}
        }),
    )
}

#[test]
fn test_reused_engine_sees_changed_inputs() {
    let shared = ForecastEngine::default();
    let first = shared.run(&collected_entry(100, 50));
    assert_eq!(first.rows[0].cells[0], Totals::new(dec!(100), dec!(50)));

    let changed = collected_entry(999, 777);
    let second = shared.run(&changed);
    assert_eq!(second.rows[0].cells[0], Totals::new(dec!(999), dec!(777)));
    assert_eq!(second, ForecastEngine::default().run(&changed));
    assert_eq!(second.periods[0].budget_position.final_balance, dec!(1999));
    assert_eq!(second.periods[0].actual_position.final_balance, dec!(1777));
}

#[test]
fn test_out_of_range_amount_is_reported_not_computed() {
    let report = engine().run(&single_entry_request(
        "quarter",
        json!({
            "id": "huge", "amount": "50000000000000000000000000000", "direction": "outflow",
            "frequency": "monthly", "startDate": "2024-01-01"
        }),
    ));
    assert_eq!(report.issues.len(), 1);
    assert_eq!(report.rows[0].cells[0], Totals::default());
    assert_eq!(report.periods[0].budget_position.final_balance, dec!(1000));

    let report = engine().run(&single_entry_request(
        "quarter",
        json!({
            "id": "max", "amount": "1000000000000000", "direction": "inflow",
            "frequency": "monthly", "startDate": "2024-01-01"
        }),
    ));
    assert!(report.issues.is_empty());
    assert_eq!(report.rows[0].cells[0].budget, dec!(3000000000000000));
}
