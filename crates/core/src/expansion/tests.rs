//! Tests for entry expansion.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use treso_shared::types::{CategoryId, EntryId, TransactionId, round_cents};

use super::service::EntryExpander;
use super::tax::declaration_windows;
use super::types::{
    ExpansionInput, ExpansionMode, Periodicity, RegimeType, TaxBase, TaxConfig, VatRegime,
};
use super::vat::split_gross;
use crate::cache::MokaResultCache;
use crate::entry::{
    AmountType, Category, CategoryCatalog, Derivation, Direction, Entry, FrequencyClass, Payment,
    VAT_COLLECTED, VAT_DEDUCTIBLE,
};
use crate::period::{CalendarView, Period, PeriodCalendar};
use crate::reconcile::{ActualTransaction, TransactionPayment};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn gross(
    id: &str,
    direction: Direction,
    frequency: FrequencyClass,
    start: NaiveDate,
    ht: Decimal,
    ttc: Decimal,
) -> Entry {
    Entry {
        amount_type: AmountType::Gross,
        vat_rate: Some(dec!(20)),
        amount_ht: Some(ht),
        amount_ttc: Some(ttc),
        ..Entry::new(id, ttc, direction, frequency, start)
    }
}

fn months(anchor: NaiveDate, horizon: u32) -> Vec<Period> {
    PeriodCalendar::generate(CalendarView::Month, anchor, 0, horizon)
}

fn monthly_regime(delay: u32) -> VatRegime {
    VatRegime {
        name: "normal".to_string(),
        regime_type: RegimeType::Monthly,
        payment_delay_months: delay,
    }
}

fn tax(tax_type: &str, base_type: TaxBase, periodicity: Periodicity, rate: Decimal) -> TaxConfig {
    TaxConfig {
        tax_type: tax_type.to_string(),
        tax_name: tax_type.to_uppercase(),
        rate,
        base_type,
        declaration_periodicity: periodicity,
        payment_delay_months: 1,
        category_ids: Vec::new(),
    }
}

fn transaction(
    id: &str,
    direction: Direction,
    category: &str,
    payments: &[(NaiveDate, Decimal)],
) -> ActualTransaction {
    ActualTransaction {
        id: TransactionId::new(id),
        budget_id: None,
        payments: payments
            .iter()
            .map(|&(payment_date, paid_amount)| TransactionPayment {
                payment_date,
                paid_amount,
            })
            .collect(),
        category_id: Some(CategoryId::new(category)),
        direction: Some(direction),
    }
}

#[test]
fn test_gross_inflow_is_split_into_net_and_collected_vat() {
    let catalog = CategoryCatalog::default();
    let periods = months(date(2024, 1, 1), 1);
    let entry = gross(
        "e1",
        Direction::Inflow,
        FrequencyClass::OneTime,
        date(2024, 1, 15),
        dec!(1000),
        dec!(1200),
    );
    let expanded = EntryExpander::expand(&[entry], &ExpansionInput::new(&catalog, &periods));

    assert_eq!(expanded.len(), 2);
    let (net, child) = (&expanded[0], &expanded[1]);
    assert_eq!(net.id.as_str(), "e1");
    assert_eq!(net.amount, Some(dec!(1000)));
    assert_eq!(net.amount_type, AmountType::Net);
    assert!(!net.is_derived());

    assert_eq!(child.id.as_str(), "e1_vat");
    assert_eq!(child.amount, Some(dec!(200)));
    assert_eq!(child.category.as_str(), VAT_COLLECTED);
    assert_eq!(child.direction, Direction::Inflow);
    assert_eq!(child.start_date, net.start_date);
    assert_eq!(child.parent_id(), Some(&EntryId::new("e1")));
}

#[test]
fn test_gross_outflow_uses_configured_deductible_category() {
    let catalog = CategoryCatalog::new([Category {
        id: CategoryId::new("cat_44566"),
        name: VAT_DEDUCTIBLE.to_lowercase(),
        parent_id: None,
    }]);
    let entry = gross(
        "rent",
        Direction::Outflow,
        FrequencyClass::Monthly,
        date(2024, 1, 5),
        dec!(500),
        dec!(600),
    );
    let (_, child) = split_gross(&entry, &catalog).unwrap();
    assert_eq!(child.category.as_str(), "cat_44566");
    assert_eq!(child.frequency, FrequencyClass::Monthly);
}

#[test]
fn test_negligible_vat_is_not_split() {
    let entry = gross(
        "e1",
        Direction::Inflow,
        FrequencyClass::OneTime,
        date(2024, 1, 15),
        dec!(1000),
        dec!(1000.01),
    );
    assert!(split_gross(&entry, &CategoryCatalog::default()).is_none());

    let net = Entry::new("e2", dec!(10), Direction::Inflow, FrequencyClass::OneTime, date(2024, 1, 1));
    assert!(split_gross(&net, &CategoryCatalog::default()).is_none());
}

#[test]
fn test_irregular_payments_are_shared_pro_rata() {
    let entry = Entry {
        payments: vec![
            Payment { date: date(2024, 2, 1), amount: dec!(600) },
            Payment { date: date(2024, 5, 1), amount: dec!(600) },
        ],
        ..gross(
            "p",
            Direction::Outflow,
            FrequencyClass::Irregular,
            date(2024, 1, 1),
            dec!(1000),
            dec!(1200),
        )
    };
    let (net, child) = split_gross(&entry, &CategoryCatalog::default()).unwrap();
    assert!(net.payments.iter().all(|p| p.amount == dec!(500)));
    assert!(child.payments.iter().all(|p| p.amount == dec!(100)));
    assert_eq!(child.payments.len(), 2);
}

#[test]
fn test_vat_payments_per_period_with_credit() {
    let catalog = CategoryCatalog::default();
    let periods = months(date(2024, 1, 1), 3);
    let regime = monthly_regime(1);
    let entries = [
        gross(
            "sale",
            Direction::Inflow,
            FrequencyClass::OneTime,
            date(2024, 1, 15),
            dec!(1000),
            dec!(1200),
        ),
        gross(
            "purchase",
            Direction::Outflow,
            FrequencyClass::OneTime,
            date(2024, 2, 10),
            dec!(500),
            dec!(600),
        ),
    ];
    let input = ExpansionInput {
        vat_regime: Some(&regime),
        ..ExpansionInput::new(&catalog, &periods)
    };
    let expanded = EntryExpander::expand(&entries, &input);
    let dues: Vec<&Entry> = expanded.iter().filter(|e| e.is_payment_due()).collect();
    assert_eq!(dues.len(), 2);

    assert_eq!(dues[0].id.as_str(), "vat_due_2024-01-01");
    assert_eq!(dues[0].amount, Some(dec!(200)));
    assert_eq!(dues[0].direction, Direction::Outflow);
    assert_eq!(dues[0].start_date, Some(date(2024, 2, 1)));
    assert_eq!(dues[0].frequency, FrequencyClass::OneTime);
    assert_eq!(dues[0].third_party.as_deref(), Some("State"));
    assert_eq!(
        dues[0].derivation,
        Some(Derivation::VatPayment {
            associated_entry_ids: vec![EntryId::new("sale")],
        })
    );

    assert_eq!(dues[1].id.as_str(), "vat_due_2024-02-01");
    assert_eq!(dues[1].amount, Some(dec!(100)));
    assert_eq!(dues[1].direction, Direction::Inflow);
    assert_eq!(dues[1].start_date, Some(date(2024, 3, 1)));
}

#[test]
fn test_vat_due_is_cached_per_child_contents() {
    let catalog = CategoryCatalog::default();
    let periods = months(date(2024, 1, 1), 1);
    let regime = monthly_regime(1);
    let cache = MokaResultCache::new();
    let due_for = |ttc: Decimal| {
        let entries = [gross(
            "sale",
            Direction::Inflow,
            FrequencyClass::OneTime,
            date(2024, 1, 15),
            dec!(1000),
            ttc,
        )];
        let input = ExpansionInput {
            vat_regime: Some(&regime),
            cache: &cache,
            ..ExpansionInput::new(&catalog, &periods)
        };
        EntryExpander::expand(&entries, &input)
            .into_iter()
            .find(|e| e.is_payment_due())
            .and_then(|e| e.amount)
    };

    assert_eq!(due_for(dec!(1200)), Some(dec!(200)));
    cache.run_pending_tasks();
    assert_eq!(cache.entry_count(), 1);
    assert_eq!(due_for(dec!(1200)), Some(dec!(200)));
    assert_eq!(due_for(dec!(1500)), Some(dec!(500)));
    cache.run_pending_tasks();
    assert_eq!(cache.entry_count(), 2);
}

#[test]
fn test_bounded_recurring_vat_is_prorated_across_periods() {
    let catalog = CategoryCatalog::default();
    let periods = months(date(2024, 1, 1), 3);
    let regime = monthly_regime(0);
    let entry = Entry {
        end_date: Some(date(2024, 3, 31)),
        ..gross(
            "sub",
            Direction::Inflow,
            FrequencyClass::Monthly,
            date(2024, 1, 1),
            dec!(100),
            dec!(120),
        )
    };
    let input = ExpansionInput {
        vat_regime: Some(&regime),
        ..ExpansionInput::new(&catalog, &periods)
    };
    let expanded = EntryExpander::expand(&[entry], &input);
    let amounts: Vec<Decimal> = expanded
        .iter()
        .filter(|e| e.is_payment_due())
        .filter_map(|e| e.amount)
        .collect();
    assert_eq!(amounts, vec![dec!(20.44), dec!(19.12), dec!(20.44)]);
    assert_eq!(amounts.iter().copied().sum::<Decimal>(), dec!(60));
}

#[test]
fn test_exempt_and_unknown_regimes_produce_no_vat_payments() {
    let catalog = CategoryCatalog::default();
    let periods = months(date(2024, 1, 1), 3);
    let entries = [gross(
        "sale",
        Direction::Inflow,
        FrequencyClass::Monthly,
        date(2024, 1, 15),
        dec!(1000),
        dec!(1200),
    )];
    for regime_type in [RegimeType::Exempt, RegimeType::Unknown] {
        let regime = VatRegime {
            regime_type,
            ..monthly_regime(1)
        };
        let input = ExpansionInput {
            vat_regime: Some(&regime),
            ..ExpansionInput::new(&catalog, &periods)
        };
        let expanded = EntryExpander::expand(&entries, &input);
        assert_eq!(expanded.len(), 2);
        assert!(expanded.iter().all(|e| !e.is_payment_due()));
    }
}

#[test]
fn test_consolidated_or_single_period_skips_payments() {
    let catalog = CategoryCatalog::default();
    let regime = monthly_regime(1);
    let entries = [gross(
        "sale",
        Direction::Inflow,
        FrequencyClass::Monthly,
        date(2024, 1, 15),
        dec!(1000),
        dec!(1200),
    )];

    let periods = months(date(2024, 1, 1), 3);
    let consolidated = ExpansionInput {
        vat_regime: Some(&regime),
        mode: ExpansionMode::Consolidated,
        ..ExpansionInput::new(&catalog, &periods)
    };
    assert_eq!(EntryExpander::expand(&entries, &consolidated).len(), 2);

    let single = months(date(2024, 1, 1), 1);
    let one_period = ExpansionInput {
        vat_regime: Some(&regime),
        ..ExpansionInput::new(&catalog, &single)
    };
    assert_eq!(EntryExpander::expand(&entries, &one_period).len(), 2);
}

#[test]
fn test_revenue_tax_per_quarter() {
    let catalog = CategoryCatalog::default();
    let periods = months(date(2024, 2, 1), 3);
    let taxes = [tax("cfe", TaxBase::Revenue, Periodicity::Quarterly, dec!(10))];
    let transactions = [
        transaction(
            "t1",
            Direction::Inflow,
            "sales",
            &[(date(2024, 1, 20), dec!(1000)), (date(2024, 4, 10), dec!(500))],
        ),
        transaction("t2", Direction::Outflow, "rent", &[(date(2024, 2, 3), dec!(300))]),
    ];
    let input = ExpansionInput {
        taxes: &taxes,
        transactions: &transactions,
        ..ExpansionInput::new(&catalog, &periods)
    };
    let expanded = EntryExpander::expand(&[], &input);
    assert_eq!(expanded.len(), 2);

    assert_eq!(expanded[0].id.as_str(), "tax_cfe_2024-01-01");
    assert_eq!(expanded[0].amount, Some(dec!(100)));
    assert_eq!(expanded[0].direction, Direction::Outflow);
    assert_eq!(expanded[0].start_date, Some(date(2024, 2, 1)));
    assert_eq!(
        expanded[0].derivation,
        Some(Derivation::TaxPayment {
            tax_type: "cfe".to_string(),
            associated_transaction_ids: vec![TransactionId::new("t1")],
        })
    );

    assert_eq!(expanded[1].id.as_str(), "tax_cfe_2024-04-01");
    assert_eq!(expanded[1].amount, Some(dec!(50)));
    assert_eq!(expanded[1].start_date, Some(date(2024, 5, 1)));
}

#[test]
fn test_tax_bases_and_category_filter() {
    let catalog = CategoryCatalog::default();
    let periods = months(date(2024, 1, 1), 2);
    let transactions = [
        transaction("in", Direction::Inflow, "sales", &[(date(2024, 1, 10), dec!(1000))]),
        transaction("pay", Direction::Outflow, "salaries", &[(date(2024, 1, 25), dec!(800))]),
        transaction("buy", Direction::Outflow, "supplies", &[(date(2024, 1, 28), dec!(200))]),
    ];
    let payroll = TaxConfig {
        category_ids: vec![CategoryId::new("salaries")],
        ..tax("payroll", TaxBase::Payroll, Periodicity::Monthly, dec!(12.5))
    };
    let taxes = [
        payroll,
        tax("expense", TaxBase::Expense, Periodicity::Monthly, dec!(1)),
        tax("loss", TaxBase::Profit, Periodicity::Monthly, dec!(25)),
        tax("other", TaxBase::Unknown, Periodicity::Monthly, dec!(50)),
    ];
    let input = ExpansionInput {
        taxes: &taxes,
        transactions: &transactions,
        ..ExpansionInput::new(&catalog, &periods)
    };
    let expanded = EntryExpander::expand(&[], &input);
    let summary: Vec<(&str, Option<Decimal>)> =
        expanded.iter().map(|e| (e.id.as_str(), e.amount)).collect();
    assert_eq!(
        summary,
        vec![
            ("tax_payroll_2024-01-01", Some(dec!(100))),
            ("tax_expense_2024-01-01", Some(dec!(10))),
            // Profit is 1000 - 1000 = 0: nothing due.
        ]
    );
}

#[test]
fn test_failing_tax_is_skipped_alone() {
    let catalog = CategoryCatalog::default();
    let periods = months(date(2024, 1, 1), 2);
    let transactions = [transaction(
        "in",
        Direction::Inflow,
        "sales",
        &[(date(2024, 1, 10), dec!(1000))],
    )];
    let taxes = [
        tax("broken", TaxBase::Revenue, Periodicity::Unknown, dec!(10)),
        tax("negative", TaxBase::Revenue, Periodicity::Monthly, dec!(-10)),
        tax("ok", TaxBase::Revenue, Periodicity::Annual, dec!(10)),
    ];
    let input = ExpansionInput {
        taxes: &taxes,
        transactions: &transactions,
        ..ExpansionInput::new(&catalog, &periods)
    };
    let expanded = EntryExpander::expand(&[], &input);
    assert_eq!(expanded.len(), 1);
    assert_eq!(expanded[0].id.as_str(), "tax_ok_2024-01-01");
    assert_eq!(expanded[0].amount, Some(dec!(100)));
}

#[test]
fn test_overflowing_tax_is_skipped_alone() {
    let catalog = CategoryCatalog::default();
    let periods = months(date(2024, 1, 1), 2);
    let transactions = [transaction(
        "in",
        Direction::Inflow,
        "sales",
        &[(date(2024, 1, 10), dec!(1000))],
    )];
    let taxes = [
        tax("huge", TaxBase::Revenue, Periodicity::Monthly, Decimal::MAX),
        tax("ok", TaxBase::Revenue, Periodicity::Annual, dec!(10)),
    ];
    let input = ExpansionInput {
        taxes: &taxes,
        transactions: &transactions,
        ..ExpansionInput::new(&catalog, &periods)
    };
    let expanded = EntryExpander::expand(&[], &input);
    assert_eq!(expanded.len(), 1);
    assert_eq!(expanded[0].id.as_str(), "tax_ok_2024-01-01");

    let transactions = [
        transaction("a", Direction::Inflow, "sales", &[(date(2024, 1, 10), Decimal::MAX)]),
        transaction("b", Direction::Inflow, "sales", &[(date(2024, 1, 11), Decimal::MAX)]),
    ];
    let input = ExpansionInput {
        taxes: &taxes[1..],
        transactions: &transactions,
        ..ExpansionInput::new(&catalog, &periods)
    };
    assert!(EntryExpander::expand(&[], &input).is_empty());
}

#[test]
fn test_declaration_windows_are_aligned_on_fiscal_year() {
    let periods = months(date(2024, 5, 1), 3);
    assert_eq!(
        declaration_windows(3, &periods),
        vec![
            (date(2024, 4, 1), date(2024, 7, 1)),
            (date(2024, 7, 1), date(2024, 10, 1)),
        ]
    );
    assert_eq!(
        declaration_windows(12, &periods),
        vec![(date(2024, 1, 1), date(2025, 1, 1))]
    );
    assert!(declaration_windows(1, &[]).is_empty());
}

#[test]
fn test_expand_is_idempotent_with_payments() {
    let catalog = CategoryCatalog::default();
    let periods = months(date(2024, 1, 1), 6);
    let regime = monthly_regime(1);
    let taxes = [tax("cfe", TaxBase::Revenue, Periodicity::Quarterly, dec!(2))];
    let transactions = [transaction(
        "t1",
        Direction::Inflow,
        "sales",
        &[(date(2024, 2, 1), dec!(5000))],
    )];
    let entries = [
        gross(
            "sale",
            Direction::Inflow,
            FrequencyClass::Monthly,
            date(2024, 1, 31),
            dec!(1000),
            dec!(1200),
        ),
        gross(
            "rent",
            Direction::Outflow,
            FrequencyClass::Quarterly,
            date(2024, 1, 5),
            dec!(900),
            dec!(1080),
        ),
        Entry::new("misc", dec!(50), Direction::Outflow, FrequencyClass::Weekly, date(2024, 1, 2)),
    ];
    let input = ExpansionInput {
        vat_regime: Some(&regime),
        taxes: &taxes,
        transactions: &transactions,
        ..ExpansionInput::new(&catalog, &periods)
    };
    let once = EntryExpander::expand(&entries, &input);
    let twice = EntryExpander::expand(&once, &input);
    assert_eq!(once, twice);
    assert!(once.iter().any(|e| e.is_payment_due()));
}

fn gross_strategy() -> impl Strategy<Value = Entry> {
    (
        1i64..10_000_000,
        prop::sample::select(vec![dec!(0), dec!(2.1), dec!(5.5), dec!(10), dec!(20)]),
        any::<bool>(),
        prop::sample::select(vec![
            FrequencyClass::OneTime,
            FrequencyClass::Monthly,
            FrequencyClass::Quarterly,
            FrequencyClass::Annual,
        ]),
        1u32..=28,
    )
        .prop_map(|(cents, rate, inflow, frequency, day)| {
            let ht = Decimal::new(cents, 2);
            let ttc = round_cents(ht * (Decimal::ONE_HUNDRED + rate) / Decimal::ONE_HUNDRED);
            let direction = if inflow {
                Direction::Inflow
            } else {
                Direction::Outflow
            };
            Entry {
                vat_rate: Some(rate),
                ..gross("g", direction, frequency, date(2024, 1, day), ht, ttc)
            }
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Expanding an expanded set changes nothing.
    #[test]
    fn prop_expand_idempotent(entry in gross_strategy()) {
        let catalog = CategoryCatalog::default();
        let periods = months(date(2024, 1, 1), 4);
        let regime = monthly_regime(1);
        let input = ExpansionInput {
            vat_regime: Some(&regime),
            ..ExpansionInput::new(&catalog, &periods)
        };
        let once = EntryExpander::expand(&[entry], &input);
        let twice = EntryExpander::expand(&once, &input);
        prop_assert_eq!(once, twice);
    }

    /// The net entry and VAT child always add back up to the gross amount.
    #[test]
    fn prop_split_preserves_gross(entry in gross_strategy()) {
        if let Some((net, child)) = split_gross(&entry, &CategoryCatalog::default()) {
            prop_assert_eq!(net.amount.unwrap() + child.amount.unwrap(), entry.amount_ttc.unwrap());
            prop_assert!(child.is_vat_child());
        }
    }
}
