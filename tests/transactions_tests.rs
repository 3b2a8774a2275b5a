// Copyright (c) Vino contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

mod common;

use vino::cli;
use vino::commands::{stats, transactions};
use vino::error::ValidationError;
use vino::models::MonthYear;
use vino::store::DataStore;

fn rows(store: &DataStore, args: &[&str]) -> Result<Vec<transactions::TransactionRow>, ValidationError> {
    let argv = ["vino", "tx", "list"].iter().chain(args.iter()).copied();
    let matches = cli::build_cli().get_matches_from(argv);
    if let Some(("tx", tx_m)) = matches.subcommand() {
        if let Some(("list", list_m)) = tx_m.subcommand() {
            return transactions::query_rows(store, list_m);
        }
    }
    panic!("tx list not parsed");
}

fn ids(rows: &[transactions::TransactionRow]) -> Vec<&str> {
    rows.iter().map(|r| r.id.as_str()).collect()
}

#[test]
fn list_limit_respected() {
    let backend = common::fixture_backend();
    let store = common::store_for(&backend);
    let got = rows(&store, &["--month", "2026-02", "--limit", "2"]).unwrap();
    assert_eq!(ids(&got), ["t5", "t2"]);
    assert_eq!(got[0].date, "2026-02-15");
}

#[test]
fn category_name_and_amount_bounds() {
    let backend = common::fixture_backend();
    let store = common::store_for(&backend);
    let got = rows(&store, &["--category", " comida ", "--min", "100"]).unwrap();
    assert_eq!(ids(&got), ["t2", "t1"]);
    assert_eq!(got[0].category, "Comida");
    assert_eq!(got[0].subcategory, "Restaurantes");
    assert_eq!(got[1].merchant, "Coto");
}

#[test]
fn search_and_date_range() {
    let backend = common::fixture_backend();
    let store = common::store_for(&backend);
    assert_eq!(ids(&rows(&store, &["--search", "CENA"]).unwrap()), ["t2"]);
    let got = rows(&store, &["--from", "2026-01-01", "--to", "2026-02-05"]).unwrap();
    assert_eq!(ids(&got), ["t4", "t3"]);
}

#[test]
fn unknown_names_are_reported() {
    let backend = common::fixture_backend();
    let store = common::store_for(&backend);
    assert!(matches!(
        rows(&store, &["--category", "Viajes"]),
        Err(ValidationError::UnknownCategory(_))
    ));
    assert!(matches!(
        rows(&store, &["--from", "yesterday"]),
        Err(ValidationError::InvalidDate(_))
    ));
}

#[test]
fn stats_for_month() {
    let backend = common::fixture_backend();
    let store = common::store_for(&backend);
    let s = stats::compute(&store, MonthYear::new(1, 2026), 2);
    assert_eq!(s.period, "2026-02");
    assert_eq!(s.movements, 4);
    assert_eq!(s.expenses, 510.0);
    assert_eq!(s.income, 5000.0);
    let top: Vec<&str> = s.top.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(top, ["t1", "t2"]);
    assert_eq!(s.by_category[0].name, "Comida");
    assert_eq!(s.by_category[0].total, 450.0);
    assert_eq!(s.unknown_categories, 1);
}

fn edit(store: &mut DataStore, args: &[&str]) {
    let argv = ["vino", "tx", "edit"].iter().chain(args.iter()).copied();
    let matches = cli::build_cli().get_matches_from(argv);
    if let Some(("tx", tx_m)) = matches.subcommand() {
        transactions::handle(store, tx_m).unwrap();
    } else {
        panic!("tx edit not parsed");
    }
}

#[test]
fn income_can_be_edited_back_into_an_expense() {
    let backend = common::fixture_backend();
    let mut store = common::store_for(&backend);
    edit(&mut store, &["--id", "t4", "--merchant", "Coto", "--category", "Comida", "--expense"]);
    let writes = backend.writes();
    assert_eq!(writes[0].route(), "/movimientos/t4");
    assert_eq!(writes[0].json()["Monto"], -5000.0);

    edit(&mut store, &["--id", "t1", "--income"]);
    assert_eq!(backend.writes()[2].json()["Monto"], 300.0);
}

#[test]
fn editing_a_movement_with_unknown_references_asks_for_them() {
    let backend = common::fixture_backend();
    let mut store = common::store_for(&backend);
    edit(&mut store, &["--id", "t4", "--amount", "10"]);
    edit(&mut store, &["--id", "t4", "--merchant", "Coto", "--amount", "10"]);
    assert!(backend.writes().is_empty());
    // the income kind is kept when no flag is given
    edit(&mut store, &["--id", "t4", "--merchant", "Coto", "--category", "Comida", "--amount", "10"]);
    assert_eq!(backend.writes()[0].json()["Monto"], 10.0);
}

#[test]
fn unresolved_reference_message_names_the_flag() {
    let err = ValidationError::UnresolvedReference("merchant");
    assert_eq!(err.to_string(), "the movement's merchant is unknown; pass --merchant to set it");
}
