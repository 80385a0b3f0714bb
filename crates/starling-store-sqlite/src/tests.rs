//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::NaiveDate;
use starling_core::{
  grain::FactTable,
  record::{RepRecord, TxnRecord},
  star::{
    ALL_KEY, DateDimRow, Dimension, DimensionRow, FactRow, Quarter,
    time_key,
  },
  store::MartStore,
};

use crate::{Error, SqliteStore};

fn store() -> SqliteStore {
  SqliteStore::open_in_memory().expect("in-memory store")
}

fn rep(id: &str, first: &str, last: &str, territory: &str) -> RepRecord {
  RepRecord {
    rep_id:     id.into(),
    first_name: first.into(),
    last_name:  last.into(),
    territory:  territory.into(),
  }
}

fn txn(
  id: &str,
  date: &str,
  customer: &str,
  product: &str,
  amount: i64,
  country: &str,
  rep_id: &str,
) -> TxnRecord {
  TxnRecord {
    txn_id: id.into(),
    date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
    customer: customer.into(),
    product: product.into(),
    quantity: 1,
    amount,
    country: country.into(),
    rep_id: rep_id.into(),
  }
}

fn sample_reps() -> Vec<RepRecord> {
  vec![
    rep("R1", "Jane", "Doe", "Northeast"),
    rep("R2", "Ken", "Akamatsu", "Pacific"),
  ]
}

fn sample_txns() -> Vec<TxnRecord> {
  vec![
    txn("t-1", "2020-02-15", "Acme", "Aspirin", 100, "USA", "R1"),
    txn("t-2", "2020-05-10", "Beta", "Ibuprofen", 200, "Canada", "R2"),
    txn("t-3", "2021-01-01", "Acme", "Aspirin", 50, "USA", "R1"),
  ]
}

// ─── Normalized store ────────────────────────────────────────────────────────

#[test]
fn rebuild_normalized_counts() {
  let s = store();
  let counts = s
    .rebuild_normalized(&sample_reps(), &sample_txns())
    .unwrap();

  assert_eq!(counts.transactions, 3);
  assert_eq!(counts.reps, 2);
  assert_eq!(counts.territories, 2);
  assert_eq!(counts.products, 2);
  assert_eq!(counts.customers, 2);
  assert_eq!(counts.countries, 2);
}

#[test]
fn rebuild_is_full_replace() {
  let s = store();
  s.rebuild_normalized(&sample_reps(), &sample_txns()).unwrap();

  // A second rebuild must not accumulate rows from the first.
  let counts = s
    .rebuild_normalized(&sample_reps(), &sample_txns())
    .unwrap();
  assert_eq!(counts.transactions, 3);
  assert_eq!(s.transaction_facts().unwrap().len(), 3);
}

#[test]
fn unknown_rep_fails_and_rolls_back() {
  let s = store();
  let txns =
    vec![txn("t-1", "2020-02-15", "Acme", "Aspirin", 100, "USA", "R9")];

  let err = s.rebuild_normalized(&sample_reps(), &txns).unwrap_err();
  assert!(matches!(
    err,
    Error::UnknownRep { ref rep_id, .. } if rep_id == "R9"
  ));

  // The partial load was rolled back.
  assert!(s.transaction_facts().unwrap().is_empty());
}

#[test]
fn transaction_facts_join_natural_keys() {
  let s = store();
  s.rebuild_normalized(&sample_reps(), &sample_txns()).unwrap();

  let facts = s.transaction_facts().unwrap();
  assert_eq!(facts.len(), 3);

  // Ordered by txnID: t-1, t-2, t-3.
  assert_eq!(facts[0].product, "Aspirin");
  assert_eq!(facts[0].region, "USA");
  assert_eq!(facts[0].rep, "Jane Doe");
  assert_eq!(facts[0].date, NaiveDate::from_ymd_opt(2020, 2, 15).unwrap());
  assert_eq!(facts[0].amount, 100);

  assert_eq!(facts[1].rep, "Ken Akamatsu");
  assert_eq!(facts[1].region, "Canada");
}

#[test]
fn dimension_names_are_distinct_and_sorted() {
  let s = store();
  s.rebuild_normalized(&sample_reps(), &sample_txns()).unwrap();

  assert_eq!(
    s.dimension_names(Dimension::Product).unwrap(),
    ["Aspirin", "Ibuprofen"]
  );
  assert_eq!(
    s.dimension_names(Dimension::Region).unwrap(),
    ["Canada", "USA"]
  );
  assert_eq!(
    s.dimension_names(Dimension::Rep).unwrap(),
    ["Jane Doe", "Ken Akamatsu"]
  );
}

// ─── Star schema ─────────────────────────────────────────────────────────────

/// Star fixture: product dim {A, B, C}, region dim, grand date row.
fn star_fixture(s: &SqliteStore) {
  s.rebuild_star().unwrap();
  s.insert_dimension(
    Dimension::Product,
    &[
      DimensionRow { key: 1, name: "A".into() },
      DimensionRow { key: 2, name: "B".into() },
      DimensionRow { key: 3, name: "C".into() },
      DimensionRow::all(),
    ],
  )
  .unwrap();
  s.insert_dimension(Dimension::Region, &[DimensionRow::all()])
    .unwrap();
  s.insert_date_dimension(&[DateDimRow::grand()]).unwrap();
}

#[test]
fn dimension_roundtrip() {
  let s = store();
  star_fixture(&s);

  let rows = s.dimension_rows(Dimension::Product).unwrap();
  assert_eq!(rows.len(), 4);
  assert_eq!(rows[0], DimensionRow::all());
  assert_eq!(rows[1], DimensionRow { key: 1, name: "A".into() });
  assert_eq!(rows[3], DimensionRow { key: 3, name: "C".into() });
}

#[test]
fn date_dimension_roundtrip_preserves_sentinels() {
  let s = store();
  s.rebuild_star().unwrap();
  s.insert_date_dimension(&[
    DateDimRow::detail(2020, Quarter::Q1),
    DateDimRow::yearly(2020),
    DateDimRow::grand(),
  ])
  .unwrap();

  let rows = s.date_dimension_rows().unwrap();
  assert_eq!(rows.len(), 3);

  // Ordered by timeID: 2020-ALL, 2020-Q1, ALL-ALL.
  assert_eq!(rows[0], DateDimRow::yearly(2020));
  assert_eq!(rows[1], DateDimRow::detail(2020, Quarter::Q1));
  assert_eq!(rows[2], DateDimRow::grand());
}

#[test]
fn append_and_read_facts() {
  let s = store();
  star_fixture(&s);

  let rows = vec![FactRow {
    primary_key:   1,
    time_key:      time_key(None, None),
    secondary_key: ALL_KEY,
    total_sold:    500,
  }];
  s.append_facts(FactTable::Product, &rows).unwrap();

  assert_eq!(s.fact_rows(FactTable::Product).unwrap(), rows);
}

#[test]
fn grand_total_absent_before_load() {
  let s = store();
  star_fixture(&s);
  assert_eq!(s.grand_total(FactTable::Product).unwrap(), None);
}

#[test]
fn grand_total_reads_the_sentinel_row() {
  let s = store();
  star_fixture(&s);

  s.append_facts(
    FactTable::Product,
    &[FactRow {
      primary_key:   ALL_KEY,
      time_key:      time_key(None, None),
      secondary_key: ALL_KEY,
      total_sold:    350,
    }],
  )
  .unwrap();

  assert_eq!(s.grand_total(FactTable::Product).unwrap(), Some(350));
}

// ─── Reporting reads ─────────────────────────────────────────────────────────

#[test]
fn top_members_orders_by_total_descending() {
  let s = store();
  star_fixture(&s);

  // Per-member grand totals: A=500, B=300, C=700.
  let grand = time_key(None, None);
  s.append_facts(
    FactTable::Product,
    &[
      FactRow { primary_key: 1, time_key: grand.clone(), secondary_key: ALL_KEY, total_sold: 500 },
      FactRow { primary_key: 2, time_key: grand.clone(), secondary_key: ALL_KEY, total_sold: 300 },
      FactRow { primary_key: 3, time_key: grand.clone(), secondary_key: ALL_KEY, total_sold: 700 },
      // The table-wide grand total must not appear among the members.
      FactRow { primary_key: ALL_KEY, time_key: grand, secondary_key: ALL_KEY, total_sold: 1500 },
    ],
  )
  .unwrap();

  let top = s.top_members(FactTable::Product, 2).unwrap();
  assert_eq!(top.len(), 2);
  assert_eq!((top[0].name.as_str(), top[0].total_sold), ("C", 700));
  assert_eq!((top[1].name.as_str(), top[1].total_sold), ("A", 500));
}

#[test]
fn yearly_breakdown_filters_to_year_rows() {
  let s = store();
  star_fixture(&s);
  s.insert_date_dimension(&[
    DateDimRow::detail(2020, Quarter::Q1),
    DateDimRow::yearly(2020),
    DateDimRow::yearly(2021),
  ])
  .unwrap();

  s.append_facts(
    FactTable::Product,
    &[
      FactRow { primary_key: 1, time_key: "2020-ALL".into(), secondary_key: ALL_KEY, total_sold: 300 },
      FactRow { primary_key: 1, time_key: "2021-ALL".into(), secondary_key: ALL_KEY, total_sold: 50 },
      // Quarter-grain row, excluded from the yearly breakdown.
      FactRow { primary_key: 1, time_key: "2020-Q1".into(), secondary_key: ALL_KEY, total_sold: 100 },
    ],
  )
  .unwrap();

  let years = s.yearly_breakdown(FactTable::Product, 1).unwrap();
  assert_eq!(years.len(), 2);
  assert_eq!((years[0].year, years[0].total_sold), (2020, 300));
  assert_eq!((years[1].year, years[1].total_sold), (2021, 50));
}

#[test]
fn quarterly_series_excludes_rollup_rows() {
  let s = store();
  star_fixture(&s);
  s.insert_date_dimension(&[
    DateDimRow::detail(2020, Quarter::Q1),
    DateDimRow::detail(2020, Quarter::Q2),
    DateDimRow::yearly(2020),
  ])
  .unwrap();

  s.append_facts(
    FactTable::Product,
    &[
      FactRow { primary_key: ALL_KEY, time_key: "2020-Q2".into(), secondary_key: ALL_KEY, total_sold: 200 },
      FactRow { primary_key: ALL_KEY, time_key: "2020-Q1".into(), secondary_key: ALL_KEY, total_sold: 100 },
      FactRow { primary_key: ALL_KEY, time_key: "2020-ALL".into(), secondary_key: ALL_KEY, total_sold: 300 },
    ],
  )
  .unwrap();

  let series = s.quarterly_series(FactTable::Product).unwrap();
  assert_eq!(series.len(), 2);
  assert_eq!(series[0].time_id, "2020-Q1");
  assert_eq!(series[0].quarter, Quarter::Q1);
  assert_eq!(series[0].total_sold, 100);
  assert_eq!(series[1].time_id, "2020-Q2");
}
