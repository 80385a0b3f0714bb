//! [`SqliteStore`] — the SQLite implementation of [`MartStore`].

use std::{
  collections::{BTreeMap, BTreeSet},
  path::Path,
};

use rusqlite::{Connection, OptionalExtension as _, params};
use starling_core::{
  grain::FactTable,
  record::{RepRecord, TxnRecord},
  star::{
    ALL_KEY, DateDimRow, Dimension, DimensionRow, FactRow, time_key,
  },
  store::{
    MartStore, MemberTotal, NormalizedCounts, SeriesPoint, TxnFact,
    YearTotal,
  },
};

use crate::{
  Error, Result,
  encode::{RawDateDim, RawTxnFact, encode_date, encode_quarter},
  schema::{NORMALIZED_SCHEMA, STAR_SCHEMA},
};

// ─── Table mappings ──────────────────────────────────────────────────────────

struct DimTable {
  table: &'static str,
  key:   &'static str,
  name:  &'static str,
}

fn dim_table(dim: Dimension) -> DimTable {
  match dim {
    Dimension::Product => DimTable {
      table: "product_dim",
      key:   "productID",
      name:  "productName",
    },
    Dimension::Region => DimTable {
      table: "region_dim",
      key:   "regionID",
      name:  "regionName",
    },
    Dimension::Rep => DimTable {
      table: "rep_dim",
      key:   "repID",
      name:  "repName",
    },
  }
}

struct FactColumns {
  table:     &'static str,
  primary:   &'static str,
  secondary: &'static str,
}

fn fact_columns(table: FactTable) -> FactColumns {
  match table {
    FactTable::Product => FactColumns {
      table:     "product_facts",
      primary:   "product_key",
      secondary: "region_key",
    },
    FactTable::Rep => FactColumns {
      table:     "rep_facts",
      primary:   "rep_key",
      secondary: "product_key",
    },
  }
}

/// Assign ids 1..N to the distinct values of `names`, sorted by name so
/// rebuilds are deterministic.
fn name_ids<'a>(
  names: impl Iterator<Item = &'a str>,
) -> BTreeMap<&'a str, i64> {
  let distinct: BTreeSet<&str> = names.collect();
  distinct.into_iter().zip(1..).collect()
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Starling mart backed by a single SQLite file.
pub struct SqliteStore {
  conn: Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path`.
  pub fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = Connection::open(path)?;
    let store = Self { conn };
    store.init()?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub fn open_in_memory() -> Result<Self> {
    let conn = Connection::open_in_memory()?;
    let store = Self { conn };
    store.init()?;
    Ok(store)
  }

  fn init(&self) -> Result<()> {
    self.conn.execute_batch(
      "PRAGMA journal_mode = WAL;
       PRAGMA foreign_keys = ON;",
    )?;
    Ok(())
  }
}

// ─── MartStore impl ──────────────────────────────────────────────────────────

impl MartStore for SqliteStore {
  type Error = Error;

  // ── Normalized store ──────────────────────────────────────────────────────

  fn rebuild_normalized(
    &self,
    reps: &[RepRecord],
    txns: &[TxnRecord],
  ) -> Result<NormalizedCounts> {
    self.conn.execute_batch(NORMALIZED_SCHEMA)?;

    // One transaction for the whole load; dropped on any early return,
    // which rolls the partial load back.
    let tx = self.conn.unchecked_transaction()?;

    let territories = name_ids(reps.iter().map(|r| r.territory.as_str()));
    let countries = name_ids(txns.iter().map(|t| t.country.as_str()));
    let products = name_ids(txns.iter().map(|t| t.product.as_str()));

    // Customers keep the first country observed for their name.
    let mut customer_country: BTreeMap<&str, &str> = BTreeMap::new();
    for t in txns {
      customer_country
        .entry(t.customer.as_str())
        .or_insert(t.country.as_str());
    }
    let customers: BTreeMap<&str, i64> =
      customer_country.keys().copied().zip(1..).collect();

    for (name, id) in &territories {
      tx.execute(
        "INSERT INTO territories (territoryID, territoryName) VALUES (?1, ?2)",
        params![id, name],
      )?;
    }
    for (name, id) in &countries {
      tx.execute(
        "INSERT INTO countries (countryID, countryName) VALUES (?1, ?2)",
        params![id, name],
      )?;
    }
    for (name, id) in &products {
      tx.execute(
        "INSERT INTO products (productID, productName) VALUES (?1, ?2)",
        params![id, name],
      )?;
    }

    for rep in reps {
      tx.execute(
        "INSERT INTO reps (repID, firstName, lastName, territory)
         VALUES (?1, ?2, ?3, ?4)",
        params![
          rep.rep_id,
          rep.first_name,
          rep.last_name,
          territories[rep.territory.as_str()],
        ],
      )?;
    }

    for (name, id) in &customers {
      tx.execute(
        "INSERT INTO customers (customerID, customerName, country)
         VALUES (?1, ?2, ?3)",
        params![id, name, countries[customer_country[name]]],
      )?;
    }

    let rep_ids: BTreeSet<&str> =
      reps.iter().map(|r| r.rep_id.as_str()).collect();

    for t in txns {
      if !rep_ids.contains(t.rep_id.as_str()) {
        return Err(Error::UnknownRep {
          txn_id: t.txn_id.clone(),
          rep_id: t.rep_id.clone(),
        });
      }
      tx.execute(
        "INSERT INTO salestxn
           (txnID, date, quantity, amount, productID, customerID, repID)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
          t.txn_id,
          encode_date(t.date),
          t.quantity,
          t.amount,
          products[t.product.as_str()],
          customers[t.customer.as_str()],
          t.rep_id,
        ],
      )?;
    }

    tx.commit()?;

    Ok(NormalizedCounts {
      transactions: txns.len(),
      reps:         reps.len(),
      territories:  territories.len(),
      products:     products.len(),
      customers:    customers.len(),
      countries:    countries.len(),
    })
  }

  fn transaction_facts(&self) -> Result<Vec<TxnFact>> {
    let mut stmt = self.conn.prepare(
      "SELECT p.productName, co.countryName,
              r.firstName || ' ' || r.lastName AS repName,
              t.date, t.amount
       FROM salestxn t
       JOIN products  p  ON p.productID  = t.productID
       JOIN customers c  ON c.customerID = t.customerID
       JOIN countries co ON co.countryID = c.country
       JOIN reps      r  ON r.repID      = t.repID
       ORDER BY t.txnID",
    )?;

    let raws = stmt
      .query_map([], |row| {
        Ok(RawTxnFact {
          product: row.get(0)?,
          region:  row.get(1)?,
          rep:     row.get(2)?,
          date:    row.get(3)?,
          amount:  row.get(4)?,
        })
      })?
      .collect::<rusqlite::Result<Vec<_>>>()?;

    raws.into_iter().map(RawTxnFact::into_fact).collect()
  }

  fn dimension_names(&self, dim: Dimension) -> Result<Vec<String>> {
    let sql = match dim {
      Dimension::Product => {
        "SELECT productName FROM products ORDER BY productName"
      }
      Dimension::Region => {
        "SELECT countryName FROM countries ORDER BY countryName"
      }
      Dimension::Rep => {
        "SELECT DISTINCT firstName || ' ' || lastName AS repName
         FROM reps ORDER BY repName"
      }
    };

    let mut stmt = self.conn.prepare(sql)?;
    let names = stmt
      .query_map([], |row| row.get(0))?
      .collect::<rusqlite::Result<Vec<String>>>()?;
    Ok(names)
  }

  // ── Star schema ───────────────────────────────────────────────────────────

  fn rebuild_star(&self) -> Result<()> {
    self.conn.execute_batch(STAR_SCHEMA)?;
    Ok(())
  }

  fn insert_dimension(
    &self,
    dim: Dimension,
    rows: &[DimensionRow],
  ) -> Result<()> {
    let t = dim_table(dim);
    let tx = self.conn.unchecked_transaction()?;
    {
      let sql = format!(
        "INSERT INTO {} ({}, {}) VALUES (?1, ?2)",
        t.table, t.key, t.name,
      );
      let mut stmt = tx.prepare(&sql)?;
      for row in rows {
        stmt.execute(params![row.key, row.name])?;
      }
    }
    tx.commit()?;
    Ok(())
  }

  fn insert_date_dimension(&self, rows: &[DateDimRow]) -> Result<()> {
    let tx = self.conn.unchecked_transaction()?;
    {
      let mut stmt = tx.prepare(
        "INSERT INTO date_dim (timeID, year, quarter) VALUES (?1, ?2, ?3)",
      )?;
      for row in rows {
        stmt.execute(params![
          row.time_id,
          row.year,
          row.quarter.map(encode_quarter),
        ])?;
      }
    }
    tx.commit()?;
    Ok(())
  }

  fn dimension_rows(&self, dim: Dimension) -> Result<Vec<DimensionRow>> {
    let t = dim_table(dim);
    let sql = format!(
      "SELECT {}, {} FROM {} ORDER BY {}",
      t.key, t.name, t.table, t.key,
    );

    let mut stmt = self.conn.prepare(&sql)?;
    let rows = stmt
      .query_map([], |row| {
        Ok(DimensionRow { key: row.get(0)?, name: row.get(1)? })
      })?
      .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
  }

  fn date_dimension_rows(&self) -> Result<Vec<DateDimRow>> {
    let mut stmt = self.conn.prepare(
      "SELECT timeID, year, quarter FROM date_dim ORDER BY timeID",
    )?;

    let raws = stmt
      .query_map([], |row| {
        Ok(RawDateDim {
          time_id: row.get(0)?,
          year:    row.get(1)?,
          quarter: row.get(2)?,
        })
      })?
      .collect::<rusqlite::Result<Vec<_>>>()?;

    raws.into_iter().map(RawDateDim::into_row).collect()
  }

  fn append_facts(
    &self,
    table: FactTable,
    rows: &[FactRow],
  ) -> Result<()> {
    let c = fact_columns(table);
    let tx = self.conn.unchecked_transaction()?;
    {
      let sql = format!(
        "INSERT INTO {} ({}, time_key, {}, totalSold)
         VALUES (?1, ?2, ?3, ?4)",
        c.table, c.primary, c.secondary,
      );
      let mut stmt = tx.prepare(&sql)?;
      for row in rows {
        stmt.execute(params![
          row.primary_key,
          row.time_key,
          row.secondary_key,
          row.total_sold,
        ])?;
      }
    }
    tx.commit()?;
    Ok(())
  }

  fn fact_rows(&self, table: FactTable) -> Result<Vec<FactRow>> {
    let c = fact_columns(table);
    let sql = format!(
      "SELECT {}, time_key, {}, totalSold FROM {}",
      c.primary, c.secondary, c.table,
    );

    let mut stmt = self.conn.prepare(&sql)?;
    let rows = stmt
      .query_map([], |row| {
        Ok(FactRow {
          primary_key:   row.get(0)?,
          time_key:      row.get(1)?,
          secondary_key: row.get(2)?,
          total_sold:    row.get(3)?,
        })
      })?
      .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
  }

  // ── Reporting reads ───────────────────────────────────────────────────────
  //
  // Every read is a constant-shape lookup filtered by sentinel-vs-real
  // keys; the load phase already did all grouping.

  fn grand_total(&self, table: FactTable) -> Result<Option<i64>> {
    let c = fact_columns(table);
    let sql = format!(
      "SELECT totalSold FROM {} WHERE {} = ?1 AND {} = ?1 AND time_key = ?2",
      c.table, c.primary, c.secondary,
    );

    let total = self
      .conn
      .query_row(&sql, params![ALL_KEY, time_key(None, None)], |row| {
        row.get(0)
      })
      .optional()?;
    Ok(total)
  }

  fn top_members(
    &self,
    table: FactTable,
    n: usize,
  ) -> Result<Vec<MemberTotal>> {
    let c = fact_columns(table);
    let d = dim_table(table.primary());
    let sql = format!(
      "SELECT f.{pk}, d.{name}, f.totalSold
       FROM {fact} f
       JOIN {dim} d ON d.{key} = f.{pk}
       WHERE f.time_key = ?1 AND f.{sk} = ?2 AND f.{pk} <> ?2
       ORDER BY f.totalSold DESC
       LIMIT ?3",
      pk = c.primary,
      sk = c.secondary,
      name = d.name,
      fact = c.table,
      dim = d.table,
      key = d.key,
    );

    let mut stmt = self.conn.prepare(&sql)?;
    let members = stmt
      .query_map(
        params![time_key(None, None), ALL_KEY, n as i64],
        |row| {
          Ok(MemberTotal {
            key:        row.get(0)?,
            name:       row.get(1)?,
            total_sold: row.get(2)?,
          })
        },
      )?
      .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(members)
  }

  fn yearly_breakdown(
    &self,
    table: FactTable,
    member: i64,
  ) -> Result<Vec<YearTotal>> {
    let c = fact_columns(table);
    let sql = format!(
      "SELECT dd.year, f.totalSold
       FROM {fact} f
       JOIN date_dim dd ON dd.timeID = f.time_key
       WHERE f.{pk} = ?1 AND f.{sk} = ?2
         AND dd.year IS NOT NULL AND dd.quarter IS NULL
       ORDER BY dd.year",
      fact = c.table,
      pk = c.primary,
      sk = c.secondary,
    );

    let mut stmt = self.conn.prepare(&sql)?;
    let years = stmt
      .query_map(params![member, ALL_KEY], |row| {
        Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?))
      })?
      .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(
      years
        .into_iter()
        .map(|(year, total_sold)| YearTotal {
          year: year as i32,
          total_sold,
        })
        .collect(),
    )
  }

  fn quarterly_series(
    &self,
    table: FactTable,
  ) -> Result<Vec<SeriesPoint>> {
    let c = fact_columns(table);
    let sql = format!(
      "SELECT dd.timeID, dd.year, dd.quarter, f.totalSold
       FROM {fact} f
       JOIN date_dim dd ON dd.timeID = f.time_key
       WHERE f.{pk} = ?1 AND f.{sk} = ?1
         AND dd.year IS NOT NULL AND dd.quarter IS NOT NULL
       ORDER BY dd.timeID",
      fact = c.table,
      pk = c.primary,
      sk = c.secondary,
    );

    let mut stmt = self.conn.prepare(&sql)?;
    let raws = stmt
      .query_map(params![ALL_KEY], |row| {
        Ok((
          row.get::<_, String>(0)?,
          row.get::<_, i64>(1)?,
          row.get::<_, String>(2)?,
          row.get::<_, i64>(3)?,
        ))
      })?
      .collect::<rusqlite::Result<Vec<_>>>()?;

    raws
      .into_iter()
      .map(|(time_id, year, quarter, total_sold)| {
        Ok(SeriesPoint {
          time_id,
          year: year as i32,
          quarter: crate::encode::decode_quarter(&quarter)?,
          total_sold,
        })
      })
      .collect()
  }
}
