//! Hand-written event-loop parsers for the two sales source documents.
//!
//! One accumulator struct per record element, filled from leaf-element
//! text and flushed into a record on the element's end tag. Unknown leaf
//! elements are ignored; missing required fields are not.

use chrono::NaiveDate;
use quick_xml::{Reader, events::{BytesStart, Event}};
use starling_core::record::{RepRecord, TxnRecord};

use crate::error::{Error, Result};

// ─── Shared helpers ──────────────────────────────────────────────────────────

fn required_attr(
  e: &BytesStart<'_>,
  name: &'static str,
  record: &'static str,
) -> Result<String> {
  let attr = e
    .try_get_attribute(name)
    .map_err(|e| Error::Xml(e.to_string()))?
    .ok_or(Error::MissingField { record, field: name })?;
  let value = attr
    .unescape_value()
    .map_err(|e| Error::Xml(e.to_string()))?;
  Ok(value.into_owned())
}

fn check_root(name: &[u8], expected: &'static str) -> Result<()> {
  if name == expected.as_bytes() {
    Ok(())
  } else {
    Err(Error::UnexpectedRoot {
      expected,
      found: String::from_utf8_lossy(name).into_owned(),
    })
  }
}

fn parse_int(field: &'static str, value: Option<String>) -> Result<i64> {
  let value =
    value.ok_or(Error::MissingField { record: "txn", field })?;
  value
    .trim()
    .parse()
    .map_err(|_| Error::InvalidNumber { field, value })
}

/// Source dates are `MM/DD/YYYY`.
fn parse_date(value: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(value.trim(), "%m/%d/%Y")
    .map_err(|_| Error::InvalidDate { value: value.to_string() })
}

// ─── Reps ────────────────────────────────────────────────────────────────────

#[derive(Default)]
struct RepFields {
  first_name: Option<String>,
  last_name:  Option<String>,
  territory:  Option<String>,
}

impl RepFields {
  fn set(&mut self, field: &str, text: String) {
    match field {
      "firstName" => self.first_name = Some(text),
      "lastName" => self.last_name = Some(text),
      "territory" => self.territory = Some(text),
      _ => {}
    }
  }

  fn into_record(self, rep_id: String) -> Result<RepRecord> {
    Ok(RepRecord {
      rep_id,
      first_name: self.first_name.ok_or(Error::MissingField {
        record: "rep",
        field:  "firstName",
      })?,
      last_name:  self.last_name.ok_or(Error::MissingField {
        record: "rep",
        field:  "lastName",
      })?,
      territory:  self.territory.ok_or(Error::MissingField {
        record: "rep",
        field:  "territory",
      })?,
    })
  }
}

pub(crate) fn parse_reps(input: &str) -> Result<Vec<RepRecord>> {
  let mut reader = Reader::from_str(input);
  reader.config_mut().trim_text(true);

  let mut records = Vec::new();
  let mut root_seen = false;
  let mut rep: Option<(String, RepFields)> = None;
  let mut field: Option<String> = None;

  loop {
    match reader.read_event() {
      Ok(Event::Start(ref e)) => {
        let name = e.name();
        let name = name.as_ref();
        if !root_seen {
          check_root(name, "salesreps")?;
          root_seen = true;
        } else if name == b"rep" {
          let rep_id = required_attr(e, "repID", "rep")?;
          rep = Some((rep_id, RepFields::default()));
        } else if rep.is_some() {
          field = Some(String::from_utf8_lossy(name).into_owned());
        }
      }
      Ok(Event::Text(ref t)) => {
        if let (Some((_, fields)), Some(field)) =
          (rep.as_mut(), field.as_deref())
        {
          let text =
            t.unescape().map_err(|e| Error::Xml(e.to_string()))?;
          fields.set(field, text.into_owned());
        }
      }
      Ok(Event::End(ref e)) => {
        if e.name().as_ref() == b"rep" {
          if let Some((rep_id, fields)) = rep.take() {
            records.push(fields.into_record(rep_id)?);
          }
        } else {
          field = None;
        }
      }
      Ok(Event::Eof) => break,
      Err(e) => return Err(Error::Xml(e.to_string())),
      _ => {}
    }
  }

  Ok(records)
}

// ─── Transactions ────────────────────────────────────────────────────────────

#[derive(Default)]
struct TxnFields {
  date:     Option<String>,
  customer: Option<String>,
  product:  Option<String>,
  quantity: Option<String>,
  amount:   Option<String>,
  country:  Option<String>,
  rep_id:   Option<String>,
}

impl TxnFields {
  fn set(&mut self, field: &str, text: String) {
    match field {
      "date" => self.date = Some(text),
      "customer" => self.customer = Some(text),
      "product" => self.product = Some(text),
      "quantity" => self.quantity = Some(text),
      "amount" => self.amount = Some(text),
      "country" => self.country = Some(text),
      "repID" => self.rep_id = Some(text),
      _ => {}
    }
  }

  fn into_record(self, txn_id: String) -> Result<TxnRecord> {
    let date_raw = self.date.ok_or(Error::MissingField {
      record: "txn",
      field:  "date",
    })?;

    Ok(TxnRecord {
      txn_id,
      date:     parse_date(&date_raw)?,
      customer: self.customer.ok_or(Error::MissingField {
        record: "txn",
        field:  "customer",
      })?,
      product:  self.product.ok_or(Error::MissingField {
        record: "txn",
        field:  "product",
      })?,
      quantity: parse_int("quantity", self.quantity)?,
      amount:   parse_int("amount", self.amount)?,
      country:  self.country.ok_or(Error::MissingField {
        record: "txn",
        field:  "country",
      })?,
      rep_id:   self.rep_id.ok_or(Error::MissingField {
        record: "txn",
        field:  "repID",
      })?,
    })
  }
}

pub(crate) fn parse_transactions(
  input: &str,
  source: &str,
) -> Result<Vec<TxnRecord>> {
  let mut reader = Reader::from_str(input);
  reader.config_mut().trim_text(true);

  let mut records = Vec::new();
  let mut root_seen = false;
  let mut txn: Option<(String, TxnFields)> = None;
  let mut field: Option<String> = None;

  loop {
    match reader.read_event() {
      Ok(Event::Start(ref e)) => {
        let name = e.name();
        let name = name.as_ref();
        if !root_seen {
          check_root(name, "transactions")?;
          root_seen = true;
        } else if name == b"txn" {
          let local_id = required_attr(e, "txnID", "txn")?;
          // Prefix per source file so ids stay unique across files.
          txn = Some((format!("{source}-{local_id}"), TxnFields::default()));
        } else if txn.is_some() {
          field = Some(String::from_utf8_lossy(name).into_owned());
        }
      }
      Ok(Event::Text(ref t)) => {
        if let (Some((_, fields)), Some(field)) =
          (txn.as_mut(), field.as_deref())
        {
          let text =
            t.unescape().map_err(|e| Error::Xml(e.to_string()))?;
          fields.set(field, text.into_owned());
        }
      }
      Ok(Event::End(ref e)) => {
        if e.name().as_ref() == b"txn" {
          if let Some((txn_id, fields)) = txn.take() {
            records.push(fields.into_record(txn_id)?);
          }
        } else {
          field = None;
        }
      }
      Ok(Event::Eof) => break,
      Err(e) => return Err(Error::Xml(e.to_string())),
      _ => {}
    }
  }

  Ok(records)
}

// ─── Tests ───────────────────────────────────────────────────────────────────
