//! SQL schema for the Starling SQLite store.
//!
//! Unlike a durable store, both halves are rebuilt from scratch each run
//! (full replace), so the DDL drops before it creates. Table and column
//! names follow the persisted reporting schema consumed downstream.

/// Normalized (3NF) source-of-truth tables. Children drop before parents
/// so foreign-key enforcement never blocks the rebuild.
pub const NORMALIZED_SCHEMA: &str = "
DROP TABLE IF EXISTS salestxn;
DROP TABLE IF EXISTS customers;
DROP TABLE IF EXISTS reps;
DROP TABLE IF EXISTS products;
DROP TABLE IF EXISTS countries;
DROP TABLE IF EXISTS territories;

CREATE TABLE territories (
    territoryID   INTEGER PRIMARY KEY,
    territoryName TEXT NOT NULL UNIQUE
);

CREATE TABLE countries (
    countryID   INTEGER PRIMARY KEY,
    countryName TEXT NOT NULL UNIQUE
);

CREATE TABLE products (
    productID   INTEGER PRIMARY KEY,
    productName TEXT NOT NULL UNIQUE
);

CREATE TABLE reps (
    repID     TEXT PRIMARY KEY,
    firstName TEXT NOT NULL,
    lastName  TEXT NOT NULL,
    territory INTEGER NOT NULL REFERENCES territories(territoryID)
);

CREATE TABLE customers (
    customerID   INTEGER PRIMARY KEY,
    customerName TEXT NOT NULL UNIQUE,
    country      INTEGER NOT NULL REFERENCES countries(countryID)
);

CREATE TABLE salestxn (
    txnID      TEXT PRIMARY KEY,
    date       TEXT NOT NULL,       -- ISO 8601 (YYYY-MM-DD)
    quantity   INTEGER NOT NULL,
    amount     INTEGER NOT NULL,    -- integer currency units
    productID  INTEGER NOT NULL REFERENCES products(productID),
    customerID INTEGER NOT NULL REFERENCES customers(customerID),
    repID      TEXT    NOT NULL REFERENCES reps(repID)
);

CREATE INDEX salestxn_product_idx ON salestxn(productID);
CREATE INDEX salestxn_rep_idx     ON salestxn(repID);
";

/// Star-schema tables: three name dimensions, the date dimension, two
/// fact tables.
pub const STAR_SCHEMA: &str = "
DROP TABLE IF EXISTS product_facts;
DROP TABLE IF EXISTS rep_facts;
DROP TABLE IF EXISTS product_dim;
DROP TABLE IF EXISTS region_dim;
DROP TABLE IF EXISTS rep_dim;
DROP TABLE IF EXISTS date_dim;

-- Surrogate key 0 and name 'ALL' are reserved for the roll-up sentinel.
CREATE TABLE product_dim (
    productID   INTEGER PRIMARY KEY,
    productName TEXT NOT NULL UNIQUE
);

CREATE TABLE region_dim (
    regionID   INTEGER PRIMARY KEY,
    regionName TEXT NOT NULL UNIQUE
);

CREATE TABLE rep_dim (
    repID   INTEGER PRIMARY KEY,
    repName TEXT NOT NULL UNIQUE
);

-- Composite key '{year}-{quarter}' with the literal ALL at either level.
-- Sentinel levels are NULL in the typed columns; the key carries the ALL.
CREATE TABLE date_dim (
    timeID  TEXT PRIMARY KEY,
    year    INTEGER,
    quarter TEXT                    -- 'Q1'..'Q4'
);

-- No row-level primary key: a row's reporting grain is encoded by which
-- of its keys are sentinel (0 / 'ALL-ALL') vs. real members.
CREATE TABLE product_facts (
    product_key INTEGER NOT NULL REFERENCES product_dim(productID),
    time_key    TEXT    NOT NULL REFERENCES date_dim(timeID),
    region_key  INTEGER NOT NULL REFERENCES region_dim(regionID),
    totalSold   INTEGER NOT NULL
);

CREATE TABLE rep_facts (
    rep_key     INTEGER NOT NULL REFERENCES rep_dim(repID),
    time_key    TEXT    NOT NULL REFERENCES date_dim(timeID),
    product_key INTEGER NOT NULL REFERENCES product_dim(productID),
    totalSold   INTEGER NOT NULL
);
";
