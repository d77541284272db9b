// crates/sales-etl-core/src/transform.rs

//! Extract parsing and the cleaning steps applied to a raw sales table.
//!
//! The raw table holds every source column as nullable `String`. Cleaning runs
//! in a fixed order (see [`transform`]) and never fails on bad cell values:
//! a row that cannot be cleaned is dropped.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use polars::prelude::*;
use tracing::{debug, info};

use crate::error::{EtlError, Result};
use crate::types::NewSalesRecord;

/// Columns coerced to `Float64` when present.
pub const NUMERIC_COLUMNS: [&str; 3] = ["price", "quantity", "total_amount"];

/// Cell values read as missing, in addition to the empty field.
const NULL_SENTINELS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Reads the CSV file at `path` into an all-`String` raw table.
pub fn read_raw_table(path: &Path) -> Result<DataFrame> {
    if !path.exists() {
        return Err(EtlError::NotFound(path.to_path_buf()));
    }

    let df = read_raw_csv(File::open(path)?)?;
    info!(records = df.height(), path = %path.display(), "extracted records");
    Ok(df)
}

/// Parses delimited text with a header row. Fields are trimmed; short rows are
/// padded with nulls.
pub fn read_raw_csv<R: Read>(source: R) -> Result<DataFrame> {
    let mut reader = ::csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(::csv::Trim::All)
        .from_reader(source);

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if headers.is_empty() {
        return Err(EtlError::EmptyInput);
    }

    let mut cells: Vec<Vec<Option<String>>> = vec![Vec::new(); headers.len()];
    for record in reader.records() {
        let record = record?;
        if record.len() > headers.len() {
            return Err(EtlError::RaggedRow {
                line: record.position().map(|pos| pos.line()).unwrap_or_default(),
                found: record.len(),
                expected: headers.len(),
            });
        }
        for (idx, column) in cells.iter_mut().enumerate() {
            column.push(record.get(idx).and_then(cell_value));
        }
    }

    let columns: Vec<Column> = headers
        .iter()
        .zip(cells)
        .map(|(name, values)| Series::new(name.as_str().into(), values).into())
        .collect();

    Ok(DataFrame::new(columns)?)
}

fn cell_value(raw: &str) -> Option<String> {
    if NULL_SENTINELS.contains(&raw) {
        None
    } else {
        Some(raw.to_string())
    }
}

/// Runs the cleaning steps in their required order:
/// normalize, drop nulls, derive total, coerce numerics, drop nulls.
pub fn transform(df: DataFrame) -> PolarsResult<DataFrame> {
    let df = normalize_columns(df)?;

    let before = df.height();
    let df = drop_incomplete_rows(df)?;
    debug!(before, after = df.height(), "dropped rows with missing values");

    let df = derive_total_amount(df)?;
    let df = coerce_numeric(df)?;

    let before = df.height();
    let df = drop_incomplete_rows(df)?;
    debug!(before, after = df.height(), "dropped rows with non-numeric values");

    info!(records = df.height(), "transformed data");
    Ok(df)
}

pub fn normalize_column_name(name: &str) -> String {
    name.to_lowercase().replace(' ', "_")
}

/// Lower-cases column names and replaces spaces with underscores.
pub fn normalize_columns(df: DataFrame) -> PolarsResult<DataFrame> {
    let existing: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();
    let renamed: Vec<String> = existing
        .iter()
        .map(|name| normalize_column_name(name))
        .collect();

    if existing == renamed {
        return Ok(df);
    }

    let new_names: Vec<&str> = renamed.iter().map(String::as_str).collect();
    df.lazy().rename(&existing, new_names, true).collect()
}

/// Removes every row that has a null in any column.
pub fn drop_incomplete_rows(df: DataFrame) -> PolarsResult<DataFrame> {
    let mut complete = BooleanChunked::full("complete".into(), true, df.height());
    for column in df.get_columns() {
        complete = &complete & &column.is_not_null();
    }
    df.filter(&complete)
}

/// Adds `total_amount = price * quantity` when `total_amount` is absent and
/// both operands are present. Non-numeric operands produce a null total.
pub fn derive_total_amount(df: DataFrame) -> PolarsResult<DataFrame> {
    let has_operands = has_column(&df, "price") && has_column(&df, "quantity");
    if has_column(&df, "total_amount") || !has_operands {
        return Ok(df);
    }

    df.lazy()
        .with_column(
            (col("price").cast(DataType::Float64) * col("quantity").cast(DataType::Float64))
                .alias("total_amount"),
        )
        .collect()
}

/// Casts each present numeric column to `Float64`. Unparseable values, NaN,
/// and a `quantity` that does not fit an `i32` become null rather than
/// failing the run.
pub fn coerce_numeric(df: DataFrame) -> PolarsResult<DataFrame> {
    let present: Vec<&str> = NUMERIC_COLUMNS
        .iter()
        .copied()
        .filter(|name| has_column(&df, name))
        .collect();

    if present.is_empty() {
        return Ok(df);
    }

    let casts: Vec<Expr> = present
        .iter()
        .map(|name| col(*name).cast(DataType::Float64))
        .collect();
    let mut df = df.lazy().with_columns(casts).collect()?;

    for name in present {
        let cleaned = valid_numbers(df.column(name)?)?;
        df.with_column(cleaned)?;
    }

    Ok(df)
}

fn valid_numbers(column: &Column) -> PolarsResult<Series> {
    let integral = column.name().as_str() == "quantity";
    let values: Float64Chunked = column
        .f64()?
        .into_iter()
        .map(|value| value.filter(|v| is_valid_number(*v, integral)))
        .collect();
    Ok(values.with_name(column.name().clone()).into_series())
}

fn is_valid_number(value: f64, integral: bool) -> bool {
    if value.is_nan() {
        return false;
    }
    !integral || (f64::from(i32::MIN)..=f64::from(i32::MAX)).contains(&value.trunc())
}

/// Builds load-ready rows. Missing text columns become `""` and missing
/// numeric columns `0`; `quantity` is truncated toward zero and is already
/// known to fit an `i32`.
pub fn records_from_frame(df: &DataFrame) -> PolarsResult<Vec<NewSalesRecord>> {
    let mut records = vec![NewSalesRecord::default(); df.height()];

    fill_text(df, "product_name", &mut records, |r, v| r.product_name = v)?;
    fill_text(df, "category", &mut records, |r, v| r.category = v)?;
    fill_text(df, "sale_date", &mut records, |r, v| r.sale_date = v)?;
    fill_numeric(df, "price", &mut records, |r, v| r.price = v)?;
    fill_numeric(df, "quantity", &mut records, |r, v| r.quantity = v as i32)?;
    fill_numeric(df, "total_amount", &mut records, |r, v| r.total_amount = v)?;

    Ok(records)
}

fn has_column(df: &DataFrame, name: &str) -> bool {
    df.get_column_names().iter().any(|c| c.as_str() == name)
}

fn fill_text<F>(
    df: &DataFrame,
    name: &str,
    records: &mut [NewSalesRecord],
    mut assign: F,
) -> PolarsResult<()>
where
    F: FnMut(&mut NewSalesRecord, String),
{
    let Ok(column) = df.column(name) else {
        return Ok(());
    };
    let column = column.cast(&DataType::String)?;
    for (record, value) in records.iter_mut().zip(column.str()?.into_iter()) {
        assign(record, value.unwrap_or_default().to_string());
    }
    Ok(())
}

fn fill_numeric<F>(
    df: &DataFrame,
    name: &str,
    records: &mut [NewSalesRecord],
    mut assign: F,
) -> PolarsResult<()>
where
    F: FnMut(&mut NewSalesRecord, f64),
{
    let Ok(column) = df.column(name) else {
        return Ok(());
    };
    let column = column.cast(&DataType::Float64)?;
    for (record, value) in records.iter_mut().zip(column.f64()?.into_iter()) {
        assign(record, value.unwrap_or(0.0));
    }
    Ok(())
}
