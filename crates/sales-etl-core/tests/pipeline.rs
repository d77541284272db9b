use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use sales_etl_core::pipeline::{run_etl, EtlOutcome, EtlStatus};
use sales_etl_core::store::{MemorySalesStore, SalesStore};
use sales_etl_core::types::Page;
use tempfile::{NamedTempFile, TempDir};

fn csv_file(contents: &str) -> Result<NamedTempFile> {
    let mut file = NamedTempFile::with_suffix(".csv")?;
    file.write_all(contents.as_bytes())?;
    file.flush()?;
    Ok(file)
}

#[tokio::test]
async fn scenario_a_loads_one_record_with_derived_total() -> Result<()> {
    let file = csv_file(
        "Product Name,Category,Price,Quantity,Sale Date\nWidget,Tools,9.99,3,2024-01-01\n",
    )?;
    let store = MemorySalesStore::new();

    let outcome = run_etl(file.path(), &store).await;

    assert_eq!(outcome, EtlOutcome::Success { records_processed: 1 });
    let report = outcome.report();
    assert_eq!(report.status, EtlStatus::Success);
    assert_eq!(report.message, "ETL process completed successfully");
    assert_eq!(report.records_processed, 1);

    let rows = store.list(Page::default()).await?;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].product_name, "Widget");
    assert_eq!(rows[0].category, "Tools");
    assert_eq!(rows[0].quantity, 3);
    assert_eq!(rows[0].sale_date, "2024-01-01");
    assert!((rows[0].total_amount - 29.97).abs() < 1e-9);
    Ok(())
}

#[tokio::test]
async fn scenario_b_drops_row_with_empty_price() -> Result<()> {
    let file = csv_file(
        "product_name,category,price,quantity,sale_date\n\
         Widget,Tools,9.99,3,2024-01-01\n\
         Gizmo,Tools,,2,2024-01-02\n\
         Doohickey,Parts,1.50,4,2024-01-03\n",
    )?;
    let store = MemorySalesStore::new();

    let outcome = run_etl(file.path(), &store).await;

    assert_eq!(outcome, EtlOutcome::Success { records_processed: 2 });
    let names: Vec<String> = store
        .list(Page::default())
        .await?
        .into_iter()
        .map(|row| row.product_name)
        .collect();
    assert_eq!(names, vec!["Widget", "Doohickey"]);
    Ok(())
}

#[tokio::test]
async fn missing_file_reports_not_found_and_loads_nothing() -> Result<()> {
    let dir = TempDir::new()?;
    let path: PathBuf = dir.path().join("missing.csv");
    let store = MemorySalesStore::new();

    let outcome = run_etl(&path, &store).await;

    assert_eq!(outcome, EtlOutcome::NotFound { path: path.clone() });
    let report = outcome.report();
    assert_eq!(report.status, EtlStatus::Error);
    assert_eq!(report.records_processed, 0);
    assert!(report.message.starts_with("ETL process failed: File "));
    assert_eq!(store.count().await?, 0);
    Ok(())
}

#[tokio::test]
async fn malformed_input_is_reported_as_failure() -> Result<()> {
    let file = csv_file("")?;
    let store = MemorySalesStore::new();

    let outcome = run_etl(file.path(), &store).await;

    match &outcome {
        EtlOutcome::Failed { message } => assert_eq!(message, "No columns to parse from file"),
        other => panic!("expected failure, got {other:?}"),
    }
    let report = outcome.report();
    assert_eq!(report.status, EtlStatus::Error);
    assert_eq!(report.message, "ETL process failed: No columns to parse from file");
    assert_eq!(report.records_processed, 0);
    assert_eq!(store.count().await?, 0);
    Ok(())
}

#[tokio::test]
async fn scenario_d_repeated_runs_are_not_deduplicated() -> Result<()> {
    let file = csv_file(
        "product_name,category,price,quantity,sale_date\n\
         Widget,Tools,9.99,3,2024-01-01\n\
         Gadget,Toys,4.00,2,2024-01-02\n",
    )?;
    let store = MemorySalesStore::new();

    assert!(run_etl(file.path(), &store).await.is_success());
    assert!(run_etl(file.path(), &store).await.is_success());

    assert_eq!(store.count().await?, 4);
    let ids: Vec<i32> = store
        .list(Page::default())
        .await?
        .iter()
        .map(|row| row.id)
        .collect();
    assert_eq!(ids, vec![1, 2, 3, 4]);
    Ok(())
}

#[tokio::test]
async fn list_pages_and_clear_all() -> Result<()> {
    let file = csv_file(
        "product_name,category,price,quantity,total_amount,sale_date\n\
         a,x,1,1,1,d\n\
         b,x,1,1,1,d\n\
         c,x,1,1,1,d\n",
    )?;
    let store = MemorySalesStore::new();
    assert!(run_etl(file.path(), &store).await.is_success());

    let page = store.list(Page::new(1, 1)).await?;
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].product_name, "b");
    assert!(store.list(Page::new(10, 100)).await?.is_empty());

    assert_eq!(store.clear_all().await?, 3);
    assert_eq!(store.count().await?, 0);
    Ok(())
}
