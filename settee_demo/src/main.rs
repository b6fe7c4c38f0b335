// Copyright 2026 the Settee Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sales walkthrough: load a collection, explore it, query it with SQL, chart the monthly
//! totals, and export a filtered projection to a second account.
//!
//! Set `RUST_LOG=settee=debug` to watch loads and writes.

use anyhow::Context as _;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::{Value as JsonValue, json};
use settee::config::{CREATE_DB_ON_SAVE, HOST, PASSWORD, USERNAME};
use settee::Session;
use settee_charts::HBarChartSpec;
use settee_store::{Credentials, MemoryCluster};
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;

const SOURCE_HOST: &str = "examples.cloudant.com";
const SOURCE_DB: &str = "spark_sales";
const TARGET_HOST: &str = "user.cloudant.com";
const TARGET_DB: &str = "sales_charlotte_september";
const CHART_PATH: &str = "settee_demo.svg";

const REPS: [&str; 5] = ["Charlotte", "Ben", "Dan", "Ellen", "Frank"];
const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cluster = seed_cluster(1000).context("seed the demo cluster")?;
    let session = Session::builder()
        .config(HOST, SOURCE_HOST)
        .connector(cluster.clone())
        .connect()?;

    // Explore the collection.
    let sales = session.read().load(SOURCE_DB)?;
    sales.print_schema();
    let sales = sales.cache();
    println!("{} documents", sales.count());
    sales.show();
    sales.show_n(5);
    sales.select(&["rep"])?.show_n(5);

    // Aggregate with SQL.
    sales.create_or_replace_temp_view("sales_table");
    session
        .sql(
            "SELECT rep AS REP, COUNT(amount) AS COUNT, SUM(amount) AS AMOUNT \
             FROM sales_table GROUP BY rep ORDER BY SUM(amount) DESC",
        )?
        .show_n(100);
    let by_month = session.sql(
        "SELECT month AS MONTH, SUM(amount) AS AMOUNT \
         FROM sales_table GROUP BY month ORDER BY SUM(amount) DESC",
    )?;
    by_month.show();

    // Chart the monthly totals.
    let buffer = by_month.to_plot_buffer("MONTH", "AMOUNT")?;
    let svg = HBarChartSpec::new().scene(&buffer).to_svg_string();
    std::fs::write(CHART_PATH, svg).with_context(|| format!("write {CHART_PATH}"))?;
    println!("wrote {CHART_PATH}");

    // Export one rep's September sales.
    let september = sales.filter("rep = 'Charlotte' AND month = 'September'")?;
    println!("{} matching sales", september.count());
    september.show_n(5);
    let summary = september
        .select(&["amount", "month", "rep"])?
        .write()
        .option(HOST, TARGET_HOST)
        .option(USERNAME, "demo")
        .option(PASSWORD, "demo-password")
        .option(CREATE_DB_ON_SAVE, "true")
        .save(TARGET_DB)?;
    info!(?summary, "export finished");

    let stored = cluster.documents(TARGET_HOST, TARGET_DB)?;
    println!("{TARGET_HOST}/{TARGET_DB} now holds {} documents", stored.len());
    Ok(())
}

/// Creates the source and destination accounts and fills the source with random sales.
fn seed_cluster(count: usize) -> anyhow::Result<MemoryCluster> {
    let cluster = MemoryCluster::new();
    cluster.add_account(
        SOURCE_HOST,
        Some(Credentials::new("admin", "admin-password")),
        true,
    );
    cluster.add_account(
        TARGET_HOST,
        Some(Credentials::new("demo", "demo-password")),
        false,
    );
    cluster.create_database(SOURCE_HOST, SOURCE_DB)?;

    let mut rng = StdRng::seed_from_u64(7);
    let docs: Vec<JsonValue> = (0..count)
        .map(|i| {
            json!({
                "_id": format!("sale-{i:04}"),
                "rep": REPS[rng.random_range(0..REPS.len())],
                "month": MONTHS[rng.random_range(0..MONTHS.len())],
                "amount": rng.random_range(1..=2_000_i64),
            })
        })
        .collect();
    cluster.insert_documents(SOURCE_HOST, SOURCE_DB, docs)?;
    cluster.insert_documents(
        SOURCE_HOST,
        SOURCE_DB,
        [json!({"_id": "_design/sales", "views": {}})],
    )?;
    info!(count, host = SOURCE_HOST, db = SOURCE_DB, "seeded demo collection");
    Ok(cluster)
}
