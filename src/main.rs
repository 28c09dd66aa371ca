use std::path::Path;

use anyhow::Context;
use clap::Parser;
use log::info;

use quarry::conf::Config;
use quarry::core::{CliArgs, setup_logging};
use quarry::session::{Session, View};
use quarry::table::Table;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    setup_logging();
    let args = CliArgs::parse();
    info!(args = args; "Quarry started.");

    let config = Config::from_file(args.config.as_deref().map(Path::new))?;
    let bytes = tokio::fs::read(&args.file)
        .await
        .with_context(|| format!("cannot read {}", args.file))?;

    let mut session = Session::new(&config);
    session.upload(&bytes, &args.file)?;
    print_csv(&session.preview()?)?;

    let view = match &args.query {
        Some(sql) => {
            let result = session.run_query(sql).await?;
            print_csv(&result.table)?;
            View::LastQuery
        }
        None => View::Raw,
    };

    if args.suggest {
        let suggestions = session.suggest_charts(view)?;
        println!("{}", serde_json::to_string_pretty(&suggestions)?);
    }

    if let Some(path) = &args.export {
        let csv = session.export_csv(view)?;
        tokio::fs::write(path, csv)
            .await
            .with_context(|| format!("cannot write {}", path))?;
        info!("Exported {:?} view to {}", view, path);
    }

    Ok(())
}

fn print_csv(table: &Table) -> anyhow::Result<()> {
    print!("{}", String::from_utf8_lossy(&table.to_csv_bytes()?));
    Ok(())
}
