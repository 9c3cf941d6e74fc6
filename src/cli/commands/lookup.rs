//! Lookup command - list the versions of a package

use crate::cli::args::{LookupArgs, OutputFormat};
use crate::config::Config;
use crate::error::RegistryResult;
use crate::registry::{LookupResult, P4Registry, RegistryProvider};
use console::style;

/// Execute the lookup command
pub async fn execute(args: LookupArgs, config: &Config) -> RegistryResult<()> {
    let registry = P4Registry::new(config.registry.clone())?;
    let result = registry.lookup(&args.package).await?;

    match args.format {
        OutputFormat::Table => print_table(&args.package, &result),
        OutputFormat::Json => print_json(&result)?,
        OutputFormat::Plain => print_plain(&result),
    }

    Ok(())
}

fn print_table(package: &str, result: &LookupResult) {
    let latest = result.latest();

    println!("{:<24} {:<8} {:<64}", "VERSION", "STABLE", "HASH");
    println!("{}", "-".repeat(98));

    for (version, entry) in &result.versions {
        let stable = if entry.stable {
            style("yes").green().to_string()
        } else {
            style("no").yellow().to_string()
        };
        let marker = if latest.as_deref() == Some(version.as_str()) {
            " (latest)"
        } else {
            ""
        };
        println!(
            "{:<24} {:<8} {:<64}{}",
            version, stable, entry.hash, marker
        );
    }

    println!();
    println!("{}: {} version(s)", package, result.versions.len());
}

fn print_json(result: &LookupResult) -> RegistryResult<()> {
    #[derive(serde::Serialize)]
    struct LookupJson<'a> {
        #[serde(flatten)]
        result: &'a LookupResult,
        latest: Option<String>,
    }

    let json = LookupJson {
        result,
        latest: result.latest(),
    };
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}

fn print_plain(result: &LookupResult) {
    for version in result.versions.keys() {
        println!("{}", version);
    }
}
