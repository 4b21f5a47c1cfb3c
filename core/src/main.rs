use clap::Parser;
use log::{error, info};
use std::process;
use volqc_core::cli::{setup_logging, MaskDiffCli, OutputFormat};
use volqc_core::{MaskDiffJob, MaskRecord, TextReport};

fn main() {
    let cli = MaskDiffCli::parse();

    // Setup logging
    setup_logging(cli.verbose);

    info!(
        "Comparing {} against {}",
        cli.mask_subject.display(),
        cli.mask_ref.display()
    );

    let mut job = MaskDiffJob::new(&cli.mask_subject, &cli.mask_ref, &cli.database);
    if let Some(csv) = &cli.csv {
        job = job.with_csv(csv);
    }

    let record = match job.run() {
        Ok(record) => record,
        Err(e) => {
            error!("Mask comparison failed: {}", e);
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    output_record(&record, cli.format);
}

fn output_record(record: &MaskRecord, format: OutputFormat) {
    match format {
        OutputFormat::Text => {
            println!("{}", TextReport::new(record));
        }
        OutputFormat::Json => {
            #[cfg(feature = "json")]
            {
                match serde_json::to_string_pretty(record) {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        error!("Failed to serialize to JSON: {}", e);
                        eprintln!("Error: Failed to serialize to JSON: {}", e);
                        process::exit(1);
                    }
                }
            }
            #[cfg(not(feature = "json"))]
            {
                eprintln!("Error: JSON output requires the 'json' feature");
                eprintln!("Rebuild with: cargo build --features json");
                process::exit(1);
            }
        }
    }
}
