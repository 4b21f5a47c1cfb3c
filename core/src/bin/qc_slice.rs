use clap::Parser;
use log::{error, info};
use std::process;
use volqc_core::cli::{setup_logging, SliceCli};
use volqc_core::SliceQcJob;

fn main() {
    let cli = SliceCli::parse();

    // Setup logging
    setup_logging(cli.verbose);

    info!(
        "Slicing {} ({} per axis)",
        cli.image.display(),
        cli.nslices
    );

    let mut job =
        SliceQcJob::new(&cli.image, &cli.save_path).with_slice_count(usize::from(cli.nslices));
    if let Some(mask) = &cli.mask_path {
        info!("Overlaying {}", mask.display());
        job = job.with_mask(mask);
    }

    match job.run() {
        Ok(path) => println!("{}", path.display()),
        Err(e) => {
            error!("Slice QC failed: {}", e);
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}
