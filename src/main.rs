use anyhow::Context;
use asset_squeeze::batch::run;
use asset_squeeze::cli::Args;
use asset_squeeze::logger;
use clap::Parser;

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logger::init(args.verbosity());

    let config = args.to_config().context("invalid configuration")?;

    if !args.quiet {
        println!("🚀 Optimizing assets in {}", config.root.display());
    }
    let summary = run(&config).context("asset optimization failed")?;

    println!("\n{}", summary);
    Ok(())
}
