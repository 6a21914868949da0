use anyhow::Result;
use async_std::task;
use clap::{ArgAction, Parser};
use log::{error, info};
use std::path::PathBuf;

use pdfharvest::{
    connection::FTPConnection,
    download::Downloader,
    logging,
    target::{Target, DEFAULT_URL},
    walker::Harvester,
};

#[derive(Parser, Debug)]
#[command(version, author)]
/// Downloads every PDF on an FTP server into one flat directory
struct Opts {
    /// URL in the form ftp://host[:port]/start-path
    #[arg(default_value = DEFAULT_URL)]
    url: String,

    /// Directory the PDFs are written to
    #[arg(short, long, default_value = "PDFs")]
    output_dir: PathBuf,

    /// File the log is written to, next to the console output
    #[arg(long, default_value = "ftp_download.log")]
    log_file: PathBuf,

    /// Start a fresh log file instead of appending
    #[arg(long)]
    truncate_log: bool,

    #[arg(short, action = ArgAction::Count)]
    /// Verbosity level
    verbose: u8,
}

async fn run(opts: &Opts) -> Result<()> {
    let target = Target::parse(&opts.url)?;

    let connection = FTPConnection::login(&target.host, target.port).await?;
    info!("Connected to {}", target.host);

    let downloader = Downloader::new(opts.output_dir.clone());
    info!("Saving PDFs into {}", downloader.local_dir().display());

    let mut harvester = Harvester::new(connection, downloader);
    harvester.harvest(&target.root).await;

    harvester.into_session().quit().await?;
    info!("Download completed successfully.");

    Ok(())
}

fn main() {
    let opts: Opts = Opts::parse();

    logging::init(logging::level_for(opts.verbose), &opts.log_file, opts.truncate_log);

    // Failures end the run early but never change the exit status.
    if let Err(e) = task::block_on(run(&opts)) {
        error!("Critical error: {:#}", e);
    }
}
