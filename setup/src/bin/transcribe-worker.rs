use std::io::Read;

use anyhow::{Context, Result};

use transcriber_configuration::{load_config, setup_logging};
use transcriber_setup::Application;

/// Reads one job document (stdin, or a file named on the command line),
/// runs it, prints the response envelope to stdout and exits. Job
/// failures are part of the envelope; only worker-level faults (unusable
/// stdin, broken stdout) exit non-zero.
#[tokio::main]
async fn main() -> Result<()> {
    let config = load_config();
    setup_logging(&config);

    let raw_job = read_job()?;
    let app = Application::new(&config)?;
    let envelope = app.handle_job(&raw_job).await;

    let rendered =
        serde_json::to_string(&envelope).context("failed to encode response envelope")?;
    println!("{rendered}");
    Ok(())
}

fn read_job() -> Result<String> {
    let mut args = std::env::args().skip(1);
    match args.next() {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read job file {path}")),
        None => {
            let mut raw = String::new();
            std::io::stdin()
                .read_to_string(&mut raw)
                .context("failed to read job from stdin")?;
            Ok(raw)
        }
    }
}
