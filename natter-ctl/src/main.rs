use std::{fs::File, io, path::PathBuf};

use anyhow::{anyhow, Context};
use natter_client::{CommentWidget, Config, IdScheme};
use tracing_subscriber::EnvFilter;

mod display;
mod script;

#[derive(structopt::StructOpt)]
/// Run a comment script against an in-memory comment widget
struct Opt {
    /// Derive comment ids from the clock instead of numbering them 1, 2, 3...
    #[structopt(long)]
    clock_ids: bool,

    /// Print `list` output as JSON
    #[structopt(long)]
    json: bool,

    /// Script to run, stdin if absent
    #[structopt(parse(from_os_str))]
    script: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();
    let opt = <Opt as structopt::StructOpt>::from_args();

    let id_scheme = match opt.clock_ids {
        true => IdScheme::Clock,
        false => IdScheme::Sequential,
    };
    let mut widget = CommentWidget::with_config(Config { id_scheme });
    let mut runner = script::Runner::new(&mut widget, io::stdout().lock(), opt.json);

    let failures = match opt.script {
        Some(path) => {
            let file = File::open(&path)
                .with_context(|| format!("opening script {:?}", path))?;
            runner.run(io::BufReader::new(file))?
        }
        None => runner.run(io::stdin().lock())?,
    };

    match failures {
        0 => Ok(()),
        n => Err(anyhow!("{n} script line(s) failed")),
    }
}
