use chrono::Utc;
use clap::Parser;
use subsync::channel::Snapshot;
use subsync::cli::{Cli, Command, DiffArgs, SyncArgs, TimelineArgs};
use subsync::config::Config;
use subsync::error::{Result, SyncError};
use subsync::source::youtube::{Credentials, YouTubeSource};
use subsync::source::{FileSource, SubscriptionSource};
use subsync::store::{diff, Store};
use subsync::{logging, report, sync};

fn run_sync(config: &Config, args: &SyncArgs) -> Result<()> {
    let source: Box<dyn SubscriptionSource> = match &args.from_file {
        Some(path) => Box::new(FileSource::new(path)),
        None => {
            let credentials = Credentials::from_parts(
                args.client_id.clone(),
                args.client_secret.clone(),
                args.refresh_token.clone(),
            )?;
            Box::new(YouTubeSource::new(credentials, config.http_timeout)?)
        }
    };

    let outcome = sync::run(config, source.as_ref(), Utc::now())?;
    report::print(&outcome, args.json);
    Ok(())
}

fn run_report(config: &Config) -> Result<()> {
    let path = sync::rerender(config)?.ok_or(SyncError::NoState)?;
    println!("wrote {}", path.display());
    Ok(())
}

fn run_timeline(config: &Config, args: &TimelineArgs) -> Result<()> {
    let store = Store::new(&config.output_dir);
    let timeline = store.load_timeline(config.max_timeline_entries)?;

    if args.json {
        println!("{}", subsync::export::to_pretty_json(&timeline, "timeline")?.trim_end());
    } else {
        print!("{}", report::table::render_timeline(&timeline, args.limit));
    }
    Ok(())
}

fn run_diff(args: &DiffArgs) -> Result<()> {
    let now = Utc::now();
    let from_label = args.from.display().to_string();
    let to_label = args.to.display().to_string();

    let from = Snapshot::new(now, FileSource::new(&args.from).fetch()?, &from_label)?;
    let to = Snapshot::new(now, FileSource::new(&args.to).fetch()?, &to_label)?;

    println!("\nComparing subscription lists:");
    println!("  From: {from_label} ({} channels)", from.len());
    println!("  To:   {to_label} ({} channels)", to.len());
    println!();

    print!("{}", report::table::render_diff(&diff::compare(&to, Some(&from))));
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result = Config::resolve(cli.config.as_deref(), cli.overrides()).and_then(|config| {
        tracing::debug!(?config, "resolved configuration");
        match &cli.command {
            Command::Sync(args) => run_sync(&config, args),
            Command::Report => run_report(&config),
            Command::Timeline(args) => run_timeline(&config, args),
            Command::Diff(args) => run_diff(args),
        }
    });

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
