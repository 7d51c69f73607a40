use clap::Parser;
use miette::Result;
use tracing_subscriber::EnvFilter;
use xref::cli::{Cli, Commands, GlobalOpts};

fn init_logging(global: &GlobalOpts) {
    let default_level = if global.verbose {
        "debug"
    } else if global.quiet {
        "error"
    } else {
        "warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    // Reset SIGPIPE to default behavior (terminate silently) for proper Unix piping.
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    let global = cli.global;
    init_logging(&global);

    match cli.command {
        Commands::Map(args) => xref::cli::commands::map::run(args, &global),
        Commands::Classify(args) => xref::cli::commands::classify::run(args, &global),
        Commands::Eval(args) => xref::cli::commands::eval::run(args, &global),
        Commands::Rank(args) => xref::cli::commands::rank::run(args, &global),
        Commands::Search(args) => xref::cli::commands::search::run(args, &global),
        Commands::Missing(args) => xref::cli::commands::missing::run(args, &global),
        Commands::Table(cmd) => xref::cli::commands::table::run(cmd, &global),
        Commands::Config(cmd) => xref::cli::commands::config::run(cmd, &global),
        Commands::Completions(args) => xref::cli::commands::completions::run(args),
    }
}
