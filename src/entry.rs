use clap::{CommandFactory, FromArgMatches};

use crate::app;
use crate::args::BenchArgs;
use crate::config::{apply_config, load_config};
use crate::error::AppResult;
use crate::logger;

pub(crate) fn run() -> AppResult<()> {
    let matches = BenchArgs::command().get_matches();
    let mut args = BenchArgs::from_arg_matches(&matches)?;

    logger::init_logging(args.verbose, args.no_color);

    if let Some(config) = load_config(args.config.as_deref())? {
        apply_config(&mut args, &matches, &config)?;
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(app::execute(&args))
}
