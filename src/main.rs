use clap::{
    crate_authors, crate_description, crate_name, crate_version, Arg, ArgAction, ArgMatches,
    Command,
};
use hako::api::{self, ScaffoldRequest};
use std::path::PathBuf;

fn layouts_file_arg() -> Arg {
    Arg::new("file")
        .short('f')
        .long("file")
        .help("toml file with additional layouts")
        .value_parser(clap::value_parser!(PathBuf))
}

// The CLI layer should only parse inputs and forward them to library code.
fn main() -> miette::Result<()> {
    let matches = Command::new(crate_name!())
        .about(crate_description!())
        .author(crate_authors!())
        .version(crate_version!())
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose output")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("apply")
                .about("Creates each spec as an empty file or directory, replacing existing entries")
                .arg(
                    Arg::new("specs")
                        .help("paths to create; a trailing separator makes a directory")
                        .num_args(0..)
                        .action(ArgAction::Append),
                )
                .arg(
                    Arg::new("base")
                        .short('b')
                        .long("base")
                        .help("base directory the specs are resolved against [default: current directory]")
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    Arg::new("layout")
                        .short('l')
                        .long("layout")
                        .help("named layout whose entries are created before the specs"),
                )
                .arg(layouts_file_arg())
                .arg(
                    Arg::new("abort-on-error")
                        .long("abort-on-error")
                        .help("stop at the first spec that fails instead of skipping it")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("list")
                .about("list available layouts")
                .arg(layouts_file_arg()),
        )
        .subcommand(
            Command::new("show")
                .about("print a layout as a tree")
                .arg(Arg::new("layout").help("layout name").required(true))
                .arg(layouts_file_arg()),
        )
        .get_matches();

    let is_verbose = matches.get_flag("verbose");

    init_logger(is_verbose);

    match matches.subcommand() {
        Some(("apply", args)) => handle_apply(args)?,
        Some(("list", args)) => api::list_layouts(layouts_file(args))?,
        Some(("show", args)) => {
            let layout = args
                .get_one::<String>("layout")
                .expect("layout is required");

            api::show_layout(layout, layouts_file(args))?
        }
        _ => unreachable!(),
    }

    Ok(())
}

fn init_logger(is_verbose: bool) {
    let mut builder = env_logger::Builder::from_default_env();

    if is_verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }

    builder.init();
}

fn layouts_file(args: &ArgMatches) -> Option<&std::path::Path> {
    args.get_one::<PathBuf>("file").map(PathBuf::as_path)
}

fn handle_apply(args: &ArgMatches) -> Result<(), api::HakoError> {
    let specs = args
        .get_many::<String>("specs")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();

    let request = ScaffoldRequest {
        base: args.get_one::<PathBuf>("base").map(PathBuf::as_path),
        layout: args.get_one::<String>("layout").map(String::as_str),
        layouts_file: layouts_file(args),
        specs,
        abort_on_error: args.get_flag("abort-on-error"),
    };

    log::debug!("apply request: {:?}", request);

    api::scaffold(request)
}
