use crate::CLAP_STYLING;
use clap::{arg, command};
use url::Url;

pub(crate) fn command_argument_builder() -> clap::Command {
    clap::Command::new("websift")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("websift")
        .styles(CLAP_STYLING)
        .arg(arg!(-q --"quiet" "Suppress banner and non-essential output").required(false))
        .subcommand_required(false)
        .subcommand(
            command!("ui").about("Launch the interactive terminal interface"),
        )
        .subcommand(
            command!("analyze")
                .about(
                    "Discover the top-level sections of a site from its navigation \
                regions and list them.",
                )
                .arg(
                    arg!(-u --"url" <URL>)
                        .required(true)
                        .help("The base URL to analyze")
                        .value_parser(clap::value_parser!(Url)),
                ),
        )
        .subcommand(
            command!("crawl")
                .about(
                    "Crawl the pages under one section of a site and export their \
                title and heading metadata to CSV.",
                )
                .arg(
                    arg!(-u --"url" <URL>)
                        .required(true)
                        .help("The base URL of the site")
                        .value_parser(clap::value_parser!(Url)),
                )
                .arg(
                    arg!(-s --"section" <PATH>)
                        .required(true)
                        .help("The category path to crawl under, e.g. /docs"),
                )
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("Write the CSV here instead of prompting for a destination")
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                )
                .arg(
                    arg!(--"max-pages" <NUM>)
                        .required(false)
                        .help("Stop after collecting this many pages")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("100"),
                ),
        )
}
