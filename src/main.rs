use clap::{crate_version, App, Arg};
use ppg::build::{build_site, Config};
use std::path::Path;
use tracing::warn;
use tracing_subscriber::EnvFilter;

const OUTPUT_DIRECTORY: &str = "output";
const RESOURCE_DIRECTORY: &str = "resource";

fn app<'a, 'b>() -> App<'a, 'b> {
    App::new("ppg")
        .version(crate_version!())
        .about("Builds a static website from a folder of Markdown pages")
        .arg(
            Arg::with_name("SOURCE")
                .help("The source folder containing config.yml and blog/")
                .required(true)
                .index(1),
        )
}

fn main() {
    let matches = app().get_matches();

    // RUST_LOG overrides the default `info` level
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let source = match matches.value_of("SOURCE") {
        Some(source) => source,
        None => {
            eprintln!("{}", matches.usage());
            std::process::exit(1);
        }
    };
    match build_site(&Config {
        source_directory: Path::new(source),
        resource_directory: Path::new(RESOURCE_DIRECTORY),
        output_directory: Path::new(OUTPUT_DIRECTORY),
    }) {
        Ok(diagnostics) => {
            for diagnostic in diagnostics {
                warn!("{}", diagnostic);
            }
        }
        Err(err) => {
            eprintln!("Error creating website: {}", err);
            std::process::exit(1);
        }
    }
}
