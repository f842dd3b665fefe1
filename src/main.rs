#[macro_use]
extern crate log;

use std::fs::File;
use std::io::{self, Write};
use std::process;

use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};

use candymosaic::chart::html::{self, RenderOpts};
use candymosaic::chart::{order, records};
use candymosaic::configuration::{self, SurveyConfig};
use candymosaic::output::{self, OutputTarget};
use candymosaic::Result;

fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| match record.level() {
            log::Level::Info => writeln!(buf, "{}", record.args()),
            level => writeln!(buf, "{}: {}", level.as_str().to_lowercase(), record.args()),
        })
        .init();
}

fn app<'a, 'b>() -> App<'a, 'b> {
    App::new("candymosaic")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Aggregates candy survey ratings and renders them as charts")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .subcommand(
            SubCommand::with_name("aggregate")
                .about("Count survey ratings per candy and age bracket")
                .arg(
                    Arg::with_name("input")
                        .long("input")
                        .short("i")
                        .takes_value(true)
                        .help("survey CSV (optionally gzipped); defaults to stdin"),
                )
                .arg(
                    Arg::with_name("output")
                        .long("output")
                        .short("o")
                        .takes_value(true)
                        .help("where to write the aggregate JSON; defaults to stdout"),
                )
                .arg(
                    Arg::with_name("config")
                        .long("config")
                        .short("c")
                        .takes_value(true)
                        .help("TOML file overriding the age field, candy map or age brackets"),
                )
                .arg(Arg::with_name("pretty").long("pretty").help("indent the JSON output")),
        )
        .subcommand(
            SubCommand::with_name("render")
                .about("Render aggregate data as an HTML page of charts")
                .arg(
                    Arg::with_name("data")
                        .long("data")
                        .short("d")
                        .takes_value(true)
                        .default_value("data.json")
                        .help("aggregate or record-array JSON"),
                )
                .arg(
                    Arg::with_name("output")
                        .long("output")
                        .short("o")
                        .takes_value(true)
                        .help("where to write the HTML page; defaults to stdout"),
                )
                .arg(
                    Arg::with_name("config")
                        .long("config")
                        .short("c")
                        .takes_value(true)
                        .help("TOML file whose age brackets order the mosaic columns"),
                )
                .arg(
                    Arg::with_name("order")
                        .long("order")
                        .takes_value(true)
                        .default_value("joy,meh,despair")
                        .help("initial stacking order of the ratings"),
                )
                .arg(
                    Arg::with_name("focus")
                        .long("focus")
                        .takes_value(true)
                        .help("candy shown in the mosaic initially"),
                ),
        )
}

fn run_aggregate(matches: &ArgMatches) -> Result<()> {
    let config = match matches.value_of("config") {
        Some(path) => configuration::read_config(path)?,
        None => SurveyConfig::default(),
    };
    let aggregate = match matches.value_of("input") {
        Some(path) => candymosaic::aggregate_survey(File::open(path)?, &config)?,
        None => {
            let stdin = io::stdin();
            let handle = stdin.lock();
            candymosaic::aggregate_survey(handle, &config)?
        }
    };
    let json = output::aggregate_json(&aggregate, matches.is_present("pretty"))?;
    OutputTarget::from_arg(matches.value_of("output")).write_all(&json)
}

fn run_render(matches: &ArgMatches) -> Result<()> {
    let config = match matches.value_of("config") {
        Some(path) => configuration::read_config(path)?,
        None => SurveyConfig::default(),
    };
    let data = matches.value_of("data").unwrap_or("data.json");
    let records = records::load(data, &config.age_brackets)?;
    let opts = RenderOpts {
        order: order::parse_order(matches.value_of("order").unwrap_or("joy,meh,despair"))?,
        focus: matches.value_of("focus").map(|s| s.to_string()),
    };
    info!(
        "rendering {} candies from {}, order {}",
        records.len(),
        data,
        order::order_key(&opts.order)
    );
    let page = html::render_page(&records, &opts)?;
    OutputTarget::from_arg(matches.value_of("output")).write_all(page.as_bytes())
}

fn main() {
    init_logging();
    let matches = app().get_matches();
    let result = match matches.subcommand() {
        ("aggregate", Some(m)) => run_aggregate(m),
        ("render", Some(m)) => run_render(m),
        _ => Ok(()),
    };
    if let Err(e) = result {
        error!("{}", e);
        process::exit(1);
    }
}
