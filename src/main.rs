// Copyright (c) Chris Gunn.
// Licensed under the MIT license.

use std::{path::PathBuf, process::ExitCode};

use anyhow::{anyhow, Error};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use tracing::Level;

use sheetplate::{
    ast::{dump_template, DocumentAttributes},
    compile::compile_file,
    parser::Parser,
};

fn main() -> ExitCode {
    let matches = command().get_matches();

    init_logging(matches.get_count("verbose"));

    match run(&matches) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn command() -> Command {
    let templates = Arg::new("templates")
        .value_name("TEMPLATE")
        .required(true)
        .num_args(1..)
        .value_parser(value_parser!(PathBuf));

    let template = Arg::new("template")
        .value_name("TEMPLATE")
        .required(true)
        .value_parser(value_parser!(PathBuf));

    Command::new("sheetplate")
        .about("Compiles and checks spreadsheet templates")
        .subcommand_required(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count)
                .global(true)
                .help("More log output (repeat for more)"),
        )
        .arg(
            Arg::new("attribute")
                .short('a')
                .long("attribute")
                .value_name("KEY=VALUE")
                .action(ArgAction::Append)
                .global(true)
                .help("Document attribute passed to the workbook directive"),
        )
        .subcommand(
            Command::new("check")
                .about("Checks templates and reports the first error of each")
                .arg(templates),
        )
        .subcommand(Command::new("dump").about("Prints the AST of a template").arg(template))
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

// Returns false if any template failed to compile.
fn run(matches: &ArgMatches) -> Result<bool, Error> {
    let attributes = parse_attributes(matches)?;
    let parser = Parser::with_document_attributes(attributes);

    match matches.subcommand() {
        Some(("check", sub_matches)) => {
            let mut all_ok = true;
            for path in sub_matches.get_many::<PathBuf>("templates").into_iter().flatten() {
                match compile_file(&parser, path) {
                    Ok(_) => println!("ok: {}", path.display()),
                    Err(err) => {
                        eprintln!("{:#}", err);
                        all_ok = false;
                    }
                }
            }
            Ok(all_ok)
        }
        Some(("dump", sub_matches)) => {
            let path = sub_matches
                .get_one::<PathBuf>("template")
                .ok_or_else(|| anyhow!("missing template"))?;
            let template = compile_file(&parser, path)?;
            print!("{}", dump_template(&template));
            Ok(true)
        }
        _ => Err(anyhow!("unknown command")),
    }
}

fn parse_attributes(matches: &ArgMatches) -> Result<DocumentAttributes, Error> {
    let mut attributes = DocumentAttributes::new();
    for arg in matches.get_many::<String>("attribute").into_iter().flatten() {
        let Some((key, value)) = arg.split_once('=') else {
            return Err(anyhow!("attribute '{}' must have the form KEY=VALUE", arg));
        };
        attributes.insert(key.trim().to_string(), value.to_string());
    }
    Ok(attributes)
}
