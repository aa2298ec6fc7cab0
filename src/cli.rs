// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print one JSON object per line"),
    )
}

fn edit_fields(cmd: Command, required: bool) -> Command {
    cmd.arg(
        Arg::new("merchant")
            .long("merchant")
            .required(required)
            .help("Merchant name"),
    )
    .arg(
        Arg::new("amount")
            .long("amount")
            .required(required)
            .allow_hyphen_values(true)
            .help("Positive amount, e.g. 12.50"),
    )
    .arg(
        Arg::new("category")
            .long("category")
            .required(required)
            .help("One of the server's categories"),
    )
    .arg(Arg::new("date").long("date").help("YYYY-MM-DD"))
    .arg(Arg::new("description").long("description"))
    .arg(
        Arg::new("tx_currency")
            .long("in")
            .value_name("CCY")
            .help("Currency the amount is recorded in"),
    )
    .arg(Arg::new("notes").long("notes"))
}

fn period_arg() -> Arg {
    Arg::new("period")
        .long("period")
        .default_value("all")
        .help("all | week | month | quarter | year")
}

pub fn build_cli() -> Command {
    Command::new("spendview")
        .version(clap::crate_version!())
        .about("Expense reports and transaction management for a receipt-tracking backend")
        .arg(
            Arg::new("api_url")
                .long("api-url")
                .global(true)
                .value_name("URL")
                .help("Backend base URL (overrides SPENDVIEW_API_URL and the stored setting)"),
        )
        .arg(
            Arg::new("currency")
                .long("currency")
                .global(true)
                .value_name("CCY")
                .help("Display currency for this run"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Debug logging"),
        )
        .subcommand(
            Command::new("tx")
                .about("Transactions")
                .subcommand(
                    json_flags(Command::new("list"))
                        .arg(Arg::new("search").long("search"))
                        .arg(Arg::new("category").long("category"))
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        )
                        .arg(
                            Arg::new("csv")
                                .long("csv")
                                .action(ArgAction::SetTrue)
                                .conflicts_with_all(["json", "jsonl"])
                                .help("Print CSV"),
                        ),
                )
                .subcommand(edit_fields(Command::new("add"), true))
                .subcommand(edit_fields(
                    Command::new("edit").arg(
                        Arg::new("id")
                            .required(true)
                            .value_parser(value_parser!(i64)),
                    ),
                    false,
                ))
                .subcommand(
                    Command::new("rm").arg(
                        Arg::new("id")
                            .required(true)
                            .value_parser(value_parser!(i64)),
                    ),
                )
                .subcommand(
                    Command::new("scan")
                        .about("Upload a receipt image and show the extracted transaction")
                        .arg(Arg::new("file").required(true))
                        .arg(
                            Arg::new("save")
                                .long("save")
                                .action(ArgAction::SetTrue)
                                .help("Store the extracted transaction"),
                        )
                        .arg(
                            Arg::new("json")
                                .long("json")
                                .action(ArgAction::SetTrue),
                        ),
                ),
        )
        .subcommand(
            Command::new("category")
                .about("Expense categories")
                .subcommand(Command::new("list")),
        )
        .subcommand(
            Command::new("currency")
                .about("Preferred display currency")
                .subcommand(Command::new("show"))
                .subcommand(Command::new("set").arg(Arg::new("code").required(true)))
                .subcommand(Command::new("list"))
                .subcommand(
                    Command::new("rates")
                        .about("Exchange rates against a base currency")
                        .arg(
                            Arg::new("base")
                                .long("base")
                                .value_name("CCY")
                                .help("Defaults to the display currency"),
                        )
                        .arg(
                            Arg::new("refresh")
                                .long("refresh")
                                .action(ArgAction::SetTrue)
                                .help("Have the backend fetch fresh rates first"),
                        )
                        .arg(
                            Arg::new("json")
                                .long("json")
                                .action(ArgAction::SetTrue),
                        ),
                ),
        )
        .subcommand(
            Command::new("config")
                .about("Client settings")
                .subcommand(Command::new("show"))
                .subcommand(Command::new("set-url").arg(Arg::new("url").required(true))),
        )
        .subcommand(
            json_flags(Command::new("report"))
                .about("Spending report")
                .arg(period_arg())
                .subcommand(
                    Command::new("watch")
                        .about("Re-run the report for each period read from stdin"),
                ),
        )
        .subcommand(
            Command::new("export")
                .about("Download all transactions")
                .arg(
                    Arg::new("format")
                        .long("format")
                        .default_value("json")
                        .help("json | csv"),
                )
                .arg(Arg::new("out").long("out").required(true)),
        )
        .subcommand(
            Command::new("ask")
                .about("Ask a question about your spending")
                .arg(
                    Arg::new("question")
                        .required(true)
                        .num_args(1..)
                        .help("e.g. where did most of my money go last month?"),
                ),
        )
}
