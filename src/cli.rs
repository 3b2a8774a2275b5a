// Copyright (c) Vino contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command};

fn json_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print one JSON object per line"),
    )
}

fn id_arg() -> Arg {
    Arg::new("id").long("id").required(true)
}

fn month_arg() -> Arg {
    Arg::new("month")
        .long("month")
        .value_name("YYYY-MM")
        .help("Reporting month (defaults to the current one)")
}

fn category_arg(required: bool) -> Arg {
    Arg::new("category")
        .long("category")
        .required(required)
        .help("Category id or name")
}

fn subcategory_arg() -> Arg {
    Arg::new("subcategory")
        .long("subcategory")
        .help("Subcategory id or name (within the category)")
}

fn tx_input_args(cmd: Command, required: bool) -> Command {
    cmd.arg(Arg::new("date").long("date").value_name("YYYY-MM-DD").required(required))
        .arg(Arg::new("amount").long("amount").required(required).help("Positive amount"))
        .arg(Arg::new("merchant").long("merchant").required(required).help("Merchant id or name"))
        .arg(category_arg(required))
        .arg(subcategory_arg())
        .arg(Arg::new("description").long("description"))
        .arg(
            Arg::new("income")
                .long("income")
                .action(ArgAction::SetTrue)
                .help("Record as income instead of an expense"),
        )
        .arg(
            Arg::new("expense")
                .long("expense")
                .action(ArgAction::SetTrue)
                .conflicts_with("income")
                .help("Record as an expense (the default for new movements)"),
        )
}

pub fn build_cli() -> Command {
    Command::new("vino")
        .about("Personal finance client: categories, merchants, rules, budgets and movements")
        .version(env!("CARGO_PKG_VERSION"))
        .arg(
            Arg::new("api-url")
                .long("api-url")
                .global(true)
                .value_name("URL")
                .help("Backend base URL (overrides VINO_API_URL and the config file)"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Debug logging"),
        )
        .subcommand(
            Command::new("login")
                .about("Sign in and remember the session")
                .arg(Arg::new("username").long("username").short('u').required(true))
                .arg(
                    Arg::new("password")
                        .long("password")
                        .short('p')
                        .help("Read from stdin when omitted"),
                ),
        )
        .subcommand(Command::new("logout").about("Forget the saved session"))
        .subcommand(Command::new("whoami").about("Show the signed-in user"))
        .subcommand(
            Command::new("config")
                .about("Show or change settings")
                .subcommand(Command::new("show"))
                .subcommand(Command::new("set-url").arg(Arg::new("url").required(true)))
                .subcommand(Command::new("set-currency").arg(Arg::new("currency").required(true))),
        )
        .subcommand(
            Command::new("category")
                .about("Categories and subcategories")
                .subcommand(json_args(Command::new("list")))
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("icon").long("icon"))
                        .arg(Arg::new("color").long("color"))
                        .arg(
                            Arg::new("sub")
                                .long("sub")
                                .action(ArgAction::Append)
                                .help("Subcategory to create with it (repeatable)"),
                        ),
                )
                .subcommand(
                    Command::new("edit")
                        .arg(id_arg())
                        .arg(Arg::new("name").long("name"))
                        .arg(Arg::new("icon").long("icon"))
                        .arg(Arg::new("color").long("color")),
                )
                .subcommand(Command::new("rm").arg(id_arg()))
                .subcommand(
                    Command::new("sub-add")
                        .arg(category_arg(true))
                        .arg(Arg::new("name").long("name").required(true)),
                )
                .subcommand(
                    Command::new("sub-edit")
                        .arg(id_arg())
                        .arg(Arg::new("name").long("name").required(true)),
                )
                .subcommand(Command::new("sub-rm").arg(id_arg())),
        )
        .subcommand(
            Command::new("merchant")
                .about("Merchants and their default category")
                .subcommand(json_args(Command::new("list")))
                .subcommand(json_args(Command::new("show").arg(id_arg())))
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(category_arg(false))
                        .arg(subcategory_arg()),
                )
                .subcommand(
                    Command::new("edit")
                        .arg(id_arg())
                        .arg(Arg::new("name").long("name"))
                        .arg(category_arg(false))
                        .arg(subcategory_arg()),
                )
                .subcommand(Command::new("rm").arg(id_arg())),
        )
        .subcommand(
            Command::new("rules")
                .about("Merchant categorization rules")
                .subcommand(json_args(Command::new("list")))
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("merchant").long("merchant").required(true))
                        .arg(category_arg(true))
                        .arg(subcategory_arg()),
                )
                .subcommand(
                    Command::new("edit")
                        .arg(id_arg())
                        .arg(Arg::new("merchant").long("merchant"))
                        .arg(category_arg(false))
                        .arg(subcategory_arg()),
                )
                .subcommand(Command::new("rm").arg(id_arg())),
        )
        .subcommand(
            Command::new("budget")
                .about("Monthly budgets")
                .subcommand(json_args(Command::new("list").arg(month_arg())))
                .subcommand(
                    Command::new("set")
                        .arg(category_arg(true))
                        .arg(subcategory_arg())
                        .arg(month_arg())
                        .arg(Arg::new("amount").long("amount").required(true)),
                )
                .subcommand(
                    Command::new("edit")
                        .arg(id_arg())
                        .arg(Arg::new("amount").long("amount"))
                        .arg(month_arg()),
                )
                .subcommand(Command::new("rm").arg(id_arg()))
                .subcommand(json_args(Command::new("status").arg(month_arg()))),
        )
        .subcommand(
            Command::new("tx")
                .about("Movements")
                .subcommand(json_args(
                    Command::new("list")
                        .arg(month_arg())
                        .arg(Arg::new("search").long("search"))
                        .arg(category_arg(false))
                        .arg(subcategory_arg())
                        .arg(Arg::new("merchant").long("merchant"))
                        .arg(Arg::new("from").long("from").value_name("YYYY-MM-DD"))
                        .arg(Arg::new("to").long("to").value_name("YYYY-MM-DD"))
                        .arg(
                            Arg::new("min")
                                .long("min")
                                .value_parser(clap::value_parser!(f64)),
                        )
                        .arg(
                            Arg::new("max")
                                .long("max")
                                .value_parser(clap::value_parser!(f64)),
                        )
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(clap::value_parser!(usize)),
                        ),
                ))
                .subcommand(tx_input_args(Command::new("add"), true))
                .subcommand(tx_input_args(Command::new("edit").arg(id_arg()), false))
                .subcommand(Command::new("rm").arg(id_arg())),
        )
        .subcommand(json_args(
            Command::new("stats")
                .about("Spending by category, top movements and data quality")
                .arg(month_arg())
                .arg(
                    Arg::new("top")
                        .long("top")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("5"),
                ),
        ))
        .subcommand(json_args(
            Command::new("dashboard")
                .about("Backend summary and breakdown for a month")
                .arg(month_arg()),
        ))
}
