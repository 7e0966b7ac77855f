//! budget-engine CLI
//!
//! Budget planning, projections and market snapshots from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Totals, breakdown and goal progress for a month
//! budget-engine budget --income 3000 --expense Rent=1200 --expense Food=400 --goal 1000
//!
//! # Loan payment as JSON
//! budget-engine loan --amount 10000 --rate 5 --months 60 --format json
//!
//! # Group a spending CSV by category
//! budget-engine aggregate --input spending.csv --by category
//!
//! # Live market data (keys from config/dashboard.toml or BUDGET_DASH__*)
//! budget-engine quote --symbol MSFT
//! ```

use budget_engine::core::category::CategoryName;
use budget_engine::core::currency::CurrencyCode;
use budget_engine::core::money::format_currency;
use budget_engine::core::snapshot::{BudgetSnapshot, SavingsGoal};
use budget_engine::dashboard::market_board::LiveMarketBoard;
use budget_engine::dashboard::{BudgetView, Calculator, Concept, MoneyFlow, ResourceList};
use budget_engine::engine::aggregate::grand_total;
use budget_engine::engine::goal::compute_goal_progress;
use budget_engine::engine::projection::{compound_interest, LoanSummary};
use budget_engine::import::spending::{by_category, by_date, read_spending_file, write_spending, ImportOptions};
use budget_engine::market::{MarketConfig, Watchlist};
use budget_engine::simulation::{generate_spending, SpendingConfig};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Display;
use std::fs;
use std::future::Future;
use std::process;

fn print_usage() {
    eprintln!(
        r#"budget-engine — budget computation and market dashboard

USAGE:
    budget-engine <COMMAND> [OPTIONS]

COMMANDS:
    budget      Totals, expense breakdown and goal progress
    goal        Progress of a balance towards a savings goal
    compound    Compound-interest projection
    loan        Monthly loan payment
    aggregate   Group a spending CSV by date or category
    flow        Money-flow (Sankey) links for a budget
    generate    Generate a random spending CSV
    quote       Stock quote (default AAPL) and world indices
    rates       Currency and commodity rates
    crypto      Crypto prices
    economics   Latest US economic indicators
    concepts    Explain finance concepts
    resources   Recommended finance websites
    help        Show this message

OPTIONS (budget, flow):
    --income <AMOUNT>        Monthly income (default: 0)
    --expense <CAT=AMOUNT>   Expense line, repeatable
    --defaults               Start from Rent, Food, Transport, Entertainment, Other
    --goal <AMOUNT>          Savings goal (budget only, default: none)

OPTIONS (goal):
    --remaining <AMOUNT>     Remaining balance
    --goal <AMOUNT>          Savings goal

OPTIONS (compound):
    --principal <AMOUNT>  --rate <PERCENT>  --years <N>  --compounds <N> (default: 1)

OPTIONS (loan):
    --amount <AMOUNT>  --rate <PERCENT>  --months <N>

OPTIONS (aggregate):
    --input <FILE>           Spending CSV with Date, Amount, Category columns
    --by <KEY>               date or category (default: category)
    --date-format <FMT>      chrono format of the Date column (default: %Y-%m-%d)

OPTIONS (generate):
    --days <N>               Days of history (default: 30)
    --rows <N>               Max rows per day (default: 4)
    --seed <N>               Seed for reproducible output
    --output <FILE>          Write to file instead of stdout

OPTIONS (concepts):
    --name <CONCEPT>         One concept, e.g. compound-interest (default: all)

OPTIONS (quote, rates):
    --symbol <TICKER>        Stock symbol (quote only, default: AAPL)
    --base <CODE>            Base currency (rates only, default: USD)

COMMON:
    --format <FORMAT>        Output format: text (default) or json

ENVIRONMENT:
    RUST_LOG                 Log filter (default: info)
    BUDGET_DASH__FRED_API_KEY, BUDGET_DASH__METALS_API_KEY, ...

EXAMPLES:
    budget-engine budget --income 3000 --defaults --expense Rent=1200 --goal 1000
    budget-engine compound --principal 1000 --rate 5 --years 10 --compounds 12
    budget-engine generate --days 90 --seed 7 --output spending.csv
    budget-engine aggregate --input spending.csv --by date --format json"#
    );
}

fn fail(message: impl Display) -> ! {
    eprintln!("Error: {}", message);
    process::exit(1);
}

fn or_exit<T, E: Display>(result: Result<T, E>) -> T {
    result.unwrap_or_else(|e| fail(e))
}

fn next_value(args: &[String], i: &mut usize, flag: &str, expected: &str) -> String {
    *i += 1;
    args.get(*i)
        .cloned()
        .unwrap_or_else(|| fail(format!("{} requires {}", flag, expected)))
}

fn parse_decimal(flag: &str, value: &str) -> Decimal {
    value
        .trim()
        .parse()
        .unwrap_or_else(|e| fail(format!("invalid amount for {} '{}': {}", flag, value, e)))
}

fn parse_number<T: std::str::FromStr>(flag: &str, value: &str) -> T {
    value
        .parse()
        .unwrap_or_else(|_| fail(format!("{} requires a number, got '{}'", flag, value)))
}

fn parse_format(value: String) -> OutputFormat {
    match value.as_str() {
        "text" => OutputFormat::Text,
        "json" => OutputFormat::Json,
        other => fail(format!("unknown format '{}', expected 'text' or 'json'", other)),
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
}

fn print_json<T: Serialize>(value: &T) {
    println!("{}", or_exit(serde_json::to_string_pretty(value)));
}

/// Shared options of `budget` and `flow`.
struct BudgetArgs {
    income: Decimal,
    expenses: Vec<(String, Decimal)>,
    defaults: bool,
    goal: Decimal,
    format: OutputFormat,
}

fn parse_budget_args(args: &[String]) -> BudgetArgs {
    let mut parsed = BudgetArgs {
        income: Decimal::ZERO,
        expenses: Vec::new(),
        defaults: false,
        goal: Decimal::ZERO,
        format: OutputFormat::Text,
    };
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--income" => {
                let v = next_value(args, &mut i, "--income", "an amount");
                parsed.income = parse_decimal("--income", &v);
            }
            "--expense" => {
                let v = next_value(args, &mut i, "--expense", "CATEGORY=AMOUNT");
                let (category, amount) = v
                    .split_once('=')
                    .unwrap_or_else(|| fail(format!("--expense expects CATEGORY=AMOUNT, got '{}'", v)));
                parsed
                    .expenses
                    .push((category.to_string(), parse_decimal("--expense", amount)));
            }
            "--defaults" => parsed.defaults = true,
            "--goal" => {
                let v = next_value(args, &mut i, "--goal", "an amount");
                parsed.goal = parse_decimal("--goal", &v);
            }
            "--format" => parsed.format = parse_format(next_value(args, &mut i, "--format", "'text' or 'json'")),
            _ => fail(format!("unknown option: {}", args[i])),
        }
        i += 1;
    }
    parsed
}

fn build_snapshot(args: &BudgetArgs) -> BudgetSnapshot {
    let mut snapshot = if args.defaults {
        or_exit(BudgetSnapshot::with_default_categories(args.income))
    } else {
        or_exit(BudgetSnapshot::new(args.income))
    };
    for (category, amount) in &args.expenses {
        let name = CategoryName::new(category.as_str());
        if snapshot.expense(&name).is_some() {
            or_exit(snapshot.set_expense(&name, *amount));
        } else {
            or_exit(snapshot.add_expense(name, *amount));
        }
    }
    snapshot
}

fn cmd_budget(args: &[String]) {
    let parsed = parse_budget_args(args);
    let snapshot = build_snapshot(&parsed);
    let goal = or_exit(SavingsGoal::new(parsed.goal));
    let view = BudgetView::new(snapshot, goal);

    if parsed.format == OutputFormat::Json {
        print_json(&view);
        return;
    }

    println!("{}", view.totals());
    if !view.breakdown().is_empty() {
        println!("{}", view.breakdown());
    }
    println!("Savings Goal:  {}", view.progress().display());
    if view.goal().is_set() {
        println!("Target:        {}", format_currency(view.goal().target()));
    }
}

fn cmd_flow(args: &[String]) {
    let parsed = parse_budget_args(args);
    let flow = MoneyFlow::from_snapshot(&build_snapshot(&parsed));
    match parsed.format {
        OutputFormat::Json => print_json(&flow),
        OutputFormat::Text => print!("{}", flow),
    }
}

fn cmd_goal(args: &[String]) {
    let mut remaining = None;
    let mut goal = None;
    let mut format = OutputFormat::Text;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--remaining" => {
                let v = next_value(args, &mut i, "--remaining", "an amount");
                remaining = Some(parse_decimal("--remaining", &v));
            }
            "--goal" => {
                let v = next_value(args, &mut i, "--goal", "an amount");
                goal = Some(parse_decimal("--goal", &v));
            }
            "--format" => format = parse_format(next_value(args, &mut i, "--format", "'text' or 'json'")),
            _ => fail(format!("unknown option: {}", args[i])),
        }
        i += 1;
    }

    let remaining = remaining.unwrap_or_else(|| fail("--remaining <AMOUNT> is required"));
    let goal = goal.unwrap_or_else(|| fail("--goal <AMOUNT> is required"));
    let progress = or_exit(compute_goal_progress(remaining, goal));

    match format {
        OutputFormat::Json => print_json(&progress),
        OutputFormat::Text => {
            println!("Progress: {}", progress.display());
            if progress.is_reached() {
                println!("Goal reached.");
            }
        }
    }
}

fn cmd_compound(args: &[String]) {
    let mut principal = None;
    let mut rate = None;
    let mut years = None;
    let mut compounds = 1u32;
    let mut format = OutputFormat::Text;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--principal" => {
                let v = next_value(args, &mut i, "--principal", "an amount");
                principal = Some(parse_decimal("--principal", &v));
            }
            "--rate" => {
                let v = next_value(args, &mut i, "--rate", "a percentage");
                rate = Some(parse_decimal("--rate", &v));
            }
            "--years" => {
                let v = next_value(args, &mut i, "--years", "a number");
                years = Some(parse_decimal("--years", &v));
            }
            "--compounds" => {
                let v = next_value(args, &mut i, "--compounds", "a number");
                compounds = parse_number("--compounds", &v);
            }
            "--format" => format = parse_format(next_value(args, &mut i, "--format", "'text' or 'json'")),
            _ => fail(format!("unknown option: {}", args[i])),
        }
        i += 1;
    }

    let principal = principal.unwrap_or_else(|| fail("--principal <AMOUNT> is required"));
    let rate = rate.unwrap_or_else(|| fail("--rate <PERCENT> is required"));
    let years = years.unwrap_or_else(|| fail("--years <N> is required"));
    let future_value = or_exit(compound_interest(principal, rate, years, compounds));

    #[derive(Serialize)]
    struct CompoundOutput {
        principal: Decimal,
        annual_rate_percent: Decimal,
        years: Decimal,
        compounds_per_year: u32,
        future_value: Decimal,
        interest_earned: Decimal,
    }

    match format {
        OutputFormat::Json => print_json(&CompoundOutput {
            principal,
            annual_rate_percent: rate,
            years,
            compounds_per_year: compounds,
            future_value,
            interest_earned: future_value - principal,
        }),
        OutputFormat::Text => {
            println!("Future Value:    {}", format_currency(future_value));
            println!("Interest Earned: {}", format_currency(future_value - principal));
        }
    }
}

fn cmd_loan(args: &[String]) {
    let mut amount = None;
    let mut rate = None;
    let mut months = None;
    let mut format = OutputFormat::Text;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--amount" => {
                let v = next_value(args, &mut i, "--amount", "an amount");
                amount = Some(parse_decimal("--amount", &v));
            }
            "--rate" => {
                let v = next_value(args, &mut i, "--rate", "a percentage");
                rate = Some(parse_decimal("--rate", &v));
            }
            "--months" => {
                let v = next_value(args, &mut i, "--months", "a number");
                months = Some(parse_number::<u32>("--months", &v));
            }
            "--format" => format = parse_format(next_value(args, &mut i, "--format", "'text' or 'json'")),
            _ => fail(format!("unknown option: {}", args[i])),
        }
        i += 1;
    }

    let amount = amount.unwrap_or_else(|| fail("--amount <AMOUNT> is required"));
    let rate = rate.unwrap_or_else(|| fail("--rate <PERCENT> is required"));
    let months = months.unwrap_or_else(|| fail("--months <N> is required"));
    let summary = or_exit(LoanSummary::compute(amount, rate, months));

    match format {
        OutputFormat::Json => print_json(&summary),
        OutputFormat::Text => println!("{}", summary),
    }
}

fn cmd_aggregate(args: &[String]) {
    let mut input_path = None;
    let mut by = "category".to_string();
    let mut options = ImportOptions::default();
    let mut format = OutputFormat::Text;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--input" => input_path = Some(next_value(args, &mut i, "--input", "a file path")),
            "--by" => by = next_value(args, &mut i, "--by", "'date' or 'category'"),
            "--date-format" => {
                let v = next_value(args, &mut i, "--date-format", "a chrono format");
                options = options.with_date_format(&v);
            }
            "--format" => format = parse_format(next_value(args, &mut i, "--format", "'text' or 'json'")),
            _ => fail(format!("unknown option: {}", args[i])),
        }
        i += 1;
    }

    let path = input_path.unwrap_or_else(|| fail("--input <FILE> is required"));
    let rows = or_exit(read_spending_file(&path, &options));

    // Keys rendered as strings so both groupings share one output shape.
    let groups: BTreeMap<String, Decimal> = match by.as_str() {
        "date" => or_exit(by_date(&rows))
            .into_iter()
            .map(|(d, v)| (d.format("%Y-%m-%d").to_string(), v))
            .collect(),
        "category" => or_exit(by_category(&rows))
            .into_iter()
            .map(|(c, v)| (c.to_string(), v))
            .collect(),
        other => fail(format!("--by expects 'date' or 'category', got '{}'", other)),
    };
    let total = or_exit(grand_total(&rows));

    #[derive(Serialize)]
    struct AggregateOutput {
        by: String,
        rows: usize,
        total: Decimal,
        groups: BTreeMap<String, Decimal>,
    }

    match format {
        OutputFormat::Json => print_json(&AggregateOutput {
            by,
            rows: rows.len(),
            total,
            groups,
        }),
        OutputFormat::Text => {
            println!("=== Spending by {} ({} rows) ===", by, rows.len());
            for (key, amount) in &groups {
                println!("  {:<20} {:>14}", key, format_currency(*amount));
            }
            println!("  {:<20} {:>14}", "Total", format_currency(total));
        }
    }
}

fn cmd_generate(args: &[String]) {
    let mut config = SpendingConfig::default();
    let mut output_path: Option<String> = None;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--days" => {
                let v = next_value(args, &mut i, "--days", "a number");
                config.days = parse_number("--days", &v);
            }
            "--rows" => {
                let v = next_value(args, &mut i, "--rows", "a number");
                config.max_rows_per_day = parse_number("--rows", &v);
            }
            "--seed" => {
                let v = next_value(args, &mut i, "--seed", "a number");
                config.seed = Some(parse_number("--seed", &v));
            }
            "--output" => output_path = Some(next_value(args, &mut i, "--output", "a file path")),
            _ => fail(format!("unknown option: {}", args[i])),
        }
        i += 1;
    }

    let rows = generate_spending(&config);

    if let Some(path) = output_path {
        let file = fs::File::create(&path).unwrap_or_else(|e| fail(format!("cannot write '{}': {}", path, e)));
        or_exit(write_spending(file, &rows));
        eprintln!("Generated {} spending rows over {} days → {}", rows.len(), config.days, path);
    } else {
        or_exit(write_spending(std::io::stdout().lock(), &rows));
    }
}

/// Options shared by the market commands.
struct MarketArgs {
    watchlist: Watchlist,
    format: OutputFormat,
}

fn parse_market_args(args: &[String], allow_symbol: bool, allow_base: bool) -> MarketArgs {
    let mut parsed = MarketArgs {
        watchlist: Watchlist::default(),
        format: OutputFormat::Text,
    };
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--symbol" if allow_symbol => {
                let v = next_value(args, &mut i, "--symbol", "a ticker");
                parsed.watchlist = parsed.watchlist.with_stock(v.to_uppercase());
            }
            "--base" if allow_base => {
                let v = next_value(args, &mut i, "--base", "a currency code");
                parsed.watchlist.base_currency = CurrencyCode::new(v);
            }
            "--format" => parsed.format = parse_format(next_value(args, &mut i, "--format", "'text' or 'json'")),
            _ => fail(format!("unknown option: {}", args[i])),
        }
        i += 1;
    }
    parsed
}

fn live_board() -> LiveMarketBoard {
    let config = or_exit(MarketConfig::load());
    or_exit(LiveMarketBoard::from_config(&config))
}

fn block_on<F: Future>(future: F) -> F::Output {
    let runtime = or_exit(
        tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build(),
    );
    runtime.block_on(future)
}

fn cmd_quote(args: &[String]) {
    let parsed = parse_market_args(args, true, false);
    let board = live_board();
    let (stock, indices) = block_on(async {
        tokio::join!(
            board.stock(&parsed.watchlist.stock),
            board.indices(&parsed.watchlist)
        )
    });

    #[derive(Serialize)]
    struct QuoteOutput<'a> {
        stock: &'a budget_engine::dashboard::Tile<budget_engine::market::Quote>,
        indices: &'a [budget_engine::dashboard::Tile<budget_engine::market::Quote>],
    }

    match parsed.format {
        OutputFormat::Json => print_json(&QuoteOutput {
            stock: &stock,
            indices: &indices,
        }),
        OutputFormat::Text => {
            println!("{}", stock);
            if let Some(quote) = stock.data.as_ref().ok() {
                if let Some(first) = quote.history.first() {
                    let last = quote.history.last().unwrap_or(first);
                    println!("    {} → {}: {} → {}", first.date, last.date, format_currency(first.close), format_currency(last.close));
                }
                if let Some(cap) = quote.market_cap {
                    println!("    market cap {}", format_currency(cap));
                }
            }
            println!("\n--- Indices ---");
            for tile in &indices {
                println!("{}", tile);
            }
        }
    }
}

fn cmd_rates(args: &[String]) {
    let parsed = parse_market_args(args, false, true);
    let board = live_board();
    let (currencies, commodities) = block_on(async {
        tokio::join!(
            board.currencies(&parsed.watchlist),
            board.commodities(&parsed.watchlist)
        )
    });

    #[derive(Serialize)]
    struct RatesOutput<'a> {
        base: &'a CurrencyCode,
        currencies: &'a [budget_engine::dashboard::Tile<Decimal>],
        commodities: &'a [budget_engine::dashboard::Tile<Decimal>],
    }

    match parsed.format {
        OutputFormat::Json => print_json(&RatesOutput {
            base: &parsed.watchlist.base_currency,
            currencies: &currencies,
            commodities: &commodities,
        }),
        OutputFormat::Text => {
            println!("=== 1 {} buys ===", parsed.watchlist.base_currency);
            for tile in &currencies {
                println!("  {:<12} {}", tile.label, tile.data.display_or("unavailable", |r| r.round_dp(4).to_string()));
            }
            println!("\n=== Commodities ({} per unit) ===", parsed.watchlist.base_currency);
            for tile in &commodities {
                println!("  {:<12} {}", tile.label, tile.data.display_or("unavailable", |p| format_currency(*p)));
            }
        }
    }
}

fn cmd_crypto(args: &[String]) {
    let parsed = parse_market_args(args, false, false);
    let board = live_board();
    let coins = block_on(board.coins(&parsed.watchlist));

    match parsed.format {
        OutputFormat::Json => print_json(&coins),
        OutputFormat::Text => {
            println!("=== Crypto ===");
            for tile in &coins {
                println!("  {:<12} {}", tile.label, tile.data.display_or("unavailable", |p| format_currency(*p)));
            }
        }
    }
}

fn cmd_economics(args: &[String]) {
    let parsed = parse_market_args(args, false, false);
    let board = live_board();
    let series = block_on(board.series(&parsed.watchlist));

    match parsed.format {
        OutputFormat::Json => print_json(&series),
        OutputFormat::Text => {
            println!("=== Economic Indicators ===");
            for tile in &series {
                println!(
                    "  {:<24} {}",
                    tile.label,
                    tile.data.display_or("unavailable", |o| format!("{} (as of {})", o.value, o.date))
                );
            }
        }
    }
}

fn cmd_concepts(args: &[String]) {
    let mut selected: Vec<Concept> = Concept::ALL.to_vec();
    let mut format = OutputFormat::Text;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--name" => {
                let v = next_value(args, &mut i, "--name", "a concept");
                selected = vec![or_exit(v.parse::<Concept>())];
            }
            "--format" => format = parse_format(next_value(args, &mut i, "--format", "'text' or 'json'")),
            _ => fail(format!("unknown option: {}", args[i])),
        }
        i += 1;
    }

    #[derive(Serialize)]
    struct ConceptOutput {
        concept: Concept,
        title: &'static str,
        explanation: &'static str,
        calculator: Option<Calculator>,
    }

    match format {
        OutputFormat::Json => {
            let out: Vec<ConceptOutput> = selected
                .iter()
                .map(|c| ConceptOutput {
                    concept: *c,
                    title: c.title(),
                    explanation: c.explanation(),
                    calculator: c.calculator(),
                })
                .collect();
            print_json(&out);
        }
        OutputFormat::Text => {
            for concept in &selected {
                println!("{}", concept);
                match concept.calculator() {
                    Some(Calculator::CompoundInterest) => {
                        println!("  try: budget-engine compound --principal 1000 --rate 5 --years 10")
                    }
                    Some(Calculator::LoanPayment) => {
                        println!("  try: budget-engine loan --amount 10000 --rate 5 --months 60")
                    }
                    None => {}
                }
            }
        }
    }
}

fn cmd_resources(args: &[String]) {
    let mut format = OutputFormat::Text;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--format" => format = parse_format(next_value(args, &mut i, "--format", "'text' or 'json'")),
            _ => fail(format!("unknown option: {}", args[i])),
        }
        i += 1;
    }

    let resources = ResourceList::default();
    match format {
        OutputFormat::Json => print_json(&resources),
        OutputFormat::Text => print!("{}", resources),
    }
}

fn main() {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let command = args[1].as_str();
    let rest = &args[2..];

    match command {
        "budget" => cmd_budget(rest),
        "goal" => cmd_goal(rest),
        "compound" => cmd_compound(rest),
        "loan" => cmd_loan(rest),
        "aggregate" => cmd_aggregate(rest),
        "flow" => cmd_flow(rest),
        "generate" => cmd_generate(rest),
        "quote" => cmd_quote(rest),
        "rates" => cmd_rates(rest),
        "crypto" => cmd_crypto(rest),
        "economics" => cmd_economics(rest),
        "concepts" => cmd_concepts(rest),
        "resources" => cmd_resources(rest),
        "help" | "--help" | "-h" => print_usage(),
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            process::exit(1);
        }
    }
}
