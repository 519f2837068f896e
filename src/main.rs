//! fincalc CLI
//!
//! Solves TVM, NPV/IRR, and bond problems from the command line by driving
//! the calculator engine. Pass --json for machine-readable output.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;

use fincalc::finance;
use fincalc::{Calculator, Register};

#[derive(Parser)]
#[command(name = "fincalc", version, about = "Financial equation solver")]
struct Cli {
    /// Emit results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Solve the TVM identity for the missing register
    Tvm(TvmArgs),
    /// Net present value of a cash-flow series
    Npv(NpvArgs),
    /// Internal rate of return of a cash-flow series
    Irr(IrrArgs),
    /// Bond price and yield
    Bond(BondArgs),
}

#[derive(Args)]
struct TvmArgs {
    /// Number of periods
    #[arg(long, allow_hyphen_values = true)]
    n: Option<f64>,

    /// Nominal annual rate, percent
    #[arg(long, allow_hyphen_values = true)]
    iyr: Option<f64>,

    /// Present value
    #[arg(long, allow_hyphen_values = true)]
    pv: Option<f64>,

    /// Periodic payment
    #[arg(long, allow_hyphen_values = true)]
    pmt: Option<f64>,

    /// Future value
    #[arg(long, allow_hyphen_values = true)]
    fv: Option<f64>,

    /// Payments per year
    #[arg(long, default_value_t = 1)]
    pyr: u32,

    /// Payments at period start (annuity due)
    #[arg(long)]
    begin: bool,

    /// Register to solve for (defaults to the blank one)
    #[arg(long, value_enum)]
    solve: Option<RegisterArg>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum RegisterArg {
    N,
    Iyr,
    Pv,
    Pmt,
    Fv,
}

impl From<RegisterArg> for Register {
    fn from(arg: RegisterArg) -> Self {
        match arg {
            RegisterArg::N => Register::N,
            RegisterArg::Iyr => Register::IYr,
            RegisterArg::Pv => Register::Pv,
            RegisterArg::Pmt => Register::Pmt,
            RegisterArg::Fv => Register::Fv,
        }
    }
}

#[derive(Args)]
struct NpvArgs {
    /// Nominal annual discount rate, percent
    #[arg(long, allow_hyphen_values = true)]
    rate: f64,

    /// Payments per year
    #[arg(long, default_value_t = 1)]
    pyr: u32,

    /// Cash flow, oldest first; repeat with an xN suffix (e.g. 300x5)
    #[arg(long = "flow", required = true, allow_hyphen_values = true)]
    flows: Vec<String>,
}

#[derive(Args)]
struct IrrArgs {
    /// Payments per year
    #[arg(long, default_value_t = 1)]
    pyr: u32,

    /// Cash flow, oldest first; repeat with an xN suffix (e.g. 300x5)
    #[arg(long = "flow", required = true, allow_hyphen_values = true)]
    flows: Vec<String>,
}

#[derive(Args)]
struct BondArgs {
    #[command(subcommand)]
    command: BondCommand,
}

#[derive(Subcommand)]
enum BondCommand {
    /// Price from a required yield
    Price {
        /// Face value
        #[arg(long, default_value_t = 1000.0)]
        face: f64,

        /// Annual coupon rate, percent
        #[arg(long)]
        coupon: f64,

        /// Required annual yield, percent
        #[arg(long = "yield", allow_hyphen_values = true)]
        yield_pct: f64,

        /// Years to maturity
        #[arg(long)]
        years: f64,

        /// Coupon payments per year
        #[arg(long, default_value_t = 2)]
        freq: u32,

        /// Call price; with --years-to-call, also prices to the call date
        #[arg(long, requires = "years_to_call")]
        call_price: Option<f64>,

        /// Years until the call date
        #[arg(long, requires = "call_price")]
        years_to_call: Option<f64>,
    },
    /// Yield implied by a market price
    Yield {
        /// Market price
        #[arg(long)]
        price: f64,

        /// Face value
        #[arg(long, default_value_t = 1000.0)]
        face: f64,

        /// Annual coupon rate, percent
        #[arg(long)]
        coupon: f64,

        /// Years to maturity
        #[arg(long)]
        years: f64,

        /// Coupon payments per year
        #[arg(long, default_value_t = 2)]
        freq: u32,

        /// Call price; with --years-to-call, also solves yield to call
        #[arg(long, requires = "years_to_call")]
        call_price: Option<f64>,

        /// Years until the call date
        #[arg(long, requires = "call_price")]
        years_to_call: Option<f64>,
    },
}

#[derive(Serialize)]
struct NpvResponse {
    rate_pct: f64,
    payments_per_year: u32,
    npv: f64,
    flows: Vec<finance::DiscountedFlow>,
}

#[derive(Serialize)]
struct IrrResponse {
    irr_pct: f64,
    sign_changes: u32,
}

#[derive(Serialize)]
struct BondPriceResponse {
    price: f64,
    price_to_call: Option<f64>,
}

#[derive(Serialize)]
struct BondYieldResponse {
    ytm_pct: f64,
    ytc_pct: Option<f64>,
    current_yield_pct: f64,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.command {
        Command::Tvm(args) => run_tvm(args, cli.json),
        Command::Npv(args) => run_npv(args, cli.json),
        Command::Irr(args) => run_irr(args, cli.json),
        Command::Bond(args) => run_bond(args, cli.json),
    }
}

fn run_tvm(args: TvmArgs, json: bool) -> Result<()> {
    let mut calc = Calculator::new();
    calc.set_payments_per_year(args.pyr)?;
    if args.begin {
        calc.toggle_timing();
    }
    let values = [
        (Register::N, args.n),
        (Register::IYr, args.iyr),
        (Register::Pv, args.pv),
        (Register::Pmt, args.pmt),
        (Register::Fv, args.fv),
    ];
    for (reg, value) in values {
        if let Some(v) = value {
            calc.set_register(reg, v);
        }
    }

    let pressed = match args.solve {
        Some(arg) => Register::from(arg),
        None => match calc.registers().blanks().as_slice() {
            [blank] => *blank,
            [] => bail!("all five registers given; pass --solve to pick one"),
            _ => bail!("need four of the five TVM registers"),
        },
    };
    let outcome = calc.solve_register(pressed)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        for reg in Register::ALL {
            let marker = if reg == outcome.solved { "  <- solved" } else { "" };
            match outcome.registers.get(reg) {
                Some(v) => println!("{:>5}: {:.6}{}", reg.label(), v, marker),
                None => println!("{:>5}: --", reg.label()),
            }
        }
    }
    Ok(())
}

fn load_flows(calc: &mut Calculator, flows: &[String]) -> Result<()> {
    for flow in flows {
        let (amount, repeat) = parse_flow(flow)?;
        calc.add_cash_flow(amount);
        if repeat > 1 {
            calc.set_repeat_count(repeat)?;
        }
    }
    Ok(())
}

/// One flow argument: an amount with an optional xN repeat suffix.
fn parse_flow(arg: &str) -> Result<(f64, u32)> {
    let (amount, repeat) = match arg.rsplit_once(['x', 'X']) {
        Some((amount, count)) => {
            let count = count
                .parse()
                .with_context(|| format!("bad repeat count in {:?}", arg))?;
            (amount, count)
        }
        None => (arg, 1),
    };
    let amount = amount
        .parse()
        .with_context(|| format!("bad cash flow {:?}", arg))?;
    Ok((amount, repeat))
}

fn run_npv(args: NpvArgs, json: bool) -> Result<()> {
    let mut calc = Calculator::new();
    calc.set_payments_per_year(args.pyr)?;
    load_flows(&mut calc, &args.flows)?;

    let npv = calc.compute_npv(args.rate)?;
    let periodic = (args.rate / 100.0) / args.pyr as f64;
    let breakdown = finance::discounted_flows(periodic, &calc.cash_flows().expanded());

    if json {
        let response = NpvResponse {
            rate_pct: args.rate,
            payments_per_year: args.pyr,
            npv,
            flows: breakdown,
        };
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        println!("{:>7} {:>14} {:>14}", "Period", "Cash Flow", "PV");
        for row in &breakdown {
            println!("{:>7} {:>14.2} {:>14.2}", row.period, row.amount, row.present_value);
        }
        println!();
        println!("NPV at {}%: {:.4}", args.rate, npv);
    }
    Ok(())
}

fn run_irr(args: IrrArgs, json: bool) -> Result<()> {
    let mut calc = Calculator::new();
    calc.set_payments_per_year(args.pyr)?;
    load_flows(&mut calc, &args.flows)?;

    let sign_changes = finance::sign_changes(&calc.cash_flows().expanded());
    let irr_pct = calc.compute_irr()?;

    if json {
        let response = IrrResponse {
            irr_pct,
            sign_changes,
        };
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        println!("IRR: {:.6}% per year", irr_pct);
        if sign_changes > 1 {
            println!(
                "note: {} sign changes; the series can admit multiple rates",
                sign_changes
            );
        }
    }
    Ok(())
}

fn run_bond(args: BondArgs, json: bool) -> Result<()> {
    match args.command {
        BondCommand::Price {
            face,
            coupon,
            yield_pct,
            years,
            freq,
            call_price,
            years_to_call,
        } => {
            let price = finance::bond::price(face, coupon / 100.0, yield_pct / 100.0, years, freq);
            let price_to_call = match (call_price, years_to_call) {
                (Some(call), Some(to_call)) => Some(finance::bond::price_to_call(
                    face,
                    call,
                    coupon / 100.0,
                    to_call,
                    yield_pct / 100.0,
                    freq,
                )),
                _ => None,
            };
            if json {
                let response = BondPriceResponse {
                    price,
                    price_to_call,
                };
                println!("{}", serde_json::to_string_pretty(&response)?);
            } else {
                println!("Price: {:.4}", price);
                if let Some(p) = price_to_call {
                    println!("Price to call: {:.4}", p);
                }
            }
        }
        BondCommand::Yield {
            price,
            face,
            coupon,
            years,
            freq,
            call_price,
            years_to_call,
        } => {
            let ytm = finance::bond::yield_to_maturity(price, face, coupon / 100.0, years, freq);
            if !ytm.is_finite() {
                bail!("yield solver did not converge");
            }
            let ytc = match (call_price, years_to_call) {
                (Some(call), Some(to_call)) => {
                    let y = finance::bond::yield_to_call(
                        price,
                        face,
                        call,
                        coupon / 100.0,
                        to_call,
                        freq,
                    );
                    if !y.is_finite() {
                        bail!("yield-to-call solver did not converge");
                    }
                    Some(y * 100.0)
                }
                _ => None,
            };
            let current = finance::bond::current_yield(coupon / 100.0 * face, price);
            if json {
                let response = BondYieldResponse {
                    ytm_pct: ytm * 100.0,
                    ytc_pct: ytc,
                    current_yield_pct: current * 100.0,
                };
                println!("{}", serde_json::to_string_pretty(&response)?);
            } else {
                println!("YTM: {:.4}%", ytm * 100.0);
                if let Some(y) = ytc {
                    println!("YTC: {:.4}%", y);
                }
                println!("Current yield: {:.4}%", current * 100.0);
            }
        }
    }
    Ok(())
}
