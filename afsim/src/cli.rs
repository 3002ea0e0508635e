use std::{path::PathBuf, str::FromStr};

use core_types::Tier;
use ledger::{ConfigPatch, OrderRequest, PackagePatch};
use thiserror::Error;

pub const USAGE: &str = "usage: afsim [--ephemeral] <command>

commands:
  show
  deposit <amount> days <n> [start-day]
  deposit <amount> package <tier> [start-day]
  remove <order-id>
  clear
  reset
  defaults
  set <initial-lp-usdc|initial-lp-af|deposit-lp-ratio|deposit-buyback-ratio> <value>
  set-package <tier> <withdraw%> <keep%> <convert%>
  report <details.json> [page] [order-id]";

#[derive(Debug, Error, PartialEq)]
pub enum CliError {
    #[error("{USAGE}")]
    Usage,
    #[error("unknown command `{0}`\n\n{USAGE}")]
    UnknownCommand(String),
    #[error("invalid {what} `{value}`")]
    InvalidValue { what: &'static str, value: String },
    #[error("unknown config field `{0}`")]
    UnknownField(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    /// Keep state in memory only; nothing is read from or written to disk.
    pub ephemeral: bool,
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Show,
    Deposit(OrderRequest),
    Remove(String),
    Clear,
    Reset,
    Defaults,
    Set { field: ConfigField, value: f64 },
    SetPackage { tier: Tier, patch: PackagePatch },
    Report {
        details: PathBuf,
        /// Zero-based; the command line takes one-based page numbers.
        page: usize,
        order_id: Option<String>,
    },
}

/// Global parameters editable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigField {
    InitialLpUsdc,
    InitialLpAf,
    DepositLpRatio,
    DepositBuybackRatio,
}

impl ConfigField {
    pub fn patch(self, value: f64) -> ConfigPatch {
        let mut patch = ConfigPatch::default();
        match self {
            ConfigField::InitialLpUsdc => patch.initial_lp_usdc = Some(value),
            ConfigField::InitialLpAf => patch.initial_lp_af = Some(value),
            ConfigField::DepositLpRatio => patch.deposit_lp_ratio = Some(value),
            ConfigField::DepositBuybackRatio => patch.deposit_buyback_ratio = Some(value),
        }
        patch
    }
}

impl FromStr for ConfigField {
    type Err = CliError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "initial-lp-usdc" | "initialLpUsdc" => Ok(ConfigField::InitialLpUsdc),
            "initial-lp-af" | "initialLpAf" => Ok(ConfigField::InitialLpAf),
            "deposit-lp-ratio" | "depositLpRatio" => Ok(ConfigField::DepositLpRatio),
            "deposit-buyback-ratio" | "depositBuybackRatio" => {
                Ok(ConfigField::DepositBuybackRatio)
            }
            other => Err(CliError::UnknownField(other.to_string())),
        }
    }
}

pub fn parse(args: &[String]) -> Result<Invocation, CliError> {
    let mut args: Vec<&str> = args.iter().map(String::as_str).collect();
    let ephemeral = match args.iter().position(|arg| *arg == "--ephemeral") {
        Some(idx) => {
            args.remove(idx);
            true
        }
        None => false,
    };
    let (name, rest) = args.split_first().ok_or(CliError::Usage)?;
    let command = match (*name, rest) {
        ("show", []) => Command::Show,
        ("deposit", [amount, "days", days, start @ ..]) => {
            let request = OrderRequest::days(number(amount, "amount")?, number(days, "days")?);
            Command::Deposit(with_start(request, start)?)
        }
        ("deposit", [amount, "package", tier, start @ ..]) => {
            let request = OrderRequest::package(number(amount, "amount")?, number(tier, "tier")?);
            Command::Deposit(with_start(request, start)?)
        }
        ("remove", [id]) => Command::Remove(id.to_string()),
        ("clear", []) => Command::Clear,
        ("reset", []) => Command::Reset,
        ("defaults", []) => Command::Defaults,
        ("set", [field, value]) => Command::Set {
            field: field.parse()?,
            value: number(value, "value")?,
        },
        ("set-package", [tier, withdraw, keep, convert]) => Command::SetPackage {
            tier: number(tier, "tier")?,
            patch: PackagePatch::split(
                number(withdraw, "withdraw percent")?,
                number(keep, "keep percent")?,
                number(convert, "convert percent")?,
            ),
        },
        ("report", [details, tail @ ..]) if tail.len() <= 2 => {
            let page = match tail.first() {
                Some(page) => number::<usize>(page, "page")?.saturating_sub(1),
                None => 0,
            };
            Command::Report {
                details: PathBuf::from(details),
                page,
                order_id: tail.get(1).map(|id| id.to_string()),
            }
        }
        ("show" | "deposit" | "remove" | "clear" | "reset" | "defaults" | "set"
        | "set-package" | "report", _) => return Err(CliError::Usage),
        (other, _) => return Err(CliError::UnknownCommand(other.to_string())),
    };
    Ok(Invocation { ephemeral, command })
}

fn with_start(request: OrderRequest, start: &[&str]) -> Result<OrderRequest, CliError> {
    match start {
        [] => Ok(request),
        [day] => Ok(request.starting_on(number(day, "start day")?)),
        _ => Err(CliError::Usage),
    }
}

fn number<T: FromStr>(value: &str, what: &'static str) -> Result<T, CliError> {
    value.parse().map_err(|_| CliError::InvalidValue {
        what,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(line: &str) -> Vec<String> {
        line.split_whitespace().map(str::to_string).collect()
    }

    fn command(line: &str) -> Command {
        parse(&args(line)).unwrap().command
    }

    #[test]
    fn parses_deposits() {
        assert_eq!(
            command("deposit 1000 days 30"),
            Command::Deposit(OrderRequest::days(1_000.0, 30))
        );
        assert_eq!(
            command("deposit 250.5 package 3 7"),
            Command::Deposit(OrderRequest::package(250.5, 3).starting_on(7))
        );
    }

    #[test]
    fn ephemeral_flag_anywhere() {
        let invocation = parse(&args("show --ephemeral")).unwrap();
        assert!(invocation.ephemeral);
        assert_eq!(invocation.command, Command::Show);
        assert!(!parse(&args("show")).unwrap().ephemeral);
    }

    #[test]
    fn parses_edits() {
        assert_eq!(
            command("set deposit-lp-ratio 45"),
            Command::Set {
                field: ConfigField::DepositLpRatio,
                value: 45.0
            }
        );
        assert_eq!(
            command("set-package 2 50 30 20"),
            Command::SetPackage {
                tier: 2,
                patch: PackagePatch::split(50.0, 30.0, 20.0)
            }
        );
    }

    #[test]
    fn report_pages_are_one_based() {
        assert_eq!(
            command("report details.json"),
            Command::Report {
                details: PathBuf::from("details.json"),
                page: 0,
                order_id: None
            }
        );
        assert_eq!(
            command("report details.json 3 abc"),
            Command::Report {
                details: PathBuf::from("details.json"),
                page: 2,
                order_id: Some("abc".to_string())
            }
        );
        assert_eq!(
            command("report details.json 0"),
            Command::Report {
                details: PathBuf::from("details.json"),
                page: 0,
                order_id: None
            }
        );
    }

    #[test]
    fn field_patch_sets_one_field() {
        let patch = ConfigField::InitialLpAf.patch(5.0);
        assert_eq!(patch.initial_lp_af, Some(5.0));
        assert_eq!(patch.initial_lp_usdc, None);
        assert_eq!(patch.package_configs, None);
    }

    #[test]
    fn rejects_bad_input() {
        assert_eq!(parse(&[]), Err(CliError::Usage));
        assert_eq!(parse(&args("deposit 10 weeks 3")), Err(CliError::Usage));
        assert_eq!(parse(&args("clear now")), Err(CliError::Usage));
        assert_eq!(
            parse(&args("launch")),
            Err(CliError::UnknownCommand("launch".to_string()))
        );
        assert_eq!(
            parse(&args("deposit ten days 3")),
            Err(CliError::InvalidValue {
                what: "amount",
                value: "ten".to_string()
            })
        );
        assert_eq!(
            parse(&args("set burn-rate 3")),
            Err(CliError::UnknownField("burn-rate".to_string()))
        );
    }
}
