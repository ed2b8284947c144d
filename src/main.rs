//! optic-pricing - command line front end
//!
//! Handy for checking a tier configuration or trying an assurance total
//! before touching real receipts.
//!
//! ```bash
//! optic-pricing markup --sph -9.5 --cyl -1 --base-price 200
//! optic-pricing reconcile --target 225 --item 1x100 --item 1x100
//! ```

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

use optic_pricing::logging::init_logger;
use optic_pricing::markup::apply_markup;
use optic_pricing::types::price::{format_money, format_percent, parse_decimal};
use optic_pricing::{
    subtotal, EyeReading, LineItem, MarkupCalculator, PriceReconciler, PricingConfig, ReconcileOutcome,
};

#[derive(Debug, Parser)]
#[command(name = "optic-pricing")]
#[command(about = "Lens markup and assurance-total price reconciliation")]
struct Cli {
    /// TOML file with markup tiers and reconcile settings
    #[arg(long, global = true)]
    config: Option<String>,

    #[arg(long, short, global = true, help = "Enable verbose output")]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Markup percentage for one eye
    Markup {
        #[arg(long, allow_hyphen_values = true, default_value = "")]
        sph: String,

        #[arg(long, allow_hyphen_values = true, default_value = "")]
        cyl: String,

        /// Also print the marked-up price of this base price
        #[arg(long)]
        base_price: Option<String>,
    },

    /// Adjust unit prices so the total matches a target
    Reconcile {
        #[arg(long)]
        target: String,

        /// Line item as QUANTITYxUNIT_PRICE, repeatable
        #[arg(long = "item", value_parser = parse_item_spec)]
        items: Vec<ItemSpec>,

        /// Override the configured time budget
        #[arg(long)]
        time_budget_ms: Option<u64>,
    },
}

#[derive(Debug, Clone, PartialEq)]
struct ItemSpec {
    quantity: u32,
    price: Decimal,
}

fn parse_item_spec(spec: &str) -> Result<ItemSpec, String> {
    let (quantity, price) = spec
        .split_once(|c: char| c == 'x' || c == 'X')
        .ok_or_else(|| format!("expected QUANTITYxPRICE, got '{}'", spec))?;
    let quantity = quantity
        .trim()
        .parse::<u32>()
        .map_err(|e| format!("bad quantity in '{}': {}", spec, e))?;
    let price = parse_decimal(price).ok_or_else(|| format!("bad price in '{}'", spec))?;
    Ok(ItemSpec { quantity, price })
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    let config = match &cli.config {
        Some(path) => PricingConfig::from_file(path).with_context(|| format!("loading config from {}", path))?,
        None => PricingConfig::default(),
    };
    tracing::debug!(?config, "configuration loaded");

    match cli.command {
        Command::Markup { sph, cyl, base_price } => {
            let calculator = MarkupCalculator::new(config.markup);
            let percent = calculator.markup_for(&EyeReading::parse(&sph, &cyl));
            println!("Markup: {}", format_percent(percent));

            if let Some(raw) = base_price {
                let base = parse_decimal(&raw).with_context(|| format!("bad base price '{}'", raw))?;
                println!("Price:  {} -> {}", format_money(base), format_money(apply_markup(base, percent)));
            }
        }
        Command::Reconcile {
            target,
            items,
            time_budget_ms,
        } => {
            let target = parse_decimal(&target).with_context(|| format!("bad target '{}'", target))?;
            let items: Vec<LineItem> = items
                .into_iter()
                .enumerate()
                .map(|(i, spec)| LineItem::new(i as u64 + 1, spec.quantity, spec.price))
                .collect();

            let reconciler = PriceReconciler::new(config.reconcile);
            let mut request = reconciler.request(items, target);
            if let Some(budget) = time_budget_ms {
                request.time_budget_ms = budget;
            }

            println!("Current total: {}", format_money(subtotal(&request.items)));
            println!("Target total:  {}", format_money(target));

            match reconciler.reconcile_once(&request)? {
                ReconcileOutcome::Solved(solution) => {
                    for item in &solution.items {
                        println!(
                            "  #{:<3} {:>4} x {:>10} = {:>10}",
                            item.id,
                            item.quantity,
                            format_money(item.unit_price),
                            format_money(item.line_total())
                        );
                    }
                    println!("New total:     {} (score {})", format_money(solution.total), solution.score);
                }
                ReconcileOutcome::Failed(failure) => {
                    bail!("{}; please adjust prices manually", failure);
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_item_spec() {
        assert_eq!(
            parse_item_spec("2x49.90"),
            Ok(ItemSpec {
                quantity: 2,
                price: Decimal::new(4990, 2)
            })
        );
        assert_eq!(parse_item_spec("1X100").map(|spec| spec.price), Ok(Decimal::from(100)));
        assert!(parse_item_spec("100").is_err());
        assert!(parse_item_spec("ax100").is_err());
        assert!(parse_item_spec("1xabc").is_err());
    }
}
