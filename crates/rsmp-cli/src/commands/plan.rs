//! Plan command
//!
//! Prints the filter tables and both pass order costs of a request without
//! running it.

use super::{resolve_options, target_size};
use crate::PlanArgs;
use anyhow::{Result, bail};
use rsmp_ops::{FilterTable, PassOrder, ResizePlan, Size};

pub fn run(args: PlanArgs, verbose: u8) -> Result<()> {
    let opts = resolve_options(&args.filter)?;
    let src = Size::new(args.src_width, args.src_height);
    let dst = target_size(src, &args.target)?;
    opts.validate()?;
    if dst.sample_count().is_none() || src.sample_count().is_none() {
        bail!("{} -> {} is too large to plan", src, dst);
    }
    if !dst.is_empty() && src.is_empty() {
        bail!("source {} has no pixels", src);
    }

    let plan = ResizePlan::new(src, dst, &opts.kernel, opts.x_boundary, opts.y_boundary);
    println!("{} -> {}  kernel {}", src, dst, opts.kernel);
    println!(
        "x table: {} entries, {} ops/row  ({})",
        plan.x_table().len(),
        plan.x_ops(),
        opts.x_boundary
    );
    println!(
        "y table: {} entries, {} ops/column  ({})",
        plan.y_table().len(),
        plan.y_ops(),
        opts.y_boundary
    );
    for order in [PassOrder::YThenX, PassOrder::XThenY] {
        let mark = if order == plan.order() { "*" } else { " " };
        println!("{} {:?}: {} ops", mark, order, plan.cost(order));
    }
    println!("intermediate: {}", plan.intermediate());

    if args.taps || verbose > 1 {
        print_table("x", plan.x_table());
        print_table("y", plan.y_table());
    }
    Ok(())
}

fn print_table(axis: &str, table: &FilterTable) {
    println!("{} taps:", axis);
    for (i, taps) in table.entries().enumerate() {
        let list = taps
            .iter()
            .map(|t| format!("{}:{:.4}", t.index, t.weight))
            .collect::<Vec<_>>()
            .join(" ");
        println!("  {:>5} | {}", i, list);
    }
}
