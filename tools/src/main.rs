//! reimburse-runner: headless front end for the reimbursement calculator.
//!
//! Usage:
//!   reimburse-runner <days> <miles> <receipts>
//!   reimburse-runner <days> <miles> <receipts> --explain
//!   reimburse-runner --batch private_cases.json --out private_results.txt
//!   reimburse-runner --eval public_cases.json --report error_analysis.json
//!
//! Flags:
//!   --data-dir DIR   configuration root (default ./data)
//!   --model PATH     forest artifact (default <data-dir>/model/forest.json)
//!   --rules-only     skip the model and the blend step

use anyhow::{bail, Result};
use reimburse_core::{
    cases::{self, CaseInput},
    evaluation::{self, EvaluationReport},
    CalculatorConfig, ForestModel, HybridCalculator, ReimburseResult, RuleEngine, TripInput,
};
use std::env;
use std::time::Instant;

/// Either full blending or the rule engine alone.
enum Calculator {
    Hybrid(HybridCalculator),
    RulesOnly(RuleEngine),
}

impl Calculator {
    fn calculate(&self, input: &CaseInput) -> ReimburseResult<f64> {
        let (d, m, r) = (
            input.trip_duration_days,
            input.miles_traveled,
            input.total_receipts_amount,
        );
        match self {
            Calculator::Hybrid(calc) => calc.calculate(d, m, r),
            Calculator::RulesOnly(engine) => engine.calculate(d, m, r),
        }
    }

    fn rule_engine(&self) -> &RuleEngine {
        match self {
            Calculator::Hybrid(calc) => calc.rule_engine(),
            Calculator::RulesOnly(engine) => engine,
        }
    }
}

#[derive(serde::Serialize)]
struct ReportFile<'a> {
    generated_at: chrono::DateTime<chrono::Utc>,
    rules_only:   bool,
    report:       &'a EvaluationReport,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let data_dir = flag_value(&args, "--data-dir").unwrap_or("./data").to_string();
    let model_path = flag_value(&args, "--model")
        .map(str::to_string)
        .unwrap_or_else(|| format!("{data_dir}/model/forest.json"));
    let rules_only = has_flag(&args, "--rules-only");

    let config = CalculatorConfig::load(&data_dir)?;
    let calculator = if rules_only {
        Calculator::RulesOnly(RuleEngine::new(config.rules))
    } else {
        // Fatal when missing: every blending flow needs the model.
        let model = ForestModel::load(&model_path)?;
        Calculator::Hybrid(HybridCalculator::new(config, Box::new(model)))
    };

    if let Some(cases_path) = flag_value(&args, "--batch") {
        let out = flag_value(&args, "--out").unwrap_or("private_results.txt");
        return run_batch(&calculator, cases_path, out);
    }
    if let Some(cases_path) = flag_value(&args, "--eval") {
        let report_path = flag_value(&args, "--report");
        return run_eval(&calculator, cases_path, report_path, rules_only);
    }

    let positional = positional_args(&args);
    if positional.len() != 3 {
        bail!("Usage: reimburse-runner <days> <miles> <receipts> [--explain] [--rules-only]");
    }
    let days: i64 = positional[0].parse()?;
    let miles: f64 = positional[1].parse()?;
    let receipts: f64 = positional[2].parse()?;

    if has_flag(&args, "--explain") {
        let trip = TripInput::new(days, miles, receipts)?;
        print_trace(calculator.rule_engine(), &trip);
    }

    let input = CaseInput {
        trip_duration_days:    days,
        miles_traveled:        miles,
        total_receipts_amount: receipts,
    };
    println!("{:.2}", calculator.calculate(&input)?);
    Ok(())
}

fn run_batch(calculator: &Calculator, cases_path: &str, out: &str) -> Result<()> {
    let start = Instant::now();
    let cases = cases::load_cases(cases_path)?;
    let outcomes = cases::run_batch(&cases, |input| calculator.calculate(input));
    cases::write_results(out, &outcomes)?;
    println!(
        "Done: wrote {} lines to {out} in {:.1}s",
        outcomes.len(),
        start.elapsed().as_secs_f64()
    );
    Ok(())
}

fn run_eval(
    calculator: &Calculator,
    cases_path: &str,
    report_path: Option<&str>,
    rules_only: bool,
) -> Result<()> {
    let start = Instant::now();
    let cases = cases::load_cases(cases_path)?;
    let report = evaluation::evaluate(&cases, |input| calculator.calculate(input));

    println!("=== EVALUATION SUMMARY ===");
    println!("  total cases:    {}", report.total_cases);
    println!(
        "  exact (±$0.01): {} ({:.1}%)",
        report.exact_matches,
        report.exact_pct()
    );
    println!(
        "  close (±$1.00): {} ({:.1}%)",
        report.close_matches,
        report.close_pct()
    );
    println!("  average error:  ${:.2}", report.avg_error);
    println!("  maximum error:  ${:.2}", report.max_error);
    println!("  failed cases:   {}", report.failed_cases.len());
    println!("  score:          {:.2} (lower is better)", report.score);

    if !report.is_perfect() {
        println!();
        println!("=== HIGHEST-ERROR CASES ===");
        for case in report.worst(5) {
            println!(
                "  Case {}: {} days, {:.0} miles, ${:.2} receipts",
                case.case_num, case.trip_days, case.miles, case.receipts
            );
            println!(
                "    expected ${:.2}, got ${:.2}, error ${:.2}",
                case.expected, case.predicted, case.error
            );
        }
    }
    println!();
    println!("  execution time: {:.2}s", start.elapsed().as_secs_f64());

    if let Some(path) = report_path {
        let file = ReportFile {
            generated_at: chrono::Utc::now(),
            rules_only,
            report: &report,
        };
        std::fs::write(path, serde_json::to_string_pretty(&file)?)?;
        log::info!("eval: wrote error analysis to {path}");
    }
    Ok(())
}

fn print_trace(engine: &RuleEngine, trip: &TripInput) {
    let trace = engine.explain(trip);
    println!("=== RULE TRACE ===");
    for record in &trace.stages {
        println!(
            "  {:<22} {:>+10.2}  -> {:>10.2}",
            record.stage,
            record.delta(),
            record.after
        );
    }
    println!("  {:<22} {:>10}     {:>10.2}", "rule estimate", "", trace.total);
    println!();
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}

/// Arguments that are neither flags nor flag values.
fn positional_args(args: &[String]) -> Vec<&str> {
    const VALUE_FLAGS: [&str; 6] = ["--data-dir", "--model", "--batch", "--out", "--eval", "--report"];
    let mut out = Vec::new();
    let mut skip_next = false;
    for arg in args.iter().skip(1) {
        if skip_next {
            skip_next = false;
            continue;
        }
        if VALUE_FLAGS.contains(&arg.as_str()) {
            skip_next = true;
        } else if !arg.starts_with("--") {
            out.push(arg.as_str());
        }
    }
    out
}
