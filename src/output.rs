use console::{Alignment, Style, pad_str};

use crate::report::{MutantOutcome, RunReport, RunStatus, TaskResult};
use crate::tasks::TaskRegistry;

const TASK_WIDTH: usize = 18;
const CANONICAL_WIDTH: usize = 24;
const MUTANT_WIDTH: usize = 12;

pub fn print_error(msg: &str) {
    let style = Style::new().red().bold();
    eprintln!("{} {}", style.apply_to("✗"), msg);
}

pub fn print_success(msg: &str) {
    let style = Style::new().green().bold();
    println!("{} {}", style.apply_to("✓"), msg);
}

fn mark(ok: bool) -> String {
    if ok {
        Style::new().green().bold().apply_to("✓").to_string()
    } else {
        Style::new().red().bold().apply_to("✗").to_string()
    }
}

fn cell(text: &str, width: usize, align: Alignment) -> String {
    pad_str(text, width, align, Some("…")).into_owned()
}

fn status_note(status: RunStatus) -> String {
    match status {
        RunStatus::Passed | RunStatus::Failed => String::new(),
        other => Style::new().dim().apply_to(format!(" ({})", other)).to_string(),
    }
}

pub fn print_run_report(report: &RunReport) {
    let header = Style::new().magenta().bold();
    println!(
        "{} {} {} {}",
        header.apply_to(cell("Task", TASK_WIDTH, Alignment::Left)),
        header.apply_to(cell("Tests OK on reference?", CANONICAL_WIDTH, Alignment::Center)),
        header.apply_to(cell("Mutant", MUTANT_WIDTH, Alignment::Left)),
        header.apply_to("Caught?"),
    );

    for task in &report.tasks {
        print_task_rows(task);
    }

    println!();
    print_summary(report);
}

fn print_task_rows(task: &TaskResult) {
    let name = Style::new().bold().apply_to(&task.task).to_string();
    let canonical = format!("{}{}", mark(task.tests_ok_on_canonical), status_note(task.canonical_status));

    if task.mutant_outcomes.is_empty() {
        println!(
            "{} {} {}",
            cell(&name, TASK_WIDTH, Alignment::Left),
            cell(&canonical, CANONICAL_WIDTH, Alignment::Center),
            Style::new().dim().apply_to("(no mutants)"),
        );
    }

    for (i, mutant) in task.mutant_outcomes.iter().enumerate() {
        let first = i == 0;
        println!(
            "{} {} {} {}{}",
            cell(if first { name.as_str() } else { "" }, TASK_WIDTH, Alignment::Left),
            cell(if first { canonical.as_str() } else { "" }, CANONICAL_WIDTH, Alignment::Center),
            cell(&mutant.label, MUTANT_WIDTH, Alignment::Left),
            mark(mutant.caught),
            status_note(mutant.status),
        );
    }

    if let Some(reason) = &task.failure {
        let dim = Style::new().dim();
        println!("  {} {}", dim.apply_to("·"), dim.apply_to(reason));
    }
}

fn print_summary(report: &RunReport) {
    let pct = report.detection_rate() * 100.0;
    let line = format!(
        "{} / {} mutants caught ({:.1}%), tests pass on {} / {} references in {:.1}s",
        report.caught_mutants(),
        report.total_mutants(),
        pct,
        report.canonical_passes(),
        report.tasks.len(),
        report.duration_ms() as f64 / 1000.0,
    );
    if report.all_tasks_clean() {
        print_success(&line);
    } else {
        let style = Style::new().yellow().bold();
        println!("{} {}", style.apply_to("!"), line);
    }
    let dim = Style::new().dim();
    println!("  {} strategy: {}", dim.apply_to("·"), report.strategy);
}

pub fn print_status(report: &RunReport) {
    println!(
        "Last run ({}): {} tasks, {} / {} mutants caught ({:.1}%)",
        report.session,
        report.tasks.len(),
        report.caught_mutants(),
        report.total_mutants(),
        report.detection_rate() * 100.0,
    );

    let escaped: Vec<_> = report
        .tasks
        .iter()
        .flat_map(|t| t.escaped().map(move |m| (t, m)))
        .collect();
    let broken: Vec<_> = report.tasks.iter().filter(|t| !t.tests_ok_on_canonical).collect();

    for task in &broken {
        let style = Style::new().red();
        println!(
            "  {} {} tests do not pass on the reference ({})",
            style.apply_to("✗"),
            task.task,
            task.canonical_status,
        );
    }

    if !escaped.is_empty() {
        println!();
        let ref_style = Style::new().cyan().bold();
        for (task, mutant) in &escaped {
            println!(
                "  {} {} {}",
                ref_style.apply_to(format!("{}/{}", task.task, mutant.index)),
                mutant.label,
                Style::new().dim().apply_to(mutant.status),
            );
        }
        println!();
        println!("Use `spec2test show <task> <mutant>` for details on a specific mutant.");
    }
}

pub fn print_mutant_detail(task: &TaskResult, m: &MutantOutcome) {
    let ref_style = Style::new().cyan().bold();
    let dim = Style::new().dim();

    println!(
        "{} {} [{}] caught: {}",
        ref_style.apply_to(format!("{}/{}", task.task, m.index)),
        m.label,
        m.status,
        mark(m.caught),
    );
    println!();

    for line in m.diff.lines() {
        if line.starts_with('-') {
            println!("  {}", Style::new().red().apply_to(line));
        } else if line.starts_with('+') {
            println!("  {}", Style::new().green().apply_to(line));
        }
    }
    if m.diff.is_empty() {
        println!("  {}", dim.apply_to("(identical to the reference)"));
    }
}

pub fn print_task_list(registry: &TaskRegistry) {
    let name_style = Style::new().bold();
    let dim = Style::new().dim();
    for task in registry {
        println!(
            "{} {} {}",
            cell(&name_style.apply_to(&task.name).to_string(), TASK_WIDTH, Alignment::Left),
            dim.apply_to(format!("{} mutants, entry point {}", task.mutant_sources.len(), task.entry_point)),
            task.description,
        );
    }
}
