//! List command - show a subject's content of one kind

use crate::cli::app::App;
use crate::cli::args::{ListArgs, OutputFormat};
use crate::content::ContentIndex;
use crate::error::MediResult;
use crate::ui::{self, UiContext};
use console::style;

/// One listing row
#[derive(Debug, Clone, PartialEq, Eq)]
struct Row {
    id: String,
    title: String,
    detail: String,
}

/// Execute the list command
pub async fn execute(args: ListArgs, app: &App) -> MediResult<()> {
    let index = app
        .resolver()
        .list_content(&args.year, &args.subject, args.kind)
        .await?;

    if index.is_empty() {
        match args.format {
            OutputFormat::Json => println!("[]"),
            OutputFormat::Plain => {}
            OutputFormat::Table => {
                let ctx = UiContext::detect();
                ui::step_info(
                    &ctx,
                    &format!(
                        "No {} found for {} / {}",
                        args.kind.label(),
                        args.year,
                        args.subject
                    ),
                );
            }
        }
        return Ok(());
    }

    match args.format {
        OutputFormat::Table => print_table(&args, &rows(&index)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&index)?),
        OutputFormat::Plain => {
            for row in rows(&index) {
                println!("{}", row.id);
            }
        }
    }

    Ok(())
}

fn rows(index: &ContentIndex) -> Vec<Row> {
    match index {
        ContentIndex::Lectures(entries) => entries
            .iter()
            .map(|entry| Row {
                id: entry.id.clone(),
                title: entry.title.clone(),
                detail: match &entry.file {
                    Some(file) => format!("{} ({})", entry.duration, file),
                    None => format!("{} (inline)", entry.duration),
                },
            })
            .collect(),
        ContentIndex::Quizzes(quizzes) => quizzes
            .iter()
            .map(|quiz| Row {
                id: quiz.id.clone(),
                title: quiz.title.clone(),
                detail: format!("{} questions", quiz.questions.len()),
            })
            .collect(),
        ContentIndex::Exams(exams) => exams
            .iter()
            .map(|exam| Row {
                id: exam.id.clone(),
                title: exam.title.clone(),
                detail: match exam.year {
                    Some(year) => format!("{}, {} questions", year, exam.questions.len()),
                    None => format!("{} questions", exam.questions.len()),
                },
            })
            .collect(),
    }
}

fn print_table(args: &ListArgs, rows: &[Row]) {
    let ctx = UiContext::detect();
    ui::intro(
        &ctx,
        &format!("{} - {} / {}", args.kind.label(), args.year, args.subject),
    );

    println!(
        "{:<20} {:<40} {:<24}",
        style("ID").bold(),
        style("TITLE").bold(),
        style("DETAIL").bold()
    );
    println!("{}", "-".repeat(84));

    for row in rows {
        println!("{:<20} {:<40} {:<24}", row.id, row.title, row.detail);
    }

    println!();
    println!("{} item(s)", rows.len());
}
