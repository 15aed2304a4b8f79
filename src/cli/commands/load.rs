//! Load command - fetch one document and print it

use crate::cli::app::App;
use crate::cli::args::{DocumentFormat, LoadArgs};
use crate::content::{ContentAddress, ContentDocument, ContentRequest, MarkerColor, Question, Section};
use crate::error::MediResult;
use crate::ui::{FetchProgress, UiContext};
use console::{style, Style};
use std::fmt::Write;
use std::time::Duration;

/// Execute the load command
pub async fn execute(args: LoadArgs, app: &App) -> MediResult<()> {
    let ctx = UiContext::detect();
    let address = ContentAddress::new(&args.year, &args.subject, args.kind, &args.file)?;
    let resolver = app.resolver();
    let timeout = args
        .timeout_ms
        .map(Duration::from_millis)
        .unwrap_or_else(|| resolver.timeout());

    let key = resolver.request_key(&address);
    let progress = FetchProgress::new(&ctx, key.as_str(), timeout);
    let result = resolver
        .load_content_with_timeout(&ContentRequest::File(address), timeout)
        .await;
    progress.finish();
    let document = result?;

    match args.format {
        DocumentFormat::Text => print!("{}", render_outline(&document)),
        DocumentFormat::Json => println!("{}", serde_json::to_string_pretty(&document)?),
    }

    Ok(())
}

/// Plain-text outline of a document
pub fn render_outline(document: &ContentDocument) -> String {
    let mut out = String::new();

    match document {
        ContentDocument::Lecture(lecture) => {
            let _ = writeln!(out, "{}", style(&lecture.title).bold());
            let _ = writeln!(out, "{}", style(&lecture.duration).dim());
            for section in &lecture.sections {
                out.push_str(&render_section(section));
            }
        }
        ContentDocument::Quiz(quiz) => {
            let _ = writeln!(out, "{}", style(&quiz.title).bold());
            render_questions(&mut out, &quiz.questions);
        }
        ContentDocument::Exam(exam) => {
            match exam.year {
                Some(year) => {
                    let _ = writeln!(out, "{} ({})", style(&exam.title).bold(), year);
                }
                None => {
                    let _ = writeln!(out, "{}", style(&exam.title).bold());
                }
            }
            render_questions(&mut out, &exam.questions);
        }
    }

    out
}

fn render_section(section: &Section) -> String {
    let content = &section.body().content;
    match section {
        Section::Heading(_) => format!("\n{}\n", style(content).bold().underlined()),
        Section::Paragraph(_) => format!("{}\n", content),
        Section::Bullet(_) => format!("  • {}\n", content),
        Section::Highlight(_) => {
            let color = section.marker().unwrap_or(MarkerColor::Yellow);
            format!("  ★ {}\n", marker_style(color).apply_to(content))
        }
        Section::Warning(_) => format!("  {} {}\n", style("⚠").red().bold(), content),
        Section::Image(_) => format!("  [image] {}\n", style(content).dim()),
    }
}

fn marker_style(color: MarkerColor) -> Style {
    match color {
        MarkerColor::Yellow => Style::new().yellow(),
        MarkerColor::Pink => Style::new().magenta(),
        MarkerColor::Blue => Style::new().blue(),
        MarkerColor::Green => Style::new().green(),
    }
}

fn render_questions(out: &mut String, questions: &[Question]) {
    for (n, question) in questions.iter().enumerate() {
        let _ = writeln!(out, "\n{}. {}", n + 1, question.text);
        for (i, option) in question.options.iter().enumerate() {
            let letter = (b'a' + (i % 26) as u8) as char;
            if i == question.correct_index {
                let _ = writeln!(out, "   {}) {} {}", letter, option, style("✓").green());
            } else {
                let _ = writeln!(out, "   {}) {}", letter, option);
            }
        }
        if !question.explanation.is_empty() {
            let _ = writeln!(out, "   {}", style(&question.explanation).dim());
        }
    }
}
