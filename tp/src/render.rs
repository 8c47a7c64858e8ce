//! Terminal rendering for the planner flows

use std::fmt::Write;

use chrono::NaiveDate;
use colored::{ColoredString, Colorize};

use crate::client::{
    ActivityStyle, FormStep, ItineraryView, PlannerForm, ProgressSnapshot, activity_style, weather_icon,
};

const BAR_WIDTH: usize = 30;

fn paint(text: &str, style: ActivityStyle) -> ColoredString {
    match style {
        ActivityStyle::Orange => text.truecolor(234, 88, 12),
        ActivityStyle::Blue => text.blue(),
        ActivityStyle::Purple => text.purple(),
        ActivityStyle::Green => text.green(),
        ActivityStyle::Indigo => text.truecolor(79, 70, 229),
        ActivityStyle::Pink => text.truecolor(219, 39, 119),
        ActivityStyle::Teal => text.cyan(),
        ActivityStyle::Grey => text.bright_black(),
    }
}

/// Overlay or page heading
pub fn heading(title: &str) -> String {
    format!("\n{}\n{}", title.bright_cyan().bold(), "─".repeat(title.chars().count()).dimmed())
}

/// Step list with the current step highlighted
pub fn form_steps(form: &PlannerForm) -> String {
    let mut out = String::new();
    for step in FormStep::ALL {
        let label = format!("{}. {}", step.number(), step.label());
        let line = if step == form.step() {
            label.bold().to_string()
        } else if step < form.step() {
            format!("{} {}", label.dimmed(), "✓".green())
        } else {
            label.dimmed().to_string()
        };
        let _ = writeln!(out, "  {}", line);
    }
    let _ = write!(out, "  {}% complete", form.progress());
    out
}

/// One-line progress bar with status text
pub fn progress_line(snapshot: &ProgressSnapshot) -> String {
    let filled = usize::from(snapshot.percent()) * BAR_WIDTH / 100;
    format!(
        "[{}{}] {:>3}%  {}",
        "█".repeat(filled).cyan(),
        "░".repeat(BAR_WIDTH - filled).dimmed(),
        snapshot.percent(),
        snapshot.status
    )
}

/// Summary cards and every day; only the expanded day lists activities
pub fn itinerary(view: &ItineraryView, today: NaiveDate) -> String {
    let mut out = String::new();
    let Some(itinerary) = view.itinerary() else {
        let _ = write!(out, "{}", "Loading itinerary...".dimmed());
        return out;
    };

    let _ = writeln!(out, "{}", itinerary.destination.bold().underline());
    if let Some(cards) = view.summary(today) {
        let _ = writeln!(
            out,
            "{} {}   {} {}   {} {}",
            "Duration:".dimmed(),
            cards.duration,
            "Pace:".dimmed(),
            cards.pace,
            "Budget:".dimmed(),
            cards.budget
        );
    }

    for (day, expanded) in view.days() {
        let marker = if expanded { "▾" } else { "▸" };
        let _ = writeln!(
            out,
            "\n{} {} {}  {} {}",
            marker,
            format!("Day {}", day.day).bold(),
            day.date.dimmed(),
            weather_icon(&day.weather).glyph(),
            day.weather
        );
        if !expanded {
            continue;
        }
        for activity in &day.activities {
            let style = activity_style(&activity.kind);
            let _ = writeln!(
                out,
                "    {}  {} {}",
                activity.time.bold(),
                activity.name,
                paint(&format!("[{}]", activity.kind), style)
            );
            if !activity.description.is_empty() {
                let _ = writeln!(out, "           {}", activity.description.dimmed());
            }
        }
    }

    let actions: Vec<String> = view.actions().iter().map(|a| a.label().to_string()).collect();
    let _ = write!(out, "\n{}", actions.join("  |  ").dimmed());
    out
}
