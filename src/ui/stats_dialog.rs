use chrono::{Local, TimeZone};
use gtk4::prelude::*;
use gtk4::{ApplicationWindow, Grid, Label, Notebook, Orientation, ScrolledWindow};
use std::time::Duration;
use uuid::Uuid;

use crate::game::stats_manager::StatsManager;
use crate::model::{Difficulty, GameOutcome};

pub struct StatsDialog;

impl StatsDialog {
    fn format_duration(duration: Duration) -> String {
        let total_secs = duration.as_secs();
        format!("{}:{:02}", total_secs / 60, total_secs % 60)
    }

    fn format_date(millis: i64) -> String {
        Local
            .timestamp_millis_opt(millis)
            .single()
            .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "Unknown".to_string())
    }

    fn table(headers: &[&str]) -> Grid {
        let grid = Grid::new();
        grid.set_row_spacing(5);
        grid.set_column_spacing(15);
        grid.set_margin_start(10);
        grid.set_margin_end(10);
        grid.set_margin_top(10);
        for (i, header) in headers.iter().enumerate() {
            let label = Label::new(None);
            label.set_markup(&format!("<b>{}</b>", header));
            grid.attach(&label, i as i32, 0, 1, 1);
        }
        grid
    }

    fn attach_row(grid: &Grid, row: i32, cells: &[String], highlight: bool) {
        for (col, text) in cells.iter().enumerate() {
            let label = Label::new(Some(text));
            label.set_halign(if col == 0 {
                gtk4::Align::Start
            } else {
                gtk4::Align::End
            });
            if highlight {
                label.add_css_class("highlight-score");
            }
            grid.attach(&label, col as i32, row, 1, 1);
        }
    }

    fn create_high_scores_grid(stats_manager: &StatsManager, current: Option<Uuid>) -> Grid {
        let grid = Self::table(&["Player", "Difficulty", "Moves", "Time", "Category", "Date"]);
        for (i, score) in stats_manager.scores().iter().enumerate() {
            Self::attach_row(
                &grid,
                i as i32 + 1,
                &[
                    score.player_name.clone(),
                    score.difficulty.to_string(),
                    score.moves.to_string(),
                    Self::format_duration(score.time),
                    score.category.to_string(),
                    Self::format_date(score.date),
                ],
                current == Some(score.playthrough_id),
            );
        }
        grid
    }

    fn create_history_grid(stats_manager: &StatsManager, current: Option<Uuid>) -> Grid {
        let grid = Self::table(&[
            "Player",
            "Result",
            "Difficulty",
            "Category",
            "Moves",
            "Time",
            "Date",
        ]);
        for (i, record) in stats_manager.history().iter().enumerate() {
            let result = match record.result {
                GameOutcome::Won => "Won",
                GameOutcome::Lost => "Lost",
            };
            Self::attach_row(
                &grid,
                i as i32 + 1,
                &[
                    record.player_name.clone(),
                    result.to_string(),
                    record.difficulty.to_string(),
                    record.category.to_string(),
                    record.moves.to_string(),
                    Self::format_duration(record.time),
                    Self::format_date(record.date),
                ],
                current == Some(record.playthrough_id),
            );
        }
        grid
    }

    fn create_best_scores_grid(stats_manager: &StatsManager, selected: Difficulty) -> Grid {
        let grid = Grid::new();
        grid.set_row_spacing(5);
        grid.set_column_spacing(10);
        for (row, difficulty) in Difficulty::all().iter().enumerate() {
            let name = Label::new(Some(&format!("{}:", difficulty)));
            name.set_halign(gtk4::Align::Start);
            let best = stats_manager
                .best_score(*difficulty)
                .map(|score| score.to_string())
                .unwrap_or_else(|| "-".to_string());
            let value = Label::new(Some(&best));
            value.set_halign(gtk4::Align::End);
            if *difficulty == selected {
                name.add_css_class("highlight-score");
                value.add_css_class("highlight-score");
            }
            grid.attach(&name, 0, row as i32, 1, 1);
            grid.attach(&value, 1, row as i32, 1, 1);
        }
        grid
    }

    fn scrolled(child: &Grid) -> ScrolledWindow {
        ScrolledWindow::builder()
            .child(child)
            .min_content_height(300)
            .vexpand(true)
            .build()
    }

    /// Opens the records window. `current` highlights the rows of the game
    /// just finished, if any.
    pub fn show(
        window: &ApplicationWindow,
        stats_manager: &StatsManager,
        difficulty: Difficulty,
        current: Option<Uuid>,
    ) {
        let dialog = gtk4::Window::builder()
            .title("Scores")
            .transient_for(window)
            .modal(true)
            .default_width(560)
            .default_height(480)
            .build();

        let vbox = gtk4::Box::new(Orientation::Vertical, 10);
        vbox.set_margin_start(20);
        vbox.set_margin_end(20);
        vbox.set_margin_top(20);
        vbox.set_margin_bottom(20);

        let best_label = Label::new(None);
        best_label.set_markup("<b>Best Scores</b>");
        vbox.append(&best_label);
        vbox.append(&Self::create_best_scores_grid(stats_manager, difficulty));

        let notebook = Notebook::new();
        notebook.append_page(
            &Self::scrolled(&Self::create_high_scores_grid(stats_manager, current)),
            Some(&Label::new(Some("High Scores"))),
        );
        notebook.append_page(
            &Self::scrolled(&Self::create_history_grid(stats_manager, current)),
            Some(&Label::new(Some("Game History"))),
        );
        vbox.append(&notebook);

        let close_button = gtk4::Button::with_label("Close");
        close_button.set_halign(gtk4::Align::End);
        let dialog_ref = dialog.clone();
        close_button.connect_clicked(move |_| dialog_ref.close());
        vbox.append(&close_button);

        dialog.set_child(Some(&vbox));
        dialog.present();
    }
}
