//! SwiftBar plugin output.
//!
//! The first line is the menu bar title; every following line is a dropdown
//! item with `| key=value` display parameters. Sections are separated by a
//! bare `---` line.

use std::fmt;
use std::path::Path;

use chrono::{DateTime, Duration, Local, NaiveDate};

use vitals_core::{
    ActivityRecord, BodyBatteryRecord, Goals, HealthStore, Metric, SleepRecord, StressRecord,
    WeightRecord,
};

use crate::config::WidgetSection;
use crate::constants::SERVICE_URL;
use crate::ui::format::{format_number, format_number_short, format_time_ago};

const SEPARATOR: &str = "---";
const DETAIL_STYLE: &str = "size=11 color=#666666,#bbbbbb";
const ITEM_COLOR: &str = "color=black,white";
const GREEN: &str = "green";
const ORANGE: &str = "#f0ad4e";
const RED: &str = "#d9534f";

/// Everything the widget shows, read once from the store.
#[derive(Debug, Clone)]
pub struct Dashboard {
    pub today: NaiveDate,
    pub goals: Goals,
    pub steps: Option<ActivityRecord>,
    pub avg_steps: u32,
    pub weight: Option<WeightRecord>,
    pub weight_trend: f64,
    pub sleep: Option<SleepRecord>,
    pub avg_sleep_hours: f64,
    pub workouts: usize,
    pub body_battery: Option<BodyBatteryRecord>,
    pub stress: Option<StressRecord>,
    /// Minutes since `daily_stats.json` was written; `None` when unknown.
    pub data_age_minutes: Option<i64>,
    /// Local `HH:MM` of the last write to `daily_stats.json`.
    pub last_sync: Option<String>,
}

impl Dashboard {
    pub fn collect(store: &HealthStore, now: DateTime<Local>) -> vitals_core::Result<Self> {
        let today = store.today();
        let modified = modified_at(&store.path_for(Metric::Activity));
        Ok(Self {
            today,
            goals: store.goals()?.clone(),
            steps: store.latest_with_steps()?.cloned(),
            avg_steps: store.avg_steps(7)?,
            weight: store.latest::<WeightRecord>()?.cloned(),
            weight_trend: store.weight_trend(7)?,
            sleep: store.latest_with_sleep()?.cloned(),
            avg_sleep_hours: store.avg_sleep_hours(7)?,
            workouts: store.workouts_since(today - Duration::days(7))?,
            body_battery: store.latest::<BodyBatteryRecord>()?.cloned(),
            stress: store.latest::<StressRecord>()?.cloned(),
            data_age_minutes: modified.map(|at| (now - at).num_minutes()),
            last_sync: modified.map(|at| at.format("%H:%M").to_string()),
        })
    }
}

fn modified_at(path: &Path) -> Option<DateTime<Local>> {
    let modified = std::fs::metadata(path).and_then(|m| m.modified()).ok()?;
    Some(DateTime::<Local>::from(modified))
}

/// Renders a [`Dashboard`] as plugin text.
pub struct WidgetRenderer<'a> {
    settings: &'a WidgetSection,
    /// Program the dropdown actions invoke.
    exe: &'a str,
}

impl<'a> WidgetRenderer<'a> {
    pub fn new(settings: &'a WidgetSection, exe: &'a str) -> Self {
        Self { settings, exe }
    }

    pub fn render(&self, d: &Dashboard) -> String {
        let mut lines = vec![self.menu_bar(d), SEPARATOR.to_string()];
        lines.push(format!(
            "Health Dashboard | size=14 sfimage=heart.fill sfcolor=red shortcut=CMD+OPTION+H {}",
            ITEM_COLOR
        ));
        lines.push(SEPARATOR.to_string());
        lines.extend(goals_section(d));
        lines.push(SEPARATOR.to_string());
        lines.extend(vitals_section(d));
        lines.push(SEPARATOR.to_string());
        lines.extend(self.analytics_section());
        lines.push(SEPARATOR.to_string());
        lines.extend(self.quick_actions());
        lines.push(SEPARATOR.to_string());
        lines.extend(self.footer(d));
        lines.join("\n")
    }

    pub fn menu_bar(&self, d: &Dashboard) -> String {
        let mut parts = Vec::new();

        if let Some(stats) = &d.steps {
            let counts = format!(
                "{}/{}",
                format_number_short(u64::from(stats.total_steps)),
                format_number_short(u64::from(d.goals.daily_steps))
            );
            if d.goals.steps_pct(stats.total_steps) >= 100.0 {
                parts.push(format!("\u{2713} {}", counts));
            } else {
                parts.push(counts);
            }
        }

        if let Some(sleep) = &d.sleep {
            parts.push(format!("\u{1F4A4}{:.1}h", sleep.duration_hours()));
        }

        if self.settings.show_freshness {
            let age = d.data_age_minutes.unwrap_or(-1);
            let ago = format_time_ago(age);
            if age > self.settings.freshness_warning_minutes {
                parts.push(format!("\u{26A0}\u{FE0F}{}", ago));
            } else {
                parts.push(format!("\u{00B7} {}", ago));
            }
        }

        if parts.is_empty() {
            "\u{2764}\u{FE0F} --".to_string()
        } else {
            parts.join(" ")
        }
    }

    fn action(&self, label: &str, command: &str, extra: Option<&str>) -> String {
        let extra = extra.map(|e| format!("{} ", e)).unwrap_or_default();
        format!(
            "{} | bash='{}' param1='{}' terminal=true {}{}",
            label, self.exe, command, extra, ITEM_COLOR
        )
    }

    fn analytics_section(&self) -> Vec<String> {
        vec![
            format!(
                "Analytics | size=12 sfimage=chart.line.uptrend.xyaxis {}",
                ITEM_COLOR
            ),
            self.action("--\u{1F4CA} Goal Progress", "goals", None),
            self.action("--\u{1F4C8} Sleep Report", "sleep-report", None),
            self.action("--\u{1F4C5} Weekly Patterns", "patterns", None),
            self.action("--\u{1F4C9} Weight Trend", "weight-trend", None),
        ]
    }

    fn quick_actions(&self) -> Vec<String> {
        vec![
            format!("Quick Actions | size=12 sfimage=bolt.fill {}", ITEM_COLOR),
            self.action("--\u{1F4C8} Today's Stats", "today", Some("shortcut=CMD+T")),
            self.action("--\u{2696}\u{FE0F} Recent Weigh-ins", "weight", None),
            self.action("--\u{1F634} Last Night's Sleep", "sleep", None),
            self.action("--\u{1F3C3} Recent Activities", "activities", None),
        ]
    }

    fn footer(&self, d: &Dashboard) -> Vec<String> {
        let sync_label = match &d.last_sync {
            Some(at) => format!("\u{1F504} Sync Data (last: {})", at),
            None => "\u{1F504} Sync Data".to_string(),
        };
        vec![
            self.action(&sync_label, "export", None),
            format!(
                "\u{1F310} Open Garmin Connect | href={} {}",
                SERVICE_URL, ITEM_COLOR
            ),
            SEPARATOR.to_string(),
            format!(
                "Refresh | refresh=true sfimage=arrow.clockwise {}",
                ITEM_COLOR
            ),
        ]
    }
}

fn goals_section(d: &Dashboard) -> Vec<String> {
    let mut lines = Vec::new();
    let goals = &d.goals;

    if let Some(stats) = &d.steps {
        let pct = goals.steps_pct(stats.total_steps);
        let badge = if pct >= 100.0 {
            "\u{2713}".to_string()
        } else {
            let remaining = i64::from(goals.daily_steps) - i64::from(stats.total_steps);
            format!("{} to go", format_number(remaining))
        };
        let date_suffix = if stats.date == d.today {
            String::new()
        } else {
            format!(" ({})", stats.date)
        };
        lines.push(format!(
            "Steps: {} {}%{} | sfimage=figure.walk sfcolor={} badge={} {}",
            progress_bar(pct, 10),
            pct as i64,
            date_suffix,
            goal_color(pct),
            badge,
            ITEM_COLOR
        ));
        lines.push(format!(
            "   {} / {} (7d avg: {}) | {}",
            format_number(i64::from(stats.total_steps)),
            format_number(i64::from(goals.daily_steps)),
            format_number(i64::from(d.avg_steps)),
            DETAIL_STYLE
        ));
    }

    if let Some(weight) = &d.weight {
        let diff = weight.weight_kg - goals.weight_kg;
        let badge = if diff <= 0.0 {
            "Goal!".to_string()
        } else {
            format!("-{:.1}kg", diff)
        };
        lines.push(format!(
            "Weight: {:.1}kg \u{2192} {:.0}kg | sfimage=scalemass sfcolor={} badge={} {}",
            weight.weight_kg,
            goals.weight_kg,
            weight_color(diff),
            badge,
            ITEM_COLOR
        ));
        lines.push(format!(
            "   {} \u{00B7} 7d: {:+.1}kg | {}",
            weight.date, d.weight_trend, DETAIL_STYLE
        ));
    }

    if let Some(sleep) = &d.sleep {
        let hours = sleep.duration_hours();
        let pct = goals.sleep_pct(hours);
        let badge = if pct >= 100.0 {
            "\u{2713}".to_string()
        } else {
            format!("+{}min", ((goals.sleep_hours - hours) * 60.0) as i64)
        };
        // A night is current when it ended today or yesterday.
        let date_suffix = if (d.today - sleep.date).num_days() <= 1 {
            String::new()
        } else {
            format!(" ({})", sleep.date)
        };
        lines.push(format!(
            "Sleep: {} {}%{} | sfimage=moon.zzz sfcolor={} badge={} {}",
            progress_bar(pct, 10),
            pct as i64,
            date_suffix,
            goal_color(pct),
            badge,
            ITEM_COLOR
        ));
        let score = if sleep.score > 0 {
            format!(" \u{00B7} Score: {}", sleep.score)
        } else {
            String::new()
        };
        lines.push(format!(
            "   {:.1}h / {:.0}h (7d avg: {:.1}h){} | {}",
            hours, goals.sleep_hours, d.avg_sleep_hours, score, DETAIL_STYLE
        ));
    }

    let workouts = d.workouts as u32;
    let pct = goals.workouts_pct(workouts);
    let badge = if workouts >= goals.workouts_per_week {
        "\u{2713}".to_string()
    } else {
        format!("{} more", goals.workouts_per_week - workouts)
    };
    lines.push(format!(
        "Workouts: {} {}/{} | sfimage=figure.run sfcolor={} badge={} {}",
        progress_bar(pct, 10),
        workouts,
        goals.workouts_per_week,
        goal_color(pct),
        badge,
        ITEM_COLOR
    ));

    lines
}

fn vitals_section(d: &Dashboard) -> Vec<String> {
    let mut lines = vec![format!(
        "Vitals | size=12 sfimage=waveform.path.ecg {}",
        ITEM_COLOR
    )];

    if let Some(battery) = d.body_battery.as_ref().filter(|b| b.charged > 0) {
        let color = if battery.charged < 25 {
            RED
        } else if battery.charged < 50 {
            ORANGE
        } else {
            GREEN
        };
        lines.push(format!(
            "--Body Battery: {}% | sfimage=battery.100 sfcolor={} {}",
            battery.charged, color, ITEM_COLOR
        ));
    }

    if let Some(stress) = d.stress.as_ref().filter(|s| s.avg_level > 0) {
        let color = if stress.avg_level > 50 {
            RED
        } else if stress.avg_level > 25 {
            ORANGE
        } else {
            GREEN
        };
        lines.push(format!(
            "--Stress Level: {} | sfimage=brain.head.profile sfcolor={} {}",
            stress.avg_level, color, ITEM_COLOR
        ));
    }

    lines
}

/// Fallback output when the dashboard cannot be built.
pub fn render_error(err: &dyn fmt::Display) -> String {
    format!(
        "\u{26A0}\u{FE0F} Error | color=red\n{}\nError: {} | color=red",
        SEPARATOR,
        single_line(&err.to_string())
    )
}

fn single_line(text: &str) -> String {
    text.replace(['\n', '\r'], " ")
}

/// `▰▱` bar of `width` cells; `pct` is clamped to 0..=100.
pub fn progress_bar(pct: f64, width: usize) -> String {
    let pct = pct.clamp(0.0, 100.0);
    let filled = ((pct * width as f64 / 100.0) as usize).min(width);
    format!("{}{}", "\u{25B0}".repeat(filled), "\u{25B1}".repeat(width - filled))
}

/// Color for a goal completion percentage.
pub fn goal_color(pct: f64) -> &'static str {
    if pct >= 100.0 {
        GREEN
    } else if pct >= 75.0 {
        ORANGE
    } else {
        RED
    }
}

/// Color for kilograms above the goal weight.
pub fn weight_color(diff: f64) -> &'static str {
    if diff <= 0.0 {
        GREEN
    } else if diff < 5.0 {
        ORANGE
    } else {
        RED
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn stats(date: &str, steps: u32) -> ActivityRecord {
        ActivityRecord {
            date: day(date),
            total_steps: steps,
            total_calories: 0,
            active_calories: 0,
            active_seconds: 0,
            resting_hr: None,
            max_hr: None,
            min_hr: None,
            avg_stress: None,
            floors_climbed: 0.0,
            distance_meters: 0.0,
        }
    }

    fn night(date: &str, seconds: u32, score: u32) -> SleepRecord {
        SleepRecord {
            date: day(date),
            duration_seconds: seconds,
            score,
            deep_seconds: 0,
            light_seconds: 0,
            rem_seconds: 0,
            awake_seconds: 0,
        }
    }

    fn empty(today: &str) -> Dashboard {
        Dashboard {
            today: day(today),
            goals: Goals::default(),
            steps: None,
            avg_steps: 0,
            weight: None,
            weight_trend: 0.0,
            sleep: None,
            avg_sleep_hours: 0.0,
            workouts: 0,
            body_battery: None,
            stress: None,
            data_age_minutes: None,
            last_sync: None,
        }
    }

    fn sample() -> Dashboard {
        Dashboard {
            steps: Some(stats("2025-03-11", 9_300)),
            avg_steps: 8_450,
            weight: Some(WeightRecord {
                date: day("2025-03-10"),
                weight_kg: 78.44,
                bmi: None,
                body_fat_pct: None,
                muscle_mass_kg: None,
                bone_mass_kg: None,
                body_water_pct: None,
            }),
            weight_trend: -0.6,
            sleep: Some(night("2025-03-11", 27_000, 81)),
            avg_sleep_hours: 7.2,
            workouts: 1,
            body_battery: Some(BodyBatteryRecord {
                date: day("2025-03-11"),
                charged: 45,
                drained: 30,
            }),
            stress: Some(StressRecord {
                date: day("2025-03-11"),
                avg_level: 22,
                max_level: 80,
            }),
            data_age_minutes: Some(12),
            last_sync: Some("09:41".to_string()),
            ..empty("2025-03-11")
        }
    }

    fn settings() -> WidgetSection {
        WidgetSection::default()
    }

    #[test]
    fn test_progress_bar() {
        assert_eq!(progress_bar(0.0, 10), "▱▱▱▱▱▱▱▱▱▱");
        assert_eq!(progress_bar(93.0, 10), "▰▰▰▰▰▰▰▰▰▱");
        assert_eq!(progress_bar(150.0, 10), "▰▰▰▰▰▰▰▰▰▰");
        assert_eq!(progress_bar(-5.0, 4), "▱▱▱▱");
    }

    #[test]
    fn test_colors() {
        assert_eq!(goal_color(100.0), "green");
        assert_eq!(goal_color(75.0), "#f0ad4e");
        assert_eq!(goal_color(74.9), "#d9534f");
        assert_eq!(weight_color(-1.0), "green");
        assert_eq!(weight_color(4.9), "#f0ad4e");
        assert_eq!(weight_color(5.0), "#d9534f");
    }

    #[test]
    fn test_menu_bar_parts() {
        let settings = settings();
        let renderer = WidgetRenderer::new(&settings, "/usr/local/bin/vitals");
        assert_eq!(renderer.menu_bar(&sample()), "9.3k/10k 💤7.5h · 12m");

        let mut met = sample();
        met.steps = Some(stats("2025-03-11", 10_000));
        met.data_age_minutes = Some(95);
        assert_eq!(renderer.menu_bar(&met), "✓ 10k/10k 💤7.5h ⚠️1h");
    }

    #[test]
    fn test_menu_bar_without_data() {
        let settings = WidgetSection {
            show_freshness: false,
            ..WidgetSection::default()
        };
        let renderer = WidgetRenderer::new(&settings, "vitals");
        assert_eq!(renderer.menu_bar(&empty("2025-03-11")), "❤️ --");
    }

    #[test]
    fn test_unknown_age_is_not_stale() {
        let settings = settings();
        let renderer = WidgetRenderer::new(&settings, "vitals");
        assert_eq!(renderer.menu_bar(&empty("2025-03-11")), "· ?");
    }

    #[test]
    fn test_goals_lines() {
        let lines = goals_section(&sample());
        assert_eq!(
            lines[0],
            "Steps: ▰▰▰▰▰▰▰▰▰▱ 93% | sfimage=figure.walk sfcolor=#f0ad4e badge=700 to go color=black,white"
        );
        assert_eq!(
            lines[1],
            "   9,300 / 10,000 (7d avg: 8,450) | size=11 color=#666666,#bbbbbb"
        );
        assert_eq!(
            lines[2],
            "Weight: 78.4kg → 75kg | sfimage=scalemass sfcolor=#f0ad4e badge=-3.4kg color=black,white"
        );
        assert_eq!(
            lines[3],
            "   2025-03-10 · 7d: -0.6kg | size=11 color=#666666,#bbbbbb"
        );
        assert_eq!(
            lines[4],
            "Sleep: ▰▰▰▰▰▰▰▰▰▰ 107% | sfimage=moon.zzz sfcolor=green badge=✓ color=black,white"
        );
        assert_eq!(
            lines[5],
            "   7.5h / 7h (7d avg: 7.2h) · Score: 81 | size=11 color=#666666,#bbbbbb"
        );
        assert_eq!(
            lines[6],
            "Workouts: ▰▰▰▱▱▱▱▱▱▱ 1/3 | sfimage=figure.run sfcolor=#d9534f badge=2 more color=black,white"
        );
    }

    #[test]
    fn test_stale_entries_carry_their_date() {
        let mut d = sample();
        d.steps = Some(stats("2025-03-09", 4_000));
        d.sleep = Some(night("2025-03-08", 18_000, 0));
        let lines = goals_section(&d);
        assert!(lines[0].contains("40% (2025-03-09) |"));
        assert!(lines[4].contains("71% (2025-03-08) |"));
        assert!(lines[4].contains("badge=+120min"));
        assert!(!lines[5].contains("Score"));
    }

    #[test]
    fn test_vitals_colors() {
        let lines = vitals_section(&sample());
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("--Body Battery: 45% | sfimage=battery.100 sfcolor=#f0ad4e"));
        assert!(lines[2].contains("--Stress Level: 22 |"));
        assert!(lines[2].contains("sfcolor=green"));

        assert_eq!(vitals_section(&empty("2025-03-11")).len(), 1);
    }

    #[test]
    fn test_full_render_structure() {
        let settings = settings();
        let renderer = WidgetRenderer::new(&settings, "/opt/vitals");
        let out = renderer.render(&sample());
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines[1], "---");
        assert!(lines[2].starts_with("Health Dashboard | size=14"));
        assert!(out.contains(
            "--📈 Today's Stats | bash='/opt/vitals' param1='today' terminal=true shortcut=CMD+T color=black,white"
        ));
        assert!(out.contains(
            "--📉 Weight Trend | bash='/opt/vitals' param1='weight-trend' terminal=true color=black,white"
        ));
        assert!(out.contains("🔄 Sync Data (last: 09:41) | bash='/opt/vitals' param1='export'"));
        assert_eq!(
            lines.last().copied(),
            Some("Refresh | refresh=true sfimage=arrow.clockwise color=black,white")
        );
        assert_eq!(lines.iter().filter(|l| **l == "---").count(), 7);
    }

    #[test]
    fn test_render_error() {
        let out = render_error(&"Corrupt data file\nsleep.json");
        assert_eq!(
            out,
            "⚠️ Error | color=red\n---\nError: Corrupt data file sleep.json | color=red"
        );
    }
}
