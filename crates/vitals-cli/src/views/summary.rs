//! End-of-day summary: notification text and the markdown log entry.

use chrono::NaiveDate;

use vitals_core::{
    ActivityRecord, BodyBatteryRecord, Goals, HealthStore, SleepRecord, WeightRecord,
};

use crate::ui::format::{format_goal, format_number};

pub const NOTIFICATION_TITLE: &str = "Daily Health Summary";

/// Written once, when the log file is created.
pub const LOG_HEADER: &str = "# Daily Health Summaries\n\
\n\
Automatically logged by vitals at midnight.\n\
\n\
---\n";

/// The numbers a day's summary is built from.
#[derive(Debug, Clone, PartialEq)]
pub struct DaySummary {
    pub date: NaiveDate,
    pub goals: Goals,
    pub steps: u32,
    pub sleep_hours: f64,
    pub sleep_score: u32,
    /// Zero when there is no weigh-in.
    pub weight_kg: f64,
    pub weight_trend: f64,
    pub body_battery: u32,
}

impl DaySummary {
    pub fn collect(store: &HealthStore) -> vitals_core::Result<Self> {
        let goals = store.goals()?.clone();
        let sleep = store.latest::<SleepRecord>()?;
        Ok(Self {
            date: store.today(),
            steps: store
                .latest::<ActivityRecord>()?
                .map_or(0, |s| s.total_steps),
            sleep_hours: sleep.map_or(0.0, |s| s.duration_hours()),
            sleep_score: sleep.map_or(0, |s| s.score),
            weight_kg: store
                .latest::<WeightRecord>()?
                .map_or(0.0, |w| w.weight_kg),
            weight_trend: store.weight_trend(7)?,
            body_battery: store
                .latest::<BodyBatteryRecord>()?
                .map_or(0, |b| b.charged),
            goals,
        })
    }

    pub fn steps_met(&self) -> bool {
        self.steps >= self.goals.daily_steps
    }

    pub fn sleep_met(&self) -> bool {
        self.sleep_hours >= self.goals.sleep_hours
    }

    fn steps_pct(&self) -> u32 {
        self.goals.steps_pct(self.steps) as u32
    }

    fn sleep_pct(&self) -> u32 {
        self.goals.sleep_pct(self.sleep_hours) as u32
    }

    /// Notification body: one part per metric, joined by `" | "`.
    pub fn message(&self) -> String {
        let mut parts = Vec::new();

        if self.steps_met() {
            parts.push(format!(
                "\u{1F45F} {} steps \u{2713} ({}%)",
                format_number(i64::from(self.steps)),
                self.steps_pct()
            ));
        } else {
            let short = i64::from(self.goals.daily_steps) - i64::from(self.steps);
            parts.push(format!(
                "\u{1F45F} {}/{} steps ({} short)",
                format_number(i64::from(self.steps)),
                format_number(i64::from(self.goals.daily_steps)),
                format_number(short)
            ));
        }

        if self.weight_kg > 0.0 {
            parts.push(format!(
                "\u{2696}\u{FE0F} {:.1}kg ({}{:.1} this week)",
                self.weight_kg,
                trend_arrow(self.weight_trend),
                self.weight_trend.abs()
            ));
        }

        if self.sleep_hours > 0.0 {
            let met = if self.sleep_met() { "\u{2713}" } else { "" };
            let score = if self.sleep_score > 0 {
                format!(" (score: {})", self.sleep_score)
            } else {
                String::new()
            };
            parts.push(format!(
                "\u{1F634} {:.1}h{}{}",
                self.sleep_hours, met, score
            ));
        }

        if self.body_battery > 0 {
            parts.push(format!("\u{1F50B} Body Battery: {}%", self.body_battery));
        }

        parts.join(" | ")
    }

    /// Notification subtitle from the number of step and sleep goals met.
    pub fn status(&self) -> &'static str {
        match u8::from(self.steps_met()) + u8::from(self.sleep_met()) {
            2 => "Great day! All goals met \u{1F389}",
            1 => "Good effort today",
            _ => "Tomorrow is a new day",
        }
    }

    /// The `## YYYY-MM-DD` block appended to the log.
    pub fn markdown_entry(&self) -> String {
        let mut lines = vec![
            format!("## {}", self.date),
            String::new(),
            "| Metric | Value | Goal | Status |".to_string(),
            "|--------|-------|------|--------|".to_string(),
        ];

        let steps_status = if self.steps_met() {
            "\u{2713}".to_string()
        } else {
            format!("{}%", self.steps_pct())
        };
        lines.push(format!(
            "| Steps | {} | {} | {} |",
            format_number(i64::from(self.steps)),
            format_number(i64::from(self.goals.daily_steps)),
            steps_status
        ));

        let sleep_status = if self.sleep_met() {
            "\u{2713}".to_string()
        } else {
            format!("{}%", self.sleep_pct())
        };
        lines.push(format!(
            "| Sleep | {:.1}h | {}h | {} |",
            self.sleep_hours,
            format_goal(self.goals.sleep_hours),
            sleep_status
        ));

        if self.weight_kg > 0.0 {
            let diff = self.weight_kg - self.goals.weight_kg;
            let status = if diff <= 0.0 {
                "\u{2713}".to_string()
            } else {
                format!("\u{2193}{:.1}kg", diff)
            };
            lines.push(format!(
                "| Weight | {:.1}kg | {}kg | {} |",
                self.weight_kg,
                format_goal(self.goals.weight_kg),
                status
            ));
        }

        if self.body_battery > 0 {
            lines.push(format!("| Body Battery | {}% | - | - |", self.body_battery));
        }

        lines.push(String::new());
        lines.push(format!("**Status:** {}", self.status()));
        lines.push(String::new());
        lines.push("---".to_string());
        lines.push(String::new());
        lines.join("\n")
    }
}

fn trend_arrow(change: f64) -> &'static str {
    if change < 0.0 {
        "\u{2193}"
    } else if change > 0.0 {
        "\u{2191}"
    } else {
        "\u{2192}"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary() -> DaySummary {
        DaySummary {
            date: NaiveDate::from_ymd_opt(2025, 3, 11).unwrap(),
            goals: Goals {
                weight_kg: 75.0,
                daily_steps: 10_000,
                sleep_hours: 7.0,
                workouts_per_week: 3,
            },
            steps: 10_500,
            sleep_hours: 7.5,
            sleep_score: 81,
            weight_kg: 78.4,
            weight_trend: -0.6,
            body_battery: 62,
        }
    }

    #[test]
    fn test_message_all_parts() {
        assert_eq!(
            summary().message(),
            "👟 10,500 steps ✓ (105%) | ⚖️ 78.4kg (↓0.6 this week) | 😴 7.5h✓ (score: 81) | 🔋 Body Battery: 62%"
        );
    }

    #[test]
    fn test_message_short_day() {
        let s = DaySummary {
            steps: 8_000,
            sleep_hours: 0.0,
            sleep_score: 0,
            weight_kg: 0.0,
            body_battery: 0,
            ..summary()
        };
        assert_eq!(s.message(), "👟 8,000/10,000 steps (2,000 short)");
    }

    #[test]
    fn test_flat_weight_uses_right_arrow() {
        let s = DaySummary {
            weight_trend: 0.0,
            ..summary()
        };
        assert!(s.message().contains("(→0.0 this week)"));
    }

    #[test]
    fn test_status_counts_goals() {
        assert_eq!(summary().status(), "Great day! All goals met 🎉");
        let one = DaySummary {
            sleep_hours: 6.0,
            ..summary()
        };
        assert_eq!(one.status(), "Good effort today");
        let none = DaySummary {
            steps: 100,
            ..one
        };
        assert_eq!(none.status(), "Tomorrow is a new day");
    }

    #[test]
    fn test_markdown_entry() {
        let s = DaySummary {
            sleep_hours: 6.3,
            ..summary()
        };
        let expected = "## 2025-03-11\n\
\n\
| Metric | Value | Goal | Status |\n\
|--------|-------|------|--------|\n\
| Steps | 10,500 | 10,000 | ✓ |\n\
| Sleep | 6.3h | 7.0h | 90% |\n\
| Weight | 78.4kg | 75.0kg | ↓3.4kg |\n\
| Body Battery | 62% | - | - |\n\
\n\
**Status:** Good effort today\n\
\n\
---\n";
        assert_eq!(s.markdown_entry(), expected);
    }

    #[test]
    fn test_markdown_entry_skips_empty_rows() {
        let s = DaySummary {
            weight_kg: 0.0,
            body_battery: 0,
            ..summary()
        };
        let entry = s.markdown_entry();
        assert!(!entry.contains("| Weight |"));
        assert!(!entry.contains("| Body Battery |"));
    }

    #[test]
    fn test_zero_step_goal_counts_as_complete() {
        let s = DaySummary {
            goals: Goals {
                daily_steps: 0,
                ..summary().goals
            },
            steps: 0,
            ..summary()
        };
        assert!(s.message().starts_with("👟 0 steps ✓ (100%)"));
        assert!(s.markdown_entry().contains("| Steps | 0 | 0 | ✓ |"));
    }
}
