//! Long-form terminal reports: goal progress, sleep analysis, weekly and
//! seasonal patterns, weight trend.
//!
//! Each renderer returns the whole report as one string so commands can print
//! it in one go and tests can compare it line by line.

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use vitals_core::analysis::{
    stress_label, PatternReport, SleepReport, WeightTrendReport, MONTH_LABELS, RECENT_WEIGH_INS,
    WEEKDAY_LABELS,
};
use vitals_core::metric::ACTIVITIES_FILE;
use vitals_core::{HealthStore, Metric, SleepRecord, WeightRecord};

use crate::constants::GOAL_BAR_WIDTH;
use crate::ui::format::{format_goal, format_number, signed};
use crate::ui::theme::{symbols, trend_arrow};
use crate::ui::{banner, bar, divider, footer_rule, section, solid, UiContext};

const CHART_HEIGHT: usize = 8;
const GOAL_REACHED: &str = "\u{1F3AF} GOAL REACHED!";

/// One goal's block in the progress report.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GoalBlock<T> {
    /// The goal is zero or unset.
    Disabled,
    /// The backing file has not been exported yet.
    NoData,
    Tracked(T),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightGoal {
    pub date: NaiveDate,
    pub current_kg: f64,
    pub target_kg: f64,
    /// Change against the eighth most recent weigh-in.
    pub week_change_kg: Option<f64>,
}

impl WeightGoal {
    pub fn remaining_kg(&self) -> f64 {
        self.current_kg - self.target_kg
    }

    /// Closeness to the target as 0..=100.
    pub fn pct(&self) -> f64 {
        (100.0 - self.remaining_kg().abs() / self.target_kg * 100.0).clamp(0.0, 100.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepsGoal {
    pub current: u32,
    pub target: u32,
    pub week_avg: Option<u32>,
}

impl StepsGoal {
    pub fn pct(&self) -> f64 {
        (f64::from(self.current) / f64::from(self.target) * 100.0).min(100.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SleepGoal {
    pub hours: f64,
    pub target_hours: f64,
    pub week_avg_hours: f64,
}

impl SleepGoal {
    pub fn pct(&self) -> f64 {
        (self.hours / self.target_hours * 100.0).min(100.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkoutsGoal {
    pub count: u32,
    pub target: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalProgress {
    pub weight: GoalBlock<WeightGoal>,
    pub steps: GoalBlock<StepsGoal>,
    pub sleep: GoalBlock<SleepGoal>,
    pub workouts: GoalBlock<WorkoutsGoal>,
}

impl GoalProgress {
    pub fn collect(store: &HealthStore) -> vitals_core::Result<Self> {
        let goals = store.goals()?.clone();
        let today = store.today();
        let week_ago = today - Duration::days(7);

        let weight = if goals.weight_kg <= 0.0 {
            GoalBlock::Disabled
        } else if !store.path_for(Metric::Weight).exists() {
            GoalBlock::NoData
        } else {
            let weigh_ins: Vec<&WeightRecord> =
                store.weight()?.iter().filter(|w| w.has_data()).collect();
            match weigh_ins.last() {
                Some(latest) => GoalBlock::Tracked(WeightGoal {
                    date: latest.date,
                    current_kg: latest.weight_kg,
                    target_kg: goals.weight_kg,
                    week_change_kg: (weigh_ins.len() >= 2).then(|| {
                        latest.weight_kg - weigh_ins[weigh_ins.len().saturating_sub(8)].weight_kg
                    }),
                }),
                None => GoalBlock::NoData,
            }
        };

        let steps = if goals.daily_steps == 0 {
            GoalBlock::Disabled
        } else if !store.path_for(Metric::Activity).exists() {
            GoalBlock::NoData
        } else {
            let week_avg = store.avg_steps(7)?;
            GoalBlock::Tracked(StepsGoal {
                current: store.today_stats()?.map_or(0, |s| s.total_steps),
                target: goals.daily_steps,
                week_avg: (week_avg > 0).then_some(week_avg),
            })
        };

        let sleep = if goals.sleep_hours <= 0.0 {
            GoalBlock::Disabled
        } else if !store.path_for(Metric::Sleep).exists() {
            GoalBlock::NoData
        } else {
            let nights = store.sleep()?;
            match nights.last() {
                Some(latest) => {
                    let week = &nights[nights.len().saturating_sub(7)..];
                    let total: f64 = week.iter().map(SleepRecord::duration_hours).sum();
                    GoalBlock::Tracked(SleepGoal {
                        hours: latest.duration_hours(),
                        target_hours: goals.sleep_hours,
                        week_avg_hours: total / week.len() as f64,
                    })
                }
                None => GoalBlock::NoData,
            }
        };

        let workouts = if goals.workouts_per_week == 0 {
            GoalBlock::Disabled
        } else if !store.data_dir().join(ACTIVITIES_FILE).exists() {
            GoalBlock::NoData
        } else {
            GoalBlock::Tracked(WorkoutsGoal {
                count: store.workouts_since(week_ago)? as u32,
                target: goals.workouts_per_week,
            })
        };

        Ok(Self {
            weight,
            steps,
            sleep,
            workouts,
        })
    }

    /// Replace today's step count, for callers that fetched it live.
    pub fn set_today_steps(&mut self, steps: u32) {
        if let GoalBlock::Tracked(goal) = &mut self.steps {
            goal.current = steps;
        }
    }

    /// Whether the file had no entry for today.
    pub fn steps_missing_today(&self, store: &HealthStore) -> vitals_core::Result<bool> {
        Ok(matches!(self.steps, GoalBlock::Tracked(_)) && store.today_stats()?.is_none())
    }
}

fn no_data(heading: &str) -> String {
    format!("{}: No data (run `vitals export` first)", heading)
}

pub fn render_goals(ctx: &UiContext, progress: &GoalProgress) -> String {
    let arrow = symbols::ARROW.get(ctx.unicode);
    let mut lines = vec![banner(ctx, "HEALTH GOAL PROGRESS"), String::new()];

    match &progress.weight {
        GoalBlock::Tracked(w) => {
            let diff = w.remaining_kg();
            let status = if diff <= 0.0 {
                GOAL_REACHED.to_string()
            } else if diff < 5.0 {
                format!("Almost! {} {:.1} kg", symbols::DOWN.get(ctx.unicode), diff)
            } else {
                format!("{} {:.1} kg to go", symbols::DOWN.get(ctx.unicode), diff)
            };
            lines.push(format!("\u{2696}\u{FE0F}  WEIGHT ({})", w.date));
            lines.push(format!(
                "   Current: {:.1} kg  {}  Target: {} kg",
                w.current_kg,
                arrow,
                format_goal(w.target_kg)
            ));
            lines.push(format!("   [{}] {}", bar(ctx, w.pct(), GOAL_BAR_WIDTH), status));
            if let Some(change) = w.week_change_kg {
                lines.push(format!(
                    "   7-day trend: {} {:.1} kg",
                    trend_arrow(change, ctx.unicode),
                    change.abs()
                ));
            }
            lines.push(String::new());
        }
        GoalBlock::NoData => {
            lines.push(no_data("\u{2696}\u{FE0F}  WEIGHT"));
            lines.push(String::new());
        }
        GoalBlock::Disabled => {}
    }

    match &progress.steps {
        GoalBlock::Tracked(s) => {
            let pct = s.pct();
            let remaining = i64::from(s.target) - i64::from(s.current);
            let status = if pct >= 100.0 {
                GOAL_REACHED.to_string()
            } else if pct >= 75.0 {
                format!("Almost! {} more", format_number(remaining))
            } else {
                format!("{} steps to go", format_number(remaining))
            };
            lines.push("\u{1F45F} STEPS (Today)".to_string());
            lines.push(format!(
                "   Current: {}  {}  Target: {}",
                format_number(i64::from(s.current)),
                arrow,
                format_number(i64::from(s.target))
            ));
            lines.push(format!(
                "   [{}] {:.0}% {}",
                bar(ctx, pct, GOAL_BAR_WIDTH),
                pct,
                status
            ));
            if let Some(avg) = s.week_avg {
                lines.push(format!(
                    "   7-day avg: {} ({:.0}% of goal)",
                    format_number(i64::from(avg)),
                    f64::from(avg) / f64::from(s.target) * 100.0
                ));
            }
            lines.push(String::new());
        }
        GoalBlock::NoData => {
            lines.push(no_data("\u{1F45F} STEPS"));
            lines.push(String::new());
        }
        GoalBlock::Disabled => {}
    }

    match &progress.sleep {
        GoalBlock::Tracked(s) => {
            let pct = s.pct();
            let minutes = (s.target_hours - s.hours) * 60.0;
            let status = if pct >= 100.0 {
                GOAL_REACHED.to_string()
            } else if pct >= 85.0 {
                format!("Almost! +{:.0} min", minutes)
            } else {
                format!("+{:.0} min needed", minutes)
            };
            lines.push("\u{1F634} SLEEP (Last Night)".to_string());
            lines.push(format!(
                "   Duration: {:.1}h  {}  Target: {}h",
                s.hours,
                arrow,
                format_goal(s.target_hours)
            ));
            lines.push(format!(
                "   [{}] {:.0}% {}",
                bar(ctx, pct, GOAL_BAR_WIDTH),
                pct,
                status
            ));
            lines.push(format!(
                "   7-day avg: {:.1}h ({:.0}% of goal)",
                s.week_avg_hours,
                s.week_avg_hours / s.target_hours * 100.0
            ));
            lines.push(String::new());
        }
        GoalBlock::NoData => {
            lines.push(no_data("\u{1F634} SLEEP"));
            lines.push(String::new());
        }
        GoalBlock::Disabled => {}
    }

    match &progress.workouts {
        GoalBlock::Tracked(w) => {
            let pct = (f64::from(w.count) / f64::from(w.target) * 100.0).min(100.0);
            let status = if w.count >= w.target {
                GOAL_REACHED.to_string()
            } else {
                format!("{} more workout(s) needed", w.target - w.count)
            };
            lines.push("\u{1F3C3} WORKOUTS (This Week)".to_string());
            lines.push(format!(
                "   Count: {}  {}  Target: {}/week",
                w.count, arrow, w.target
            ));
            lines.push(format!("   [{}] {}", bar(ctx, pct, GOAL_BAR_WIDTH), status));
            lines.push(String::new());
        }
        GoalBlock::NoData => {
            lines.push(no_data("\u{1F3C3} WORKOUTS"));
            lines.push(String::new());
        }
        GoalBlock::Disabled => {}
    }

    lines.push(divider(ctx));
    lines.join("\n")
}

pub fn render_sleep_report(ctx: &UiContext, report: &SleepReport) -> String {
    let mut lines = vec![banner(ctx, "SLEEP ANALYSIS REPORT"), String::new()];

    let Some(overview) = &report.overview else {
        lines.push("No sleep records found.".to_string());
        return lines.join("\n");
    };

    lines.push(section(
        ctx,
        &format!("\u{1F4CA} OVERVIEW ({} nights analyzed)", overview.nights),
    ));
    if let (Some(avg), Some(min), Some(max)) =
        (overview.avg_hours, overview.min_hours, overview.max_hours)
    {
        lines.push(format!(
            "   Duration:  avg {:.1}h  (range: {:.1}h - {:.1}h)",
            avg, min, max
        ));
    }
    if let Some(score) = overview.avg_score {
        lines.push(format!("   Sleep Score: avg {:.0}/100", score));
    }
    if let Some(deep) = overview.avg_deep_pct {
        lines.push(format!("   Deep Sleep: avg {:.1}%", deep));
    }
    if let Some(rem) = overview.avg_rem_pct {
        lines.push(format!("   REM Sleep: avg {:.1}%", rem));
    }

    lines.push(String::new());
    lines.push(section(ctx, "\u{1F4C5} WEEKLY PATTERNS"));
    for (label, avg) in WEEKDAY_LABELS.iter().zip(report.weekdays.iter()) {
        if let Some(avg) = avg {
            let len = ((avg * 2.0) as usize).min(20);
            lines.push(format!("   {}: {} {:.1}h", label, solid(ctx, len), avg));
        }
    }

    lines.push(String::new());
    lines.push(section(ctx, "\u{1F4C8} RECENT TRENDS (Last 30 days)"));
    if let Some(recent) = &report.recent {
        lines.push(format!("   Last 7 days avg: {:.1}h", recent.last_week_hours));
        if let Some(change) = recent.change_hours() {
            lines.push(format!(
                "   vs previous week: {} {:.1}h ({} min)",
                trend_arrow(change, ctx.unicode),
                change.abs(),
                signed(change * 60.0, 0)
            ));
        }
    }

    if let Some(correlation) = &report.correlation {
        lines.push(String::new());
        lines.push(section(ctx, "\u{1F517} ACTIVITY-SLEEP CORRELATION"));
        lines.push(format!(
            "   After 10k+ steps: avg {:.1}h sleep ({} nights)",
            correlation.high_activity_hours, correlation.high_activity_nights
        ));
        lines.push(format!(
            "   After <5k steps:  avg {:.1}h sleep ({} nights)",
            correlation.low_activity_hours, correlation.low_activity_nights
        ));
        lines.push(format!(
            "   Difference: {} min",
            signed(correlation.difference_minutes(), 0)
        ));
    }

    lines.push(String::new());
    lines.push(footer_rule(ctx));
    lines.join("\n")
}

pub fn render_patterns(ctx: &UiContext, report: &PatternReport) -> String {
    let mut lines = vec![
        banner(ctx, "WEEKLY & SEASONAL PATTERNS"),
        String::new(),
        section(ctx, "\u{1F4C5} DAY-OF-WEEK PATTERNS"),
        String::new(),
        "   Steps by day:".to_string(),
    ];

    let max_steps = nonzero(report.max_weekday_steps());
    for (label, avg) in WEEKDAY_LABELS.iter().zip(report.weekday_steps.iter()) {
        if let Some(avg) = avg {
            let len = (avg / max_steps * 15.0) as usize;
            lines.push(format!(
                "   {}: {} {}",
                label,
                solid(ctx, len),
                format_number(avg.round() as i64)
            ));
        }
    }

    lines.push(String::new());
    lines.push("   Stress by day:".to_string());
    for (label, avg) in WEEKDAY_LABELS.iter().zip(report.weekday_stress.iter()) {
        if let Some(avg) = avg {
            let len = (avg / 100.0 * 15.0) as usize;
            lines.push(format!(
                "   {}: {} {:.0} ({})",
                label,
                solid(ctx, len),
                avg,
                stress_label(*avg)
            ));
        }
    }

    lines.push(String::new());
    lines.push(section(
        ctx,
        &format!("\u{1F4C6} MONTHLY PATTERNS ({})", report.year),
    ));
    lines.push(String::new());
    lines.push("   Avg steps by month:".to_string());
    let max_monthly = nonzero(report.max_monthly_steps());
    for (label, avg) in MONTH_LABELS.iter().zip(report.monthly_steps.iter()) {
        if let Some(avg) = avg {
            let len = (avg / max_monthly * 12.0) as usize;
            lines.push(format!(
                "   {}: {} {}",
                label,
                solid(ctx, len),
                format_number(avg.round() as i64)
            ));
        }
    }

    lines.push(String::new());
    lines.push(section(ctx, "\u{1F3C6} BEST & WORST DAYS"));
    if let (Some(best), Some(worst)) = (&report.best_day, &report.worst_day) {
        lines.push(format!(
            "   Best day:  {} - {} steps",
            best.date,
            format_number(i64::from(best.steps))
        ));
        lines.push(format!(
            "   Worst day: {} - {} steps",
            worst.date,
            format_number(i64::from(worst.steps))
        ));
    }

    lines.push(String::new());
    lines.push(footer_rule(ctx));
    lines.join("\n")
}

fn nonzero(value: f64) -> f64 {
    if value > 0.0 {
        value
    } else {
        1.0
    }
}

/// `goal_kg` of `None` or zero omits the goal line.
pub fn render_weight_trend(
    ctx: &UiContext,
    report: &WeightTrendReport,
    goal_kg: Option<f64>,
) -> String {
    let mut lines = vec![
        banner(ctx, "WEIGHT TREND VISUALIZATION"),
        String::new(),
        section(
            ctx,
            &format!("\u{1F4CA} OVERVIEW ({} measurements)", report.measurements),
        ),
        format!("   First: {:.1} kg ({})", report.first.kg, report.first.date),
        format!("   Now:   {:.1} kg ({})", report.current.kg, report.current.date),
        format!("   Change: {} kg", signed(report.change_kg(), 1)),
        format!("   Range:  {:.1} - {:.1} kg", report.min_kg, report.max_kg),
        String::new(),
        section(
            ctx,
            &format!("\u{1F4C8} RECENT TREND (last {} weigh-ins)", RECENT_WEIGH_INS),
        ),
    ];
    lines.extend(weight_chart(ctx, report));

    if let Some(goal) = goal_kg.filter(|g| *g > 0.0) {
        lines.push(String::new());
        lines.push(format!(
            "\u{1F3AF} GOAL: {} kg ({} kg to go)",
            format_goal(goal),
            signed(report.current.kg - goal, 1)
        ));
    }

    lines.push(String::new());
    lines.push(footer_rule(ctx));
    lines.join("\n")
}

/// Column chart of the recent weigh-ins with a labelled y-axis.
fn weight_chart(ctx: &UiContext, report: &WeightTrendReport) -> Vec<String> {
    let levels = report.levels(CHART_HEIGHT);
    let width = levels.len();
    let top = format!("{:.0}", report.recent_max());
    let bottom = format!("{:.0}", report.recent_min());
    let label_width = top.chars().count().max(bottom.chars().count());
    let axis = symbols::AXIS.get(ctx.unicode);
    let cell = symbols::BAR_FULL.get(ctx.unicode);

    let mut lines = Vec::with_capacity(CHART_HEIGHT + 3);
    for row in (0..=CHART_HEIGHT).rev() {
        let label = if row == CHART_HEIGHT {
            top.as_str()
        } else if row == 0 {
            bottom.as_str()
        } else {
            ""
        };
        let columns: String = levels
            .iter()
            .map(|level| if *level >= row as f64 { cell } else { " " })
            .collect();
        lines.push(format!(
            "   {:>width$}{}{}",
            label,
            axis,
            columns,
            width = label_width
        ));
    }

    lines.push(format!(
        "   {}{}{}",
        " ".repeat(label_width),
        symbols::AXIS_CORNER.get(ctx.unicode),
        symbols::RULE.get(ctx.unicode).repeat(width)
    ));

    if let (Some(first), Some(last)) = (report.recent.first(), report.recent.last()) {
        lines.push(format!(
            "   {}{}{}{}",
            " ".repeat(label_width + 1),
            first.date.format("%m-%d"),
            " ".repeat(width.saturating_sub(10)),
            last.date.format("%m-%d")
        ));
    }

    lines
}
