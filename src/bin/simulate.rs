use chrono::{SecondsFormat, Utc};
use clap::Parser;
use packman_grid_engine::constants::{TICK_RATE, TICK_SEC, TILE_SIZE};
use packman_grid_engine::engine::{GameEngine, Session, SessionOptions};
use packman_grid_engine::grid::manhattan;
use packman_grid_engine::level::{builtin_levels, parse_level_pack, LevelLayout};
use packman_grid_engine::pathfinding::DistanceField;
use packman_grid_engine::types::{Direction, EntityView, ScoringMode, SessionEvent};
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::{BTreeMap, HashSet};
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long)]
    seconds: Option<u32>,
    #[arg(long)]
    level: Option<usize>,
    #[arg(long)]
    levels_file: Option<PathBuf>,
    #[arg(long)]
    scoring: Option<String>,
    #[arg(long)]
    no_autopilot: bool,
    #[arg(long)]
    run_id: Option<String>,
    #[arg(long)]
    summary_out: Option<PathBuf>,
}

#[derive(Clone, Debug, Serialize)]
struct Scenario {
    name: String,
    seed: u32,
    seconds: u32,
    level: usize,
    scoring: ScoringMode,
    autopilot: bool,
}

#[derive(Clone, Debug, Default, Serialize)]
struct EventCounts {
    #[serde(rename = "dotsEaten")]
    dots_eaten: u32,
    #[serde(rename = "powerUps")]
    power_ups: u32,
    #[serde(rename = "ghostsEaten")]
    ghosts_eaten: u32,
    #[serde(rename = "playerCaught")]
    player_caught: u32,
    #[serde(rename = "chainCashed")]
    chain_cashed: i32,
}

#[derive(Clone, Debug, Serialize)]
struct ScenarioResultLine {
    scenario: String,
    seed: u32,
    scoring: ScoringMode,
    seconds: u32,
    #[serde(rename = "startLevel")]
    start_level: usize,
    #[serde(rename = "finalLevel")]
    final_level: usize,
    #[serde(rename = "levelsCleared")]
    levels_cleared: usize,
    score: i32,
    lives: u32,
    #[serde(rename = "gameOver")]
    game_over: bool,
    #[serde(rename = "durationMs")]
    duration_ms: u64,
    #[serde(flatten)]
    counts: EventCounts,
    anomalies: Vec<String>,
}

#[derive(Clone, Debug, Serialize)]
struct AnomalyRecord {
    tick: u64,
    message: String,
}

#[derive(Clone, Debug, Serialize)]
struct ScenarioRunResult {
    #[serde(flatten)]
    result: ScenarioResultLine,
    #[serde(rename = "anomalyRecords")]
    anomaly_records: Vec<AnomalyRecord>,
    finished_tick: u64,
}

#[derive(Clone, Debug, Serialize)]
struct RunSummary {
    #[serde(rename = "runId")]
    run_id: String,
    #[serde(rename = "generatedAt")]
    generated_at: String,
    #[serde(rename = "startedAtMs")]
    started_at_ms: u64,
    #[serde(rename = "finishedAtMs")]
    finished_at_ms: u64,
    #[serde(rename = "scenarioCount")]
    scenario_count: usize,
    #[serde(rename = "anomalyCount")]
    anomaly_count: usize,
    #[serde(rename = "averageScore")]
    average_score: i32,
    #[serde(rename = "outcomeCounts")]
    outcome_counts: BTreeMap<String, usize>,
    scenarios: Vec<ScenarioResultLine>,
}

#[derive(Clone, Debug, Serialize)]
struct StructuredLogLine {
    #[serde(rename = "timestampMs")]
    timestamp_ms: u64,
    level: String,
    event: String,
    #[serde(rename = "runId")]
    run_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    scenario: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    seed: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tick: Option<u64>,
    details: Value,
}

fn main() {
    let cli = Cli::parse();
    let scenarios = resolve_scenarios(&cli);
    let run_started_at_ms = now_ms();
    let seed_hint = scenarios.first().map(|scenario| scenario.seed).unwrap_or(0);
    let log = RunLog {
        run_id: cli
            .run_id
            .clone()
            .unwrap_or_else(|| default_run_id(seed_hint, run_started_at_ms)),
    };

    let levels = match load_levels(cli.levels_file.as_deref()) {
        Ok(levels) => levels,
        Err(message) => {
            log.emit("error", "level_pack_invalid", None, None, json!({ "error": message }));
            std::process::exit(2);
        }
    };

    let mut has_anomaly = false;
    let mut scenario_results = Vec::new();
    let mut outcome_counts: BTreeMap<String, usize> = BTreeMap::new();
    let mut total_anomalies = 0usize;

    for scenario in scenarios {
        log.emit(
            "info",
            "scenario_started",
            Some(&scenario),
            None,
            json!({
                "seconds": scenario.seconds,
                "level": scenario.level,
                "scoring": scenario.scoring,
                "autopilot": scenario.autopilot,
            }),
        );
        let scenario_run = match run_scenario(&scenario, &levels) {
            Ok(run) => run,
            Err(message) => {
                log.emit(
                    "error",
                    "scenario_rejected",
                    Some(&scenario),
                    None,
                    json!({ "error": message }),
                );
                std::process::exit(2);
            }
        };

        for anomaly in &scenario_run.anomaly_records {
            log.emit(
                "warn",
                "anomaly_detected",
                Some(&scenario),
                Some(anomaly.tick),
                json!({ "message": anomaly.message }),
            );
        }

        has_anomaly |= !scenario_run.result.anomalies.is_empty();
        total_anomalies += scenario_run.anomaly_records.len();
        *outcome_counts
            .entry(outcome_key(&scenario_run.result).to_string())
            .or_insert(0) += 1;

        log.emit(
            "info",
            "scenario_finished",
            Some(&scenario),
            Some(scenario_run.finished_tick),
            json!({
                "score": scenario_run.result.score,
                "levelsCleared": scenario_run.result.levels_cleared,
                "durationMs": scenario_run.result.duration_ms,
                "anomalyCount": scenario_run.anomaly_records.len(),
            }),
        );

        println!(
            "{}",
            serde_json::to_string(&scenario_run.result).expect("scenario result should serialize")
        );
        scenario_results.push(scenario_run.result);
    }

    let summary = build_run_summary(
        log.run_id.clone(),
        run_started_at_ms,
        now_ms(),
        scenario_results,
        outcome_counts,
        total_anomalies,
    );

    let summary_out = cli.summary_out.as_ref().map(|path| path.to_string_lossy().to_string());
    if let Some(path) = cli.summary_out.as_ref() {
        if let Err(error) = summary.write_to(path) {
            log.emit(
                "error",
                "summary_write_failed",
                None,
                None,
                json!({ "path": summary_out, "error": error.to_string() }),
            );
            std::process::exit(2);
        }
    }

    log.emit(
        "info",
        "run_finished",
        None,
        None,
        json!({
            "scenarioCount": summary.scenario_count,
            "anomalyCount": summary.anomaly_count,
            "averageScore": summary.average_score,
            "outcomeCounts": summary.outcome_counts,
            "summaryOut": summary_out,
        }),
    );

    if has_anomaly {
        std::process::exit(1);
    }
}

fn load_levels(path: Option<&Path>) -> Result<Vec<LevelLayout>, String> {
    let Some(path) = path else {
        return Ok(builtin_levels());
    };
    let text = std::fs::read_to_string(path)
        .map_err(|error| format!("{}: {error}", path.to_string_lossy()))?;
    parse_level_pack(&text).map_err(|error| format!("{}: {error}", path.to_string_lossy()))
}

fn run_scenario(scenario: &Scenario, levels: &[LevelLayout]) -> Result<ScenarioRunResult, String> {
    let options = SessionOptions {
        seed: scenario.seed,
        scoring: scenario.scoring,
        ..SessionOptions::default()
    };
    let mut engine = GameEngine::new(levels.to_vec(), scenario.level, options)
        .map_err(|error| error.to_string())?;

    let mut counts = EventCounts::default();
    let mut anomalies = AnomalyLog::default();
    let mut last_tick = 0u64;
    let total_ticks = u64::from(scenario.seconds) * u64::from(TICK_RATE);

    for _ in 0..total_ticks {
        if engine.is_over() {
            break;
        }
        if scenario.autopilot {
            let session = engine.session();
            if let Some(dir) = autopilot_direction(session) {
                engine.set_player_direction(dir);
            }
        }
        engine.step(TICK_SEC);
        let snapshot = engine.build_snapshot(true);
        last_tick = snapshot.tick;
        anomalies.check_session(snapshot.tick, engine.session());
        for event in &snapshot.events {
            tally_event(&mut counts, event);
        }
    }

    let summary = engine.build_summary();
    Ok(ScenarioRunResult {
        result: ScenarioResultLine {
            scenario: scenario.name.clone(),
            seed: scenario.seed,
            scoring: scenario.scoring,
            seconds: scenario.seconds,
            start_level: scenario.level,
            final_level: summary.final_level,
            levels_cleared: summary.levels_cleared,
            score: summary.score,
            lives: summary.lives,
            game_over: summary.game_over,
            duration_ms: summary.duration_ms,
            counts,
            anomalies: anomalies.messages,
        },
        anomaly_records: anomalies.records,
        finished_tick: last_tick,
    })
}

fn tally_event(counts: &mut EventCounts, event: &SessionEvent) {
    match event {
        SessionEvent::DotEaten { .. } => counts.dots_eaten += 1,
        SessionEvent::PowerUpEaten { .. } => counts.power_ups += 1,
        SessionEvent::GhostEaten { .. } => counts.ghosts_eaten += 1,
        SessionEvent::PlayerCaught { .. } => counts.player_caught += 1,
        SessionEvent::ChainCashed { amount } => counts.chain_cashed += amount,
        _ => {}
    }
}

/// Steers toward the nearest remaining dot from the tile where the next turn
/// can be taken, using the same distance field the ghosts chase with.
fn autopilot_direction(session: &Session) -> Option<Direction> {
    let here = session.player().upcoming_tile();
    let board = session.board();
    let target = board
        .dot_tiles()
        .min_by_key(|tile| (manhattan(here, *tile), *tile))?;
    DistanceField::build(board, here, target).choose_direction(here)
}

fn collect_session_anomalies(session: &Session) -> Vec<String> {
    let mut anomalies = Vec::new();
    let board = session.board();
    let snapshot = session.snapshot();

    if let Some(message) = out_of_extent("player", &snapshot.player, board.width(), board.height())
    {
        anomalies.push(message);
    }
    for ghost in &snapshot.ghosts {
        let label = format!("ghost {}", ghost.id);
        if let Some(message) = out_of_extent(&label, &ghost.body, board.width(), board.height()) {
            anomalies.push(message);
        }
    }

    let counted = board.dot_tiles().count();
    if counted != snapshot.remaining_dots {
        anomalies.push(format!(
            "dot counter mismatch: counter {} board {counted}",
            snapshot.remaining_dots
        ));
    }
    if snapshot.score < 0 {
        anomalies.push(format!("negative score: {}", snapshot.score));
    }
    anomalies
}

fn out_of_extent(label: &str, view: &EntityView, width: i32, height: i32) -> Option<String> {
    let max_x = (width * TILE_SIZE) as f32;
    let max_y = (height * TILE_SIZE) as f32;
    let inside = view.x.is_finite()
        && view.y.is_finite()
        && (0.0..max_x).contains(&view.x)
        && (0.0..max_y).contains(&view.y);
    (!inside).then(|| format!("{label} outside level: ({}, {})", view.x, view.y))
}

fn resolve_scenarios(cli: &Cli) -> Vec<Scenario> {
    let seed = normalize_seed(cli.seed.unwrap_or_else(|| u64::from(rand::random::<u32>())));
    let seconds = cli.seconds.unwrap_or(120).clamp(1, 3_600);
    let level = cli.level.unwrap_or(0);
    let autopilot = !cli.no_autopilot;

    if let Some(scoring) = cli.scoring.as_deref().and_then(ScoringMode::parse) {
        return vec![Scenario {
            name: format!("custom-{}", scoring_key(scoring)),
            seed,
            seconds,
            level,
            scoring,
            autopilot,
        }];
    }

    vec![
        Scenario {
            name: "classic-check".to_string(),
            seed,
            seconds,
            level,
            scoring: ScoringMode::Classic,
            autopilot,
        },
        Scenario {
            name: "chain-check".to_string(),
            seed: normalize_seed(u64::from(seed) + 1),
            seconds,
            level,
            scoring: ScoringMode::Chain,
            autopilot,
        },
    ]
}

fn normalize_seed(seed: u64) -> u32 {
    seed as u32
}

fn scoring_key(scoring: ScoringMode) -> &'static str {
    match scoring {
        ScoringMode::Classic => "classic",
        ScoringMode::Chain => "chain",
    }
}

fn outcome_key(result: &ScenarioResultLine) -> &'static str {
    if result.game_over {
        "game_over"
    } else if result.levels_cleared > 0 {
        "cleared"
    } else {
        "timeout"
    }
}

/// Every anomaly observed during a scenario, plus the distinct messages that
/// go into the result line.
#[derive(Debug, Default)]
struct AnomalyLog {
    messages: Vec<String>,
    records: Vec<AnomalyRecord>,
    seen: HashSet<String>,
}

impl AnomalyLog {
    fn record(&mut self, tick: u64, message: String) {
        if self.seen.insert(message.clone()) {
            self.messages.push(message.clone());
        }
        self.records.push(AnomalyRecord { tick, message });
    }

    fn check_session(&mut self, tick: u64, session: &Session) {
        for message in collect_session_anomalies(session) {
            self.record(tick, message);
        }
    }
}

fn default_run_id(seed: u32, timestamp_ms: u64) -> String {
    format!("sim-{seed}-{timestamp_ms}")
}

fn build_run_summary(
    run_id: String,
    started_at_ms: u64,
    finished_at_ms: u64,
    scenarios: Vec<ScenarioResultLine>,
    outcome_counts: BTreeMap<String, usize>,
    anomaly_count: usize,
) -> RunSummary {
    let scenario_count = scenarios.len();
    let average_score = if scenario_count == 0 {
        0
    } else {
        let total: i64 = scenarios.iter().map(|s| i64::from(s.score)).sum();
        (total / scenario_count as i64) as i32
    };
    RunSummary {
        run_id,
        generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        started_at_ms,
        finished_at_ms,
        scenario_count,
        anomaly_count,
        average_score,
        outcome_counts,
        scenarios,
    }
}

/// JSON log lines on stderr, tagged with the run id.
struct RunLog {
    run_id: String,
}

impl RunLog {
    fn emit(
        &self,
        level: &str,
        event: &str,
        scenario: Option<&Scenario>,
        tick: Option<u64>,
        details: Value,
    ) {
        let line = StructuredLogLine {
            timestamp_ms: now_ms(),
            level: level.to_string(),
            event: event.to_string(),
            run_id: self.run_id.clone(),
            scenario: scenario.map(|scenario| scenario.name.clone()),
            seed: scenario.map(|scenario| scenario.seed),
            tick,
            details,
        };
        eprintln!(
            "{}",
            serde_json::to_string(&line).expect("structured log should serialize")
        );
    }
}

impl RunSummary {
    fn write_to(&self, path: &Path) -> io::Result<()> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(BufWriter::new(file), self).map_err(io::Error::from)
    }
}

fn now_ms() -> u64 {
    Utc::now().timestamp_millis().max(0) as u64
}
