//! shift: headless run of the shopwatch game core.
//!
//! Plays every day of a session against a small synthetic shop with a
//! scripted operator at the monitors.  The operator apprehends a customer
//! the moment its third warning shows and waves through anyone else whose
//! warning is on screen.  Failed days are replayed.
//!
//! ```text
//! shift [CONFIG.toml] [OUTPUT_DIR]
//! ```
//!
//! `RUST_LOG` controls log verbosity (default `info`).

use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, bail};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use sw_core::{AgentId, GameConfig, ShopPoint};
use sw_nav::{NavigationOracle, PresentationSink, ShopLayout, StraightLineOracle};
use sw_output::{CsvWriter, SessionOutputObserver};
use sw_schedule::load_day_table_reader;
use sw_score::ScoreSink;
use sw_session::{DayReport, GameSession, NoopObserver, SessionBuilder, SessionObserver};

// ── Constants ─────────────────────────────────────────────────────────────────

const WALK_SPEED:       f32 = 1.4; // m/s
const TEMPLATE_COUNT:   u16 = 6;
/// Ticks between operator glances at the monitors.
const REACTION_TICKS:   u64 = 5;
/// Give up after this many failed attempts at a single day.
const MAX_ATTEMPTS:     u32 = 3;

// ── Day table ─────────────────────────────────────────────────────────────────

const DAYS_CSV: &str = "\
day,thief_quota,required_score\n\
1,2,100\n\
2,3,250\n\
3,4,450\n\
4,5,700\n\
5,6,1000\n\
";

// ── Shop ──────────────────────────────────────────────────────────────────────

/// A 12 m x 8 m floor: entrance and exit on the south wall, six browsing
/// spots between three shelf rows.
fn build_layout() -> ShopLayout {
    let p = ShopPoint::new;
    ShopLayout::new(
        p(-1.5, 0.0),
        p(1.5, 0.0),
        vec![
            p(-4.0, 2.5), p(0.0, 2.5), p(4.0, 2.5),
            p(-4.0, 5.5), p(0.0, 5.5), p(4.0, 5.5),
        ],
        vec![
            p(-4.0, 4.0), p(0.0, 4.0), p(4.0, 4.0),
            p(-5.5, 7.5), p(5.5, 7.5),
        ],
        TEMPLATE_COUNT,
    )
}

// ── Operator ──────────────────────────────────────────────────────────────────

#[derive(Default)]
struct Operator {
    glances:     u64,
    apprehended: u32,
    released:    u32,
}

impl Operator {
    /// Act on whatever is on screen right now.
    fn glance<N, P, S>(&mut self, session: &mut GameSession<N, P, S>) -> Result<()>
    where
        N: NavigationOracle,
        P: PresentationSink,
        S: ScoreSink,
    {
        self.glances += 1;
        let confirmed: Vec<AgentId> = session
            .roster()
            .iter()
            .filter(|c| c.is_confirmed_thief())
            .map(|c| c.id())
            .collect();
        let suspicious: Vec<AgentId> = session
            .roster()
            .iter()
            .filter(|c| c.is_warning_visible() && !c.is_confirmed_thief())
            .map(|c| c.id())
            .collect();

        for agent in confirmed {
            session.apprehend(agent)?;
            self.apprehended += 1;
        }
        for agent in suspicious {
            session.release(agent)?;
            self.released += 1;
        }
        Ok(())
    }
}

// ── Run loop ──────────────────────────────────────────────────────────────────

fn play_day<N, P, S, O>(
    session:  &mut GameSession<N, P, S>,
    operator: &mut Operator,
    observer: &mut O,
) -> Result<DayReport>
where
    N: NavigationOracle,
    P: PresentationSink,
    S: ScoreSink,
    O: SessionObserver,
{
    let req = session.start_day()?;
    info!(day = req.day, required = req.required_score, "shift begins");
    loop {
        if let Some(report) = session.tick(observer) {
            return Ok(report);
        }
        if session.current_tick().0 % REACTION_TICKS == 0 {
            operator.glance(session)?;
        }
    }
}

fn play_session<N, P, S, O>(session: &mut GameSession<N, P, S>, observer: &mut O) -> Result<Operator>
where
    N: NavigationOracle,
    P: PresentationSink,
    S: ScoreSink,
    O: SessionObserver,
{
    let mut operator = Operator::default();
    let mut attempts = 0;

    while !session.is_complete() {
        let report = play_day(session, &mut operator, observer)?;
        print_day(&report);

        if report.passed {
            attempts = 0;
            if !session.is_complete() {
                session.advance_day()?;
            }
        } else {
            attempts += 1;
            if attempts >= MAX_ATTEMPTS {
                bail!("day {} failed {attempts} times in a row", report.day);
            }
            session.restart_day(false)?;
        }
    }
    Ok(operator)
}

fn print_day(r: &DayReport) {
    println!(
        "  day {:>2}  {:<6}  score {:>6} / {:<6}  thieves {} caught, {} escaped  wrong arrests {}  ({} ticks)",
        r.day,
        if r.passed { "PASS" } else { "FAIL" },
        r.score,
        r.requirement.required_score,
        r.thieves_caught(),
        r.thieves_escaped(),
        r.wrong_arrests,
        r.elapsed_ticks,
    );
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut args = std::env::args().skip(1);
    let config_path = args.next().map(PathBuf::from);
    let output_dir = args.next().map(PathBuf::from);

    let config = match &config_path {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => GameConfig::default(),
    };

    println!("=== shift: shopwatch headless run ===");
    println!(
        "Days: {}  |  Waves/day: {}  |  Customers/wave: {}  |  Seed: {}",
        config.days, config.waves_per_day, config.customers_per_wave, config.seed
    );
    println!();

    let days = load_day_table_reader(Cursor::new(DAYS_CSV))?;
    let layout = build_layout();
    let mut oracle = StraightLineOracle::new(WALK_SPEED);
    oracle.set_bounds(ShopPoint::new(-6.0, -1.0), ShopPoint::new(6.0, 8.0));

    let mut session = SessionBuilder::new(config, layout, oracle)
        .day_table(days)
        .score_sink(Vec::new())
        .build()?;

    let started = Instant::now();
    let operator = match &output_dir {
        Some(dir) => run_with_output(&mut session, dir)?,
        None => play_session(&mut session, &mut NoopObserver)?,
    };
    let elapsed = started.elapsed();

    println!();
    println!("Final score:     {}", session.score());
    println!("Ticks simulated: {}", session.current_tick().0);
    println!("Score events:    {}", session.sink().len());
    println!(
        "Operator:        {} glances, {} apprehended, {} released",
        operator.glances, operator.apprehended, operator.released
    );
    println!("Wall time:       {:.1} ms", elapsed.as_secs_f64() * 1_000.0);
    Ok(())
}

fn run_with_output<N, P, S>(session: &mut GameSession<N, P, S>, dir: &Path) -> Result<Operator>
where
    N: NavigationOracle,
    P: PresentationSink,
    S: ScoreSink,
{
    let writer = CsvWriter::new(dir)
        .with_context(|| format!("creating output files in {}", dir.display()))?;
    let mut observer = SessionOutputObserver::new(writer);
    let outcome = play_session(session, &mut observer);
    observer.finish()?;
    if let Some(e) = observer.take_error() {
        return Err(e).context("writing session logs");
    }
    println!("Logged {} decisions to {}", observer.decisions_written(), dir.display());
    outcome
}
