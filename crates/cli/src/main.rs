use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use pentagram::closed::{ClosedMap, Filter, MapConfig, Polygon};
use pentagram::normalize::Normalization;
use pentagram::sample::{
    random_convex, random_inscribed, random_spiral, random_star_shaped, regular_polygon,
    ReplayToken, SpiralKind,
};
use pentagram::twisted::{TwistedConfig, TwistedMap, TwistedPolygon};
use pentagram::{ProjPoint, Rounding};
use polars::prelude::*;
use serde::Serialize;
use serde_json::json;
use std::fs::{self, File};
use std::path::Path;
use tracing_subscriber::fmt::SubscriberBuilder;

mod provenance;

use provenance::{write_sidecar, Payload};

#[derive(Parser)]
#[command(name = "pentagram-cli")]
#[command(about = "Pentagram-map experiment runner")]
struct Cmd {
    /// Optional run label; propagated to outputs and logs
    #[arg(long)]
    label: Option<String>,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Iterate a closed polygon and write a JSON report
    Closed(ClosedArgs),
    /// Iterate a twisted polygon and write its corner-invariant trajectory (CSV or Parquet)
    Spiral(SpiralArgs),
    /// Print a small provenance JSON block
    Report,
}

#[derive(Clone, Copy, Debug, ValueEnum, Serialize)]
#[serde(rename_all = "kebab-case")]
enum NormArg {
    None,
    Square,
    SquareTwisted,
    Ellipse,
}

impl From<NormArg> for Normalization {
    fn from(a: NormArg) -> Self {
        match a {
            NormArg::None => Normalization::None,
            NormArg::Square => Normalization::Square,
            NormArg::SquareTwisted => Normalization::SquareTwisted,
            NormArg::Ellipse => Normalization::Ellipse,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum, Serialize)]
#[serde(rename_all = "kebab-case")]
enum FilterArg {
    None,
    Embedded,
    Convex,
    Bird,
}

impl From<FilterArg> for Filter {
    fn from(a: FilterArg) -> Self {
        match a {
            FilterArg::None => Filter::None,
            FilterArg::Embedded => Filter::OnlyEmbedded,
            FilterArg::Convex => Filter::OnlyConvex,
            FilterArg::Bird => Filter::OnlyBird,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum, Serialize)]
#[serde(rename_all = "kebab-case")]
enum ClosedStart {
    Regular,
    Inscribed,
    Convex,
    Star,
}

#[derive(Clone, Copy, Debug, ValueEnum, Serialize)]
#[serde(rename_all = "kebab-case")]
enum SpiralStart {
    Default,
    Alpha3,
    Beta3,
    Beta2,
}

#[derive(Args, Clone, Debug, Serialize)]
struct ClosedArgs {
    /// Vertex count for generated starts
    #[arg(long, default_value_t = 7)]
    n: usize,
    #[arg(long, default_value_t = 2)]
    l: usize,
    #[arg(long, default_value_t = 1)]
    k: usize,
    #[arg(long, default_value_t = 1)]
    power: usize,
    #[arg(long, default_value_t = 0)]
    shift: usize,
    #[arg(long, default_value_t = 10)]
    steps: usize,
    #[arg(long, value_enum, default_value_t = NormArg::Ellipse)]
    normalization: NormArg,
    #[arg(long, value_enum, default_value_t = FilterArg::None)]
    filter: FilterArg,
    #[arg(long, value_enum, default_value_t = ClosedStart::Regular)]
    start: ClosedStart,
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// CSV with columns `x`, `y`; overrides `--start` and `--n`
    #[arg(long)]
    input: Option<String>,
    #[arg(long)]
    out: String,
}

#[derive(Args, Clone, Debug, Serialize)]
struct SpiralArgs {
    /// Number of periods
    #[arg(long, default_value_t = 3)]
    periods: usize,
    #[arg(long, default_value_t = 3)]
    l: usize,
    #[arg(long, default_value_t = 1)]
    k: usize,
    #[arg(long, default_value_t = 1)]
    power: usize,
    #[arg(long, default_value_t = 20)]
    steps: usize,
    #[arg(long, value_enum, default_value_t = SpiralStart::Default)]
    start: SpiralStart,
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Reject image vertices on the line at infinity
    #[arg(long)]
    check_affine: bool,
    /// `.parquet` writes Parquet, anything else CSV
    #[arg(long)]
    out: String,
}

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Closed(args) => closed(args, cmd.label),
        Action::Spiral(args) => spiral(args, cmd.label),
        Action::Report => report(cmd.label),
    }
}

#[derive(Debug, Serialize)]
struct StepRecord {
    iterations: u64,
    embedded: bool,
    convex: bool,
    bird: bool,
    energy: Option<f64>,
    distance_to_reference: Option<f64>,
}

#[derive(Debug, Serialize)]
struct ClosedReport<'a> {
    label: Option<&'a str>,
    params: &'a ClosedArgs,
    records: Vec<StepRecord>,
    /// Final vertices, homogeneous.
    vertices: Vec<[f64; 3]>,
    corner_invariants: Vec<f64>,
    stopped: Option<String>,
}

fn record(p: &Polygon) -> StepRecord {
    let info = p.info();
    StepRecord {
        iterations: p.map.iterations(),
        embedded: info.embedded,
        convex: info.convex,
        bird: info.bird,
        energy: info.energy,
        distance_to_reference: p.distance_to_reference().ok(),
    }
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating output dir {}", parent.display()))?;
        }
    }
    Ok(())
}

fn read_vertices(input: &str) -> Result<Vec<ProjPoint>> {
    let df = LazyCsvReader::new(input)
        .with_infer_schema_length(Some(100))
        .finish()
        .with_context(|| format!("reading {input}"))?
        .select([
            col("x").cast(DataType::Float64),
            col("y").cast(DataType::Float64),
        ])
        .collect()
        .with_context(|| format!("columns x, y in {input}"))?;
    tracing::info!(rows = df.height(), cols = df.width(), "input_csv_shape");
    let xs = df.column("x")?.f64()?;
    let ys = df.column("y")?.f64()?;
    xs.into_iter()
        .zip(ys)
        .enumerate()
        .map(|(row, xy)| match xy {
            (Some(x), Some(y)) => Ok(ProjPoint::new(x, y, 1.0)),
            _ => bail!("{input}: row {row} has a missing coordinate"),
        })
        .collect()
}

fn closed_start(args: &ClosedArgs, rounding: Rounding) -> Result<Vec<ProjPoint>> {
    if let Some(input) = &args.input {
        return read_vertices(input);
    }
    let tok = ReplayToken::new(args.seed, 0);
    Ok(match args.start {
        ClosedStart::Regular => regular_polygon(args.n, 1.0),
        ClosedStart::Inscribed => random_inscribed(args.n, tok),
        ClosedStart::Convex => random_convex(args.n, tok, rounding)?,
        ClosedStart::Star => random_star_shaped(args.n, tok, rounding)?,
    })
}

fn closed(args: ClosedArgs, label: Option<String>) -> Result<()> {
    let config = MapConfig {
        l: args.l,
        k: args.k,
        power: args.power,
        shift: args.shift,
        normalization: args.normalization.into(),
        filter: args.filter.into(),
        ..MapConfig::default()
    };
    let vertices = closed_start(&args, config.rounding)?;
    let n = vertices.len();
    if !config.fits(n) {
        tracing::warn!(n, l = args.l, k = args.k, "vertex count outside the guarded range");
    }
    tracing::info!(n, l = args.l, k = args.k, power = args.power, steps = args.steps, label = ?label, "closed");

    let mut polygon = Polygon::from_vertices(vertices, ClosedMap::new(config))?;
    let mut records = vec![record(&polygon)];
    let mut stopped = None;
    for _ in 0..args.steps {
        if let Err(e) = polygon.act(true, true) {
            tracing::warn!(error = %e, iterations = polygon.map.iterations(), "closed run stopped");
            stopped = Some(e.to_string());
            break;
        }
        records.push(record(&polygon));
    }

    let report = ClosedReport {
        label: label.as_deref(),
        params: &args,
        records,
        vertices: polygon.vertices().iter().map(|v| [v.x, v.y, v.z]).collect(),
        corner_invariants: polygon.corner_invariants(),
        stopped,
    };
    let out = Path::new(&args.out);
    ensure_parent(out)?;
    fs::write(out, serde_json::to_vec_pretty(&report)?)
        .with_context(|| format!("writing {}", out.display()))?;

    let results = json!({
        "iterations": polygon.map.iterations(),
        "records": report.records.len(),
        "stopped": report.stopped,
    });
    write_sidecar(out, Payload::new(serde_json::to_value(&args)?, label).with_results(results))?;
    tracing::info!(iterations = polygon.map.iterations(), out = %out.display(), "closed done");
    Ok(())
}

fn spiral_start(args: &SpiralArgs) -> Result<Vec<f64>> {
    let tok = ReplayToken::new(args.seed, 0);
    let kind = match args.start {
        SpiralStart::Default => return Ok(TwistedPolygon::default_corners(args.periods, args.l)?),
        SpiralStart::Alpha3 => SpiralKind::AlphaThree,
        SpiralStart::Beta3 => SpiralKind::BetaThree,
        SpiralStart::Beta2 => SpiralKind::BetaTwo,
    };
    Ok(random_spiral(args.periods, kind, tok))
}

/// Long format: one row per (step, corner index).
fn trajectory_frame(initial: &[f64], steps: &[Vec<f64>]) -> PolarsResult<DataFrame> {
    let mut step = Vec::new();
    let mut corner = Vec::new();
    let mut value = Vec::new();
    for (s, corners) in std::iter::once(initial).chain(steps.iter().map(Vec::as_slice)).enumerate() {
        for (i, x) in corners.iter().enumerate() {
            step.push(s as i64);
            corner.push(i as i64);
            value.push(*x);
        }
    }
    df!("step" => step, "corner" => corner, "value" => value)
}

fn write_frame(df: &mut DataFrame, out: &Path) -> Result<()> {
    ensure_parent(out)?;
    let mut file = File::create(out).with_context(|| format!("creating {}", out.display()))?;
    match out.extension().and_then(|e| e.to_str()) {
        Some("parquet") => {
            ParquetWriter::new(&mut file).finish(df)?;
        }
        _ => CsvWriter::new(&mut file).include_header(true).finish(df)?,
    }
    Ok(())
}

fn spiral(args: SpiralArgs, label: Option<String>) -> Result<()> {
    let config = TwistedConfig {
        l: args.l,
        k: args.k,
        power: args.power,
        check_affine: args.check_affine,
        ..TwistedConfig::default()
    };
    let corners = spiral_start(&args)?;
    let polygon = TwistedPolygon::from_corners(corners, TwistedMap::new(config))?;
    tracing::info!(
        periods = args.periods,
        l = args.l,
        k = args.k,
        omega1 = polygon.omega1(),
        omega2 = polygon.omega2(),
        label = ?label,
        "spiral"
    );

    let trajectory = polygon.trajectory(args.steps);
    let completed = trajectory.corners.len();
    if completed < args.steps {
        tracing::warn!(completed, requested = args.steps, "spiral run stopped early");
    }
    let mut df = trajectory_frame(polygon.corners(), &trajectory.corners)?;
    let out = Path::new(&args.out);
    write_frame(&mut df, out)?;

    let results = json!({
        "completed_steps": completed,
        "omega1": polygon.omega1(),
        "omega2": polygon.omega2(),
        "rows": df.height(),
    });
    write_sidecar(out, Payload::new(serde_json::to_value(&args)?, label).with_results(results))?;
    tracing::info!(rows = df.height(), out = %out.display(), "spiral done");
    Ok(())
}

fn report(label: Option<String>) -> Result<()> {
    let block = provenance::block(&Payload::new(json!({}), label), &[]);
    println!("{}", serde_json::to_string_pretty(&block)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use tempfile::tempdir;

    fn closed_args(n: usize, steps: usize, out: &Path) -> ClosedArgs {
        ClosedArgs {
            n,
            l: 2,
            k: 1,
            power: 1,
            shift: 0,
            steps,
            normalization: NormArg::Ellipse,
            filter: FilterArg::None,
            start: ClosedStart::Regular,
            seed: 0,
            input: None,
            out: out.to_string_lossy().into_owned(),
        }
    }

    fn read_json(path: &Path) -> Value {
        serde_json::from_slice(&fs::read(path).unwrap()).unwrap()
    }

    #[test]
    fn closed_run_writes_report_and_sidecar() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("runs/heptagon.json");
        closed(closed_args(7, 3, &out), Some("t".into())).unwrap();
        let report = read_json(&out);
        assert_eq!(report["records"].as_array().unwrap().len(), 4);
        assert_eq!(report["records"][3]["iterations"], 3);
        assert_eq!(report["records"][3]["convex"], true);
        assert!(report["stopped"].is_null());
        let sidecar = read_json(&dir.path().join("runs/heptagon.provenance.json"));
        assert_eq!(sidecar["results"]["iterations"], 3);
        assert_eq!(sidecar["params"]["normalization"], "ellipse");
    }

    #[test]
    fn closed_run_keeps_the_partial_report() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("square.json");
        closed(closed_args(4, 5, &out), None).unwrap();
        let report = read_json(&out);
        assert_eq!(report["records"].as_array().unwrap().len(), 2);
        assert!(report["stopped"].as_str().unwrap().contains("point"));
    }

    #[test]
    fn closed_run_reads_csv_vertices() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("hexagon.csv");
        fs::write(
            &input,
            "x,y\n2,0\n1,1.5\n-1,1.7\n-2,0.2\n-1,-1.5\n1.2,-1.3\n3,0.4\n",
        )
        .unwrap();
        let out = dir.path().join("from_csv.json");
        let mut args = closed_args(0, 1, &out);
        args.input = Some(input.to_string_lossy().into_owned());
        closed(args, None).unwrap();
        let report = read_json(&out);
        assert_eq!(report["vertices"].as_array().unwrap().len(), 7);
    }

    #[test]
    fn spiral_run_writes_long_csv() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("spiral.csv");
        let args = SpiralArgs {
            periods: 3,
            l: 3,
            k: 1,
            power: 1,
            steps: 5,
            start: SpiralStart::Default,
            seed: 0,
            check_affine: false,
            out: out.to_string_lossy().into_owned(),
        };
        spiral(args, None).unwrap();
        let text = fs::read_to_string(&out).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("step,corner,value"));
        assert_eq!(lines.count(), 6 * 6);
        let sidecar = read_json(&dir.path().join("spiral.provenance.json"));
        assert_eq!(sidecar["results"]["completed_steps"], 5);
    }

    #[test]
    fn trajectory_frame_is_long_format() {
        let df = trajectory_frame(&[1.0, 2.0], &[vec![3.0, 4.0]]).unwrap();
        assert_eq!(df.shape(), (4, 3));
        let steps: Vec<i64> = df
            .column("step")
            .unwrap()
            .i64()
            .unwrap()
            .into_no_null_iter()
            .collect();
        assert_eq!(steps, vec![0, 0, 1, 1]);
    }
}
