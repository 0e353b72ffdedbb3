//! ZMEASURE 命令行入口
//! 构建演示场景，把拾取序列交给测量会话，输出报告文本或 JSON

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use serde::Serialize;
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

use zmeasure_core::config::MeasureConfig;
use zmeasure_core::kernel::{ArcEdge, Primitive};
use zmeasure_core::math::{Placement, Point3, Vector3};
use zmeasure_core::measure::MeasurementResult;
use zmeasure_core::shape::Shape;
use zmeasure_ui::{
    MeasureMode, MeasurementSession, Pick, RecordingSink, SceneSelection, SelectionMethod,
    SelectionOutcome, SelectionSource,
};

/// 演示文档名
const DOCUMENT: &str = "Assembly";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ModeArg {
    Single,
    Distance,
    Angle,
}

impl From<ModeArg> for MeasureMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Single => MeasureMode::SingleEntity,
            ModeArg::Distance => MeasureMode::Distance,
            ModeArg::Angle => MeasureMode::Angle,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum MethodArg {
    Snap,
    Shape,
}

impl From<MethodArg> for SelectionMethod {
    fn from(method: MethodArg) -> Self {
        match method {
            MethodArg::Snap => SelectionMethod::Snap,
            MethodArg::Shape => SelectionMethod::Shape,
        }
    }
}

/// Measure lengths, distances, radii and angles on a demo assembly
#[derive(Debug, Parser)]
#[command(name = "zmeasure", version, about)]
struct Cli {
    /// Measurement type
    #[arg(long, value_enum, default_value = "distance")]
    mode: ModeArg,

    /// Selection method
    #[arg(long, value_enum, default_value = "shape")]
    method: MethodArg,

    /// Show ΔX/ΔY/ΔZ components in labels
    #[arg(long)]
    components: bool,

    /// Do not create 3D labels
    #[arg(long)]
    no_label: bool,

    /// JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long)]
    json: bool,

    /// List the pickable sub-elements of the demo scene
    #[arg(long)]
    list: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Picks in `Object.SubElement` form, e.g. `Box.Face1`; runs the demo script when empty
    picks: Vec<String>,
}

/// 一次拾取的输出
#[derive(Debug, Serialize)]
struct Step {
    pick: String,
    mode: MeasureMode,
    method: SelectionMethod,
    outcome: &'static str,
    report: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<MeasurementResult>,
}

type Session = MeasurementSession<SceneSelection<Primitive>, RecordingSink>;

/// 演示装配：长方体、圆柱端面圆、基准线和基准面
fn demo_scene() -> SceneSelection<Primitive> {
    let mut scene = SceneSelection::new(DOCUMENT);

    let (min, max) = (Point3::origin(), Point3::new(20.0, 10.0, 5.0));
    for (i, face) in Primitive::cuboid_faces(min, max).into_iter().enumerate() {
        scene.insert("Box", &format!("Face{}", i + 1), face);
    }
    let corners = Primitive::cuboid(min, max).vertexes();
    for (i, corner) in corners.iter().enumerate() {
        scene.insert("Box", &format!("Vertex{}", i + 1), Primitive::Vertex(*corner));
    }
    scene.insert("Box", "Edge1", Primitive::segment(min, Point3::new(20.0, 0.0, 0.0)));
    scene.insert("Box", "Edge2", Primitive::segment(min, Point3::new(0.0, 10.0, 0.0)));
    scene.insert("Box", "Edge3", Primitive::segment(min, Point3::new(0.0, 0.0, 5.0)));
    scene.insert(
        "Box",
        "Edge4",
        Primitive::segment(Point3::new(0.0, 10.0, 5.0), Point3::new(20.0, 10.0, 5.0)),
    );
    scene.insert("Box", "Solid1", Primitive::cuboid(min, max));

    scene.insert(
        "Cylinder",
        "Edge1",
        Primitive::Arc(ArcEdge::circle(Point3::new(10.0, 5.0, 5.0), 3.0, Vector3::z())),
    );
    scene.insert(
        "Cylinder",
        "Edge2",
        Primitive::Arc(ArcEdge::new(
            Point3::new(10.0, 5.0, 15.0),
            3.0,
            Vector3::z(),
            0.0,
            std::f64::consts::PI,
        )),
    );

    scene.insert(
        "DatumLine",
        "Edge1",
        Primitive::DatumLine(Placement::translation(0.0, 0.0, 30.0)),
    );
    scene.insert(
        "DatumPlane",
        "Face1",
        Primitive::DatumPlane(Placement::translation(0.0, 0.0, -10.0)),
    );
    scene
}

/// 内置演示脚本
fn demo_script() -> Vec<(MeasureMode, SelectionMethod, Vec<&'static str>)> {
    use MeasureMode::{Angle, Distance, SingleEntity};
    use SelectionMethod::{Shape as ByShape, Snap};
    vec![
        (
            SingleEntity,
            ByShape,
            vec!["Box.Edge1", "Cylinder.Edge1", "Box.Face6", "Box.Vertex8", "Box.Solid1"],
        ),
        (Distance, ByShape, vec!["Box.Vertex1", "Cylinder.Edge1"]),
        (Distance, ByShape, vec!["Box.Face1", "Box.Face2"]),
        (Distance, Snap, vec!["Cylinder.Edge1", "Box.Vertex8"]),
        (Distance, Snap, vec!["Box.Vertex1", "DatumPlane.Face1"]),
        (Angle, ByShape, vec!["Box.Face1", "Box.Face6"]),
        (Angle, ByShape, vec!["Box.Face5", "DatumPlane.Face1"]),
        (Angle, ByShape, vec!["Box.Edge1", "Box.Edge4"]),
        (Angle, ByShape, vec!["Box.Edge3", "Box.Face6"]),
    ]
}

fn outcome_name(outcome: &SelectionOutcome) -> &'static str {
    match outcome {
        SelectionOutcome::Inactive => "inactive",
        SelectionOutcome::Ignored(_) => "ignored",
        SelectionOutcome::FirstSelected => "first-selected",
        SelectionOutcome::Measured(_) => "measured",
        SelectionOutcome::Failed(_) => "failed",
    }
}

fn load_config(cli: &Cli) -> Result<MeasureConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => MeasureConfig::default(),
    };
    if cli.components {
        config.show_components = true;
    }
    if cli.no_label {
        config.show_label = false;
    }
    config.validate().context("invalid configuration")?;
    Ok(config)
}

/// 依次处理拾取，记录每一步的输出
fn replay(session: &mut Session, picks: &[String], steps: &mut Vec<Step>) -> Result<()> {
    for text in picks {
        let pick = Pick::parse(DOCUMENT, text)
            .with_context(|| format!("invalid pick `{}`, expected Object.SubElement", text))?;
        session.selection_mut().add_selection(&pick);
        let outcome = session.on_selection_event(&pick);
        debug!("{} -> {:?}", pick, outcome);

        let result = match outcome {
            SelectionOutcome::Measured(_) => session.last_result().cloned(),
            _ => None,
        };
        steps.push(Step {
            pick: pick.to_string(),
            mode: session.mode(),
            method: session.selection_method(),
            outcome: outcome_name(&outcome),
            report: session.report_text().to_string(),
            result,
        });
    }
    Ok(())
}

fn print_steps(steps: &[Step]) {
    for step in steps {
        println!(
            "[{} / {}] {} ({})",
            step.mode.name(),
            step.method.name(),
            step.pick,
            step.outcome
        );
        for line in step.report.lines() {
            println!("    {}", line);
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // 初始化日志
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing::subscriber::set_global_default(
        FmtSubscriber::builder()
            .with_max_level(level)
            .with_writer(std::io::stderr)
            .finish(),
    )?;

    let scene = demo_scene();
    if cli.list {
        for entry in scene.entries() {
            println!("{}", entry);
        }
        return Ok(());
    }

    let config = load_config(&cli)?;
    info!("Starting ZMEASURE...");

    let mut session = MeasurementSession::new(scene, RecordingSink::new(), config);
    session.start();

    let mut steps = Vec::new();
    if cli.picks.is_empty() {
        for (mode, method, picks) in demo_script() {
            session.set_mode(mode);
            session.set_selection_method(method);
            let picks: Vec<String> = picks.into_iter().map(str::to_string).collect();
            replay(&mut session, &picks, &mut steps)?;
        }
    } else {
        session.set_mode(cli.mode.into());
        session.set_selection_method(cli.method.into());
        replay(&mut session, &cli.picks, &mut steps)?;
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&steps)?);
    } else {
        print_steps(&steps);
    }

    info!("{} objects in the scene", session.sink().len());
    session.accept();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_script_picks_resolve() {
        let scene = demo_scene();
        for (_, _, picks) in demo_script() {
            for text in picks {
                let pick = Pick::parse(DOCUMENT, text).unwrap();
                assert!(scene.resolve(&pick).is_some(), "{}", text);
            }
        }
    }

    #[test]
    fn test_replay_distance() {
        let mut session = MeasurementSession::new(demo_scene(), RecordingSink::new(), MeasureConfig::default());
        session.start();
        let picks = vec!["Box.Vertex1".to_string(), "Box.Vertex8".to_string()];
        let mut steps = Vec::new();
        replay(&mut session, &picks, &mut steps).unwrap();
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].outcome, "first-selected");
        assert_eq!(steps[1].outcome, "measured");
        assert!(steps[1].report.starts_with("Distance = "));
        assert!(serde_json::to_string(&steps).is_ok());
    }

    #[test]
    fn test_bad_pick_is_an_error() {
        let mut session = MeasurementSession::new(demo_scene(), RecordingSink::new(), MeasureConfig::default());
        session.start();
        let mut steps = Vec::new();
        assert!(replay(&mut session, &["Box".to_string()], &mut steps).is_err());
    }

    #[test]
    fn test_cli_parses() {
        let cli = Cli::parse_from(["zmeasure", "--mode", "angle", "--components", "Box.Face1", "Box.Face2"]);
        assert_eq!(cli.mode, ModeArg::Angle);
        assert!(cli.components);
        assert_eq!(cli.picks.len(), 2);
        let config = load_config(&cli).unwrap();
        assert!(config.show_components);
        assert!(config.show_label);
    }
}
