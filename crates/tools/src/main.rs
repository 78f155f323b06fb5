//! Headless driver for the traffic visualization engine.
//!
//! Lets the engine be exercised end-to-end without a browser: generate a
//! synthetic feed, run the chunked analyzers, render frames, and print JSON
//! for inspection or piping.

use std::env;
use std::fs;
use std::path::PathBuf;

use foundation::math::GeoPoint;
use foundation::time::Time;
use render::command::DrawCommand;
use render::renderer::SceneRenderer;
use runtime::animation::FrameLoop;
use runtime::budget::SliceBudget;
use runtime::idle::IdleScheduler;
use scene::frame_input::RenderFrame;
use scene::view_mode::ViewMode;
use scene::viewport::ViewportState;
use telemetry::analysis::SummaryTask;
use telemetry::network::{NetworkClass, NetworkInfo};
use telemetry::prefs::Theme;
use telemetry::sources::{FixedLocation, FixedNetwork, LocationSource, NetworkMonitor};
use telemetry::synthetic::{self, SyntheticConfig};

fn main() {
    if let Err(e) = real_main() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn real_main() -> Result<(), String> {
    let mut args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        return Err(usage());
    }

    let cmd = args[1].clone();
    args.drain(0..2);

    match cmd.as_str() {
        "generate" => cmd_generate(args),
        "summarize" => cmd_summarize(args),
        "routes" => cmd_routes(args),
        "frame" => cmd_frame(args),
        _ => Err(usage()),
    }
}

fn usage() -> String {
    [
        "usage: trafficctl <command> [options]",
        "",
        "commands:",
        "  generate <out.json> [--seed N] [--count N]   write a synthetic point feed",
        "  summarize [--seed N] [--count N] [--slice N] aggregate a feed via idle slices",
        "  routes [--seed N]                            print the winning route per kind",
        "  frame [--mode M] [--width W] [--height H] [--frames N] [--seed N]",
        "                                               render frames, print stats",
    ]
    .join("\n")
}

fn parse_flag(args: &[String], flag: &str) -> Result<Option<u64>, String> {
    for pair in args.windows(2) {
        if pair[0] == flag {
            return pair[1]
                .parse::<u64>()
                .map(Some)
                .map_err(|e| format!("bad value for {flag}: {e}"));
        }
    }
    Ok(None)
}

fn parse_str_flag(args: &[String], flag: &str) -> Option<String> {
    args.windows(2)
        .find(|pair| pair[0] == flag)
        .map(|pair| pair[1].clone())
}

fn config_from_args(args: &[String]) -> Result<SyntheticConfig, String> {
    let mut config = SyntheticConfig::default();
    if let Some(seed) = parse_flag(args, "--seed")? {
        config.seed = seed;
    }
    if let Some(count) = parse_flag(args, "--count")? {
        config.point_count = count as usize;
    }
    Ok(config)
}

fn cmd_generate(args: Vec<String>) -> Result<(), String> {
    let out_path = args
        .first()
        .filter(|a| !a.starts_with("--"))
        .map(PathBuf::from)
        .ok_or_else(usage)?;
    let config = config_from_args(&args)?;

    let points = synthetic::traffic_points(&config);
    let json = serde_json::to_string_pretty(&points).map_err(|e| e.to_string())?;
    fs::write(&out_path, json).map_err(|e| format!("write {}: {e}", out_path.display()))?;
    println!("wrote {} points to {}", points.len(), out_path.display());
    Ok(())
}

fn cmd_summarize(args: Vec<String>) -> Result<(), String> {
    let config = config_from_args(&args)?;
    let slice = parse_flag(&args, "--slice")?.unwrap_or(25).max(1) as u32;

    let points = synthetic::traffic_points(&config);
    let result = std::rc::Rc::new(std::cell::RefCell::new(None));
    let sink = result.clone();

    let mut sched = IdleScheduler::new();
    sched
        .schedule(0, "traffic-summary", SummaryTask::new(points), move |s| {
            *sink.borrow_mut() = Some(s);
        })
        .map_err(|e| format!("queue full: max {}", e.max_pending))?;

    let mut pulses = 0u32;
    while sched.has_work() {
        sched.pulse(&mut SliceBudget::new(slice));
        pulses += 1;
    }

    let summary = result
        .borrow_mut()
        .take()
        .ok_or("summary task never completed")?;
    let mut doc = serde_json::to_value(&summary).map_err(|e| e.to_string())?;
    doc["pulses"] = serde_json::json!(pulses);
    println!(
        "{}",
        serde_json::to_string_pretty(&doc).map_err(|e| e.to_string())?
    );
    Ok(())
}

fn cmd_routes(args: Vec<String>) -> Result<(), String> {
    let config = config_from_args(&args)?;
    let mut winners = Vec::new();
    for kind in telemetry::route::RouteKind::ALL {
        let best = (0..6)
            .map(|slot| synthetic::route_candidate(&config, kind, slot))
            .min_by(|a, b| synthetic::route_cost(a).total_cmp(&synthetic::route_cost(b)))
            .ok_or("no route candidates generated")?;
        winners.push(best);
    }
    println!(
        "{}",
        serde_json::to_string_pretty(&winners).map_err(|e| e.to_string())?
    );
    Ok(())
}

fn cmd_frame(args: Vec<String>) -> Result<(), String> {
    let config = config_from_args(&args)?;
    let mode = ViewMode::from_str(&parse_str_flag(&args, "--mode").unwrap_or_default());
    let width = parse_flag(&args, "--width")?.unwrap_or(1280) as f64;
    let height = parse_flag(&args, "--height")?.unwrap_or(720) as f64;
    let frames = parse_flag(&args, "--frames")?.unwrap_or(1).max(1);

    let points = synthetic::traffic_points(&config);
    let renderer = SceneRenderer::new(Theme::Light);

    // Headless stand-ins for the device capabilities a browser would inject.
    let location = FixedLocation(Some(GeoPoint::new(config.center_lat, config.center_lng)));
    let network = FixedNetwork(Some(NetworkInfo {
        effective_class: NetworkClass::FourG,
        downlink_mbps: 50.0,
        rtt_ms: 40.0,
        save_data: false,
    }));

    let mut frame_loop = FrameLoop::new();
    let handle = frame_loop.start();

    let mut reports = Vec::new();
    for i in 0..frames {
        let frame = frame_loop
            .tick(handle, Time(i as f64 / 60.0))
            .ok_or("frame loop stopped unexpectedly")?;
        let input = RenderFrame {
            mode,
            width,
            height,
            time_s: frame.time.0,
            viewport: ViewportState::new(),
            points: points.clone(),
            selected_route: Some(synthetic::route_candidate(
                &config,
                telemetry::route::RouteKind::Fastest,
                0,
            )),
            predictions: synthetic::predictions(&config, 8),
            user_location: location.current(),
            network: network.snapshot(),
        };
        let output = renderer.render(&input);
        reports.push(serde_json::json!({
            "frame": frame.index,
            "commands": output.commands.len(),
            "pointsDrawn": output.stats.points_drawn,
            "pointsCulled": output.stats.points_culled,
            "labels": output
                .commands
                .iter()
                .filter(|c| matches!(c, DrawCommand::Label { .. }))
                .count(),
        }));
    }
    frame_loop.stop();

    println!(
        "{}",
        serde_json::to_string_pretty(&serde_json::json!({
            "mode": mode.as_str(),
            "frames": reports,
        }))
        .map_err(|e| e.to_string())?
    );
    Ok(())
}
