use cabinet_planner::render;
use cabinet_planner::types::Rect;
use cabinet_planner::{CabinetSpec, SheetStock};
use clap::Parser;
use std::path::PathBuf;
use tracing::Level;

#[derive(Parser)]
#[command(
    name = "cabinet_planner",
    about = "Cabinet layout, cut list and sheet-goods planner"
)]
struct Cli {
    /// Cabinet description (JSON)
    spec: PathBuf,

    /// Stock sheet dimensions in inches (WxH, e.g. 48x96)
    #[arg(long, default_value = "48x96", value_parser = parse_dimensions)]
    sheet: Rect,

    /// Blade kerf width in inches
    #[arg(long, default_value_t = 0.125)]
    kerf: f64,

    /// Disable piece rotation (grain-sensitive stock)
    #[arg(long)]
    no_rotate: bool,

    /// Show a scaled map and legend of each sheet
    #[arg(long)]
    layout: bool,

    /// Print the full plan as JSON
    #[arg(long)]
    json: bool,

    /// Log each pipeline stage to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn parse_dimensions(s: &str) -> Result<Rect, String> {
    let parts: Vec<&str> = s.split('x').collect();
    if parts.len() != 2 {
        return Err(format!("invalid dimensions '{}', expected WxH", s));
    }
    let width = parts[0]
        .parse::<f64>()
        .map_err(|_| format!("invalid width in '{}'", s))?;
    let height = parts[1]
        .parse::<f64>()
        .map_err(|_| format!("invalid height in '{}'", s))?;
    if !(width > 0.0 && height > 0.0) {
        return Err(format!("dimensions must be positive in '{}'", s));
    }
    Ok(Rect::new(width, height))
}

fn load_spec(path: &PathBuf) -> Result<CabinetSpec, String> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {}", path.display(), e))?;
    serde_json::from_str(&text).map_err(|e| format!("invalid cabinet in {}: {}", path.display(), e))
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .init();

    let spec = load_spec(&cli.spec).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    let stock = SheetStock {
        width: cli.sheet.w,
        height: cli.sheet.h,
        kerf: cli.kerf,
        allow_rotation: !cli.no_rotate,
    };

    let plan = cabinet_planner::plan(&spec, &stock).unwrap_or_else(|errors| {
        for e in &errors {
            eprintln!("Error: {}", e);
        }
        std::process::exit(1);
    });

    if cli.json {
        match serde_json::to_string_pretty(&plan) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    println!("Cut list:");
    for piece in &plan.cut_list {
        let notes = piece
            .notes
            .as_deref()
            .map(|n| format!(" ({})", n))
            .unwrap_or_default();
        println!(
            "  {:>3} x {} {} @ {} {}{}",
            piece.quantity,
            piece.label,
            piece.rect(),
            piece.thickness,
            piece.material,
            notes
        );
    }
    println!();

    for (i, sheet) in plan.packing.sheets.iter().enumerate() {
        print!("Sheet {}: ", i + 1);
        if cli.layout {
            print!("{}", render::render_sheet(sheet));
        } else {
            println!("{}", sheet.material);
            for p in &sheet.placements {
                let rot = if p.rotated { " [rotated]" } else { "" };
                println!("  {} {} @ ({}, {}){}", p.label, p.rect, p.x, p.y, rot);
            }
        }
        println!();
    }

    for m in &plan.packing.materials {
        println!(
            "{}: {} sheet{}, {:.1}% waste",
            m.material,
            m.sheet_count,
            if m.sheet_count == 1 { "" } else { "s" },
            m.waste_percentage,
        );
    }

    let sheet_count = plan.packing.sheet_count();
    println!(
        "Summary: {} sheet{} used, {:.1}% waste",
        sheet_count,
        if sheet_count == 1 { "" } else { "s" },
        plan.packing.total_waste_percentage,
    );
}
