//! airframe - generate the section and nacelle geometry of a design document
//!
//! Usage:
//!   airframe <design.xml> [config.json] [out-dir]
//!
//! Writes one `<component>.json` point file per built section or nacelle profile into the
//! output directory (default: the current directory) and prints a report per component.

use airframe_rs::config::GeneratorConfig;
use airframe_rs::design::validate_lofts;
use airframe_rs::geometry::PointSequence;
use airframe_rs::interchange::{deserialize, Document};
use std::env;
use std::error::Error;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

fn write_points(
    points: &PointSequence,
    out_dir: &Path,
    name: &str,
) -> Result<PathBuf, Box<dyn Error>> {
    let path = out_dir.join(format!("{}.json", name));
    let file = File::create(&path)?;
    serde_json::to_writer_pretty(BufWriter::new(file), points)?;
    Ok(path)
}

fn run(args: &[String]) -> Result<bool, Box<dyn Error>> {
    let design_path = Path::new(&args[1]);
    let config = match args.get(2) {
        Some(p) => GeneratorConfig::load(Path::new(p))?,
        None => GeneratorConfig::default(),
    };
    let out_dir = args.get(3).map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&out_dir)?;

    let design = deserialize(&Document::load(design_path)?)?;
    println!(
        "{}: {} components",
        design.project.name,
        design.components.len()
    );

    let mut ok = true;
    let sections = design.sections(&config);
    for (name, result) in sections.iter() {
        match result {
            Ok(section) => {
                let path = write_points(&section.points, &out_dir, name)?;
                println!("  {:<20} {:>4} points  {}", name, section.points.len(), path.display());
            }
            Err(e) => {
                ok = false;
                println!("  {:<20} FAILED: {}", name, e);
            }
        }
    }

    for (name, result) in design.nacelle_profiles().iter() {
        match result {
            Ok(profile) => {
                let path = write_points(profile, &out_dir, name)?;
                println!("  {:<20} {:>4} points  {}", name, profile.len(), path.display());
            }
            Err(e) => {
                ok = false;
                println!("  {:<20} FAILED: {}", name, e);
            }
        }
    }

    for (group, check) in validate_lofts(&sections, &config) {
        match check {
            Ok(()) => println!("{} loft: consistent", group),
            Err(e) => {
                ok = false;
                println!("{} loft: {}", group, e);
            }
        }
    }

    Ok(ok)
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 || args.len() > 4 {
        eprintln!("Usage: airframe <design.xml> [config.json] [out-dir]");
        return ExitCode::from(2);
    }

    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
