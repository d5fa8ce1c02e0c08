use airframe_rs::airfoil::{self, AirfoilSpec};
use airframe_rs::design::validate_lofts;
use airframe_rs::frame::{self, FramePoints, FrameSpec};
use airframe_rs::fuselage::FuselageSpec;
use airframe_rs::interchange::{self, Document};
use airframe_rs::nacelle::{self, NacelleModel, NacelleSpec};
use airframe_rs::section::{self, Section};
use airframe_rs::wing::WingSpec;
use airframe_rs::{AircraftDesign, ComponentSpec, ConsistencyError, GeneratorConfig, ProjectInfo};
use approx::assert_relative_eq;
use itertools::Itertools;
use ncollide2d::na::Point2;

#[test]
fn frame_2000_by_1800() {
    let spec = FrameSpec::new(0.0, 2000.0, 1800.0, FramePoints::Eight, true);
    let points = frame::generate(&spec).unwrap();
    assert_eq!(8, points.len());
    assert_eq!(1000.0, points.iter().map(|p| p.x.abs()).fold(0.0, f64::max));
    assert_eq!(900.0, points.iter().map(|p| p.y.abs()).fold(0.0, f64::max));
}

#[test]
fn naca_2412_chord_500_setting_2() {
    let points = airfoil::generate(&AirfoilSpec::naca4("2412", 500.0, 2.0)).unwrap();
    assert!(points.is_closed());
    assert!(!points.self_intersects());

    let flat = points.rotated(-2.0, &Point2::origin());
    let b = flat.bounds().unwrap();
    assert_relative_eq!(0.0, b.mins.x, epsilon = 1e-9);
    assert_relative_eq!(500.0, b.maxs.x, epsilon = 1e-9);
}

#[test]
fn hoerner_nacelle() {
    let spec = NacelleSpec::new(NacelleModel::Hoerner, 3000.0, 800.0, 0.4, 20);
    let profile = nacelle::generate(&spec).unwrap();
    assert_eq!(20, profile.len());

    let fore: Vec<&Point2<f64>> = profile.iter().filter(|p| p.x < 1200.0).collect();
    let aft: Vec<&Point2<f64>> = profile.iter().filter(|p| p.x > 1200.0).collect();
    assert!(fore.iter().tuple_windows().all(|(a, b)| b.y > a.y));
    assert!(aft.iter().tuple_windows().all(|(a, b)| b.y <= a.y));
    assert_eq!(0.0, profile.points()[0].y);
    assert_eq!(0.0, profile.points()[19].y);
}

#[test]
fn mismatched_frame_counts() {
    let counts = [FramePoints::Eight, FramePoints::Twelve, FramePoints::Eight];
    let sections: Vec<Section> = counts
        .iter()
        .enumerate()
        .map(|(i, c)| {
            let spec = FrameSpec::new(i as f64 * 500.0, 1000.0, 1200.0, *c, true);
            Section::from_frame(&format!("frame_{}", i), &spec).unwrap()
        })
        .collect();

    let error = section::validate(&sections).unwrap_err();
    assert_eq!(
        ConsistencyError::PointCountMismatch {
            index: 1,
            expected: 8,
            found: 12
        },
        error
    );
}

fn trainer() -> AircraftDesign {
    let project = ProjectInfo {
        name: "Trainer".to_string(),
        author: "Design office".to_string(),
        date: "2024-02-29".to_string(),
        description: Some("Fuselage, wing and engine".to_string()),
        version: Some("2".to_string()),
        reference_file: Some("trainer.xml".to_string()),
    };

    let mut fuselage = FuselageSpec::new(7000.0, 1100.0, 1400.0, 6);
    fuselage.point_count = FramePoints::Twelve;

    let tailplane = WingSpec::new(
        2800.0,
        12.0,
        AirfoilSpec::naca4("0012", 900.0, -1.0),
        AirfoilSpec::naca4("0009", 550.0, -1.0),
    );

    let mut design = AircraftDesign::new(project)
        .with_component("fuselage", ComponentSpec::Fuselage(fuselage))
        .with_component("root", ComponentSpec::Foil(AirfoilSpec::naca4("2415", 1600.0, 3.0)))
        .with_component(
            "mid",
            ComponentSpec::Foil(AirfoilSpec::naca5("23015", 1300.0, 2.0).at_station(2500.0)),
        )
        .with_component(
            "tip",
            ComponentSpec::Foil(AirfoilSpec::naca4("2412", 900.0, 0.0).at_station(5000.0)),
        )
        .with_component(
            "engine",
            ComponentSpec::Nacelle(NacelleSpec::new(NacelleModel::Lyon, 1800.0, 700.0, 0.4, 40)),
        )
        .with_component("tailplane", ComponentSpec::Wing(tailplane));
    design.fuselage_length = 7000.0;
    design.fuselage_width = 1100.0;
    design.fuselage_height = 1400.0;
    design
}

#[test]
fn design_survives_the_interchange_document() {
    let design = trainer();
    let path = std::env::temp_dir().join("airframe_rs_scenario_trainer.xml");
    interchange::serialize(&design).unwrap().save(&path).unwrap();
    let loaded = interchange::deserialize(&Document::load(&path).unwrap()).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(design, loaded);

    // The geometry rebuilt from the document is the same as the geometry of the source design
    let config = GeneratorConfig {
        naca_panels: 60,
        ..GeneratorConfig::default()
    };
    let before = design.sections(&config);
    let after = loaded.sections(&config);
    assert_eq!(before.len(), after.len());
    for ((na, a), (nb, b)) in before.iter().zip(after.iter()) {
        assert_eq!(na, nb);
        assert_eq!(a.as_ref().unwrap().points, b.as_ref().unwrap().points);
    }
}

#[test]
fn trainer_lofts_are_consistent() {
    let config = GeneratorConfig {
        naca_panels: 60,
        ..GeneratorConfig::default()
    };
    let design = trainer();
    let sections = design.sections(&config);
    assert_eq!(11, sections.len());

    let checks = validate_lofts(&sections, &config);
    let groups: Vec<&str> = checks.iter().map(|(g, _)| g.as_str()).collect();
    assert_eq!(vec!["fuselage", "foils", "tailplane"], groups);
    for (group, check) in checks.iter() {
        assert!(check.is_ok(), "{} loft failed: {:?}", group, check);
    }

    let tip = sections.iter().find(|(n, _)| n == "tailplane_tip").unwrap();
    let tip = tip.1.as_ref().unwrap();
    assert_relative_eq!(1400.0 * 12f64.to_radians().cos(), tip.station, epsilon = 1e-9);

    let nacelles = design.nacelle_profiles();
    assert_eq!(1, nacelles.len());
    assert!(nacelles[0].1.is_ok());
}
