//! Orrery Headless Simulation Harness
//!
//! Validates generation, orbit ticks and state sync end-to-end.
//! Runs entirely in-process - in-memory store, no rendering.
//!
//! Usage:
//!   cargo run -p orrery-simtest
//!   cargo run -p orrery-simtest -- --verbose
//!   cargo run -p orrery-simtest -- --constants tuned.json

use std::f32::consts::TAU;

use hecs::World;
use orrery_core::components::{Kinematics, Orbit, Vec2};
use orrery_core::config::{GenerationConstants, SystemConfig};
use orrery_core::engine::SimulationEngine;
use orrery_core::error::{GenerationError, SyncError};
use orrery_core::generation::{planet_name, StarType, SystemGenerator};
use orrery_core::orbital::{normalize_angle, orbital_speed, position_on_orbit};
use orrery_core::persistence::{InMemoryRepository, SystemRepository};
use orrery_core::state::{StarSystemState, SystemId};
use orrery_core::synchronizer::{SaveOutcome, StateSynchronizer};
use orrery_core::systems::orbit_system;

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let verbose = args.iter().any(|a| a == "--verbose");
    let constants_path = args
        .iter()
        .position(|a| a == "--constants")
        .and_then(|i| args.get(i + 1));
    println!("=== Orrery Simulation Harness ===\n");

    let mut results = Vec::new();

    // 1. Generation constants
    let constants = match load_constants(constants_path.map(String::as_str)) {
        Ok(c) => c,
        Err(detail) => {
            println!("  ✗ constants_load: {}", detail);
            std::process::exit(1);
        }
    };
    results.extend(validate_constants(&constants, verbose));

    // 2. Determinism
    results.extend(validate_determinism(&constants));

    // 3. Generation bounds sweep
    results.extend(validate_generation_bounds(&constants, verbose));

    // 4. Orbit ticks
    results.extend(validate_orbits(&constants));

    // 5. State sync against the in-memory store
    results.extend(validate_state_sync(&constants));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

fn load_constants(path: Option<&str>) -> Result<GenerationConstants, String> {
    match path {
        Some(p) => GenerationConstants::from_path(p).map_err(|e| format!("{}: {}", p, e)),
        None => Ok(GenerationConstants::default()),
    }
}

fn generate(
    constants: &GenerationConstants,
    config: &SystemConfig,
) -> Result<StarSystemState, GenerationError> {
    SystemGenerator::from_config(config, constants.clone()).generate(config)
}

// ── 1. Constants ────────────────────────────────────────────────────────

fn validate_constants(constants: &GenerationConstants, verbose: bool) -> Vec<TestResult> {
    println!("--- Generation Constants ---");
    let mut results = Vec::new();

    let valid = constants.validate();
    results.push(TestResult {
        name: "constants_valid".into(),
        passed: valid.is_ok(),
        detail: match &valid {
            Ok(()) => "constants pass validation".into(),
            Err(e) => e.to_string(),
        },
    });

    if verbose {
        println!(
            "  base={} increment={} variance={} max_planets={}",
            constants.base_orbital_radius,
            constants.orbital_radius_increment,
            constants.orbital_radius_variance,
            constants.max_planets
        );
        println!(
            "  mass range: {:.3e} .. {:.3e} kg",
            constants.min_planet_mass, constants.max_planet_mass
        );
    }

    results
}

// ── 2. Determinism ──────────────────────────────────────────────────────

fn validate_determinism(constants: &GenerationConstants) -> Vec<TestResult> {
    println!("--- Determinism ---");
    let mut results = Vec::new();

    let mut mismatched = Vec::new();
    for seed in 0..20u64 {
        let config = SystemConfig::new(constants.max_planets, (seed % 4) as i32).with_seed(seed);
        let (Ok(a), Ok(b)) = (generate(constants, &config), generate(constants, &config)) else {
            mismatched.push(seed);
            continue;
        };
        let same = a
            .planets()
            .zip(b.planets())
            .all(|(p, q)| p.position == q.position && p.velocity == q.velocity && p.mass == q.mass);
        if !same || a.planet_count() != b.planet_count() {
            mismatched.push(seed);
        }
    }
    results.push(TestResult {
        name: "same_seed_same_system".into(),
        passed: mismatched.is_empty(),
        detail: if mismatched.is_empty() {
            "20 seeds reproduce exactly".into()
        } else {
            format!("seeds diverged: {:?}", mismatched)
        },
    });

    let a = generate(constants, &SystemConfig::new(3, 1).with_seed(1));
    let b = generate(constants, &SystemConfig::new(3, 1).with_seed(2));
    let differs = match (&a, &b) {
        (Ok(a), Ok(b)) => a.planets().zip(b.planets()).any(|(p, q)| p.position != q.position),
        _ => false,
    };
    results.push(TestResult {
        name: "different_seed_different_system".into(),
        passed: differs,
        detail: "seeds 1 and 2 produce different orbits".into(),
    });

    results
}

// ── 3. Generation Bounds ────────────────────────────────────────────────

fn validate_generation_bounds(constants: &GenerationConstants, verbose: bool) -> Vec<TestResult> {
    println!("--- Generation Bounds ---");
    let mut results = Vec::new();

    let half_variance = constants.orbital_radius_variance / 2.0;
    let mut systems = 0;
    let mut radius_errors = Vec::new();
    let mut mass_errors = 0;
    let mut speed_errors = 0;
    let mut name_errors = 0;

    for seed in 0..50u64 {
        for planets in 1..=constants.max_planets {
            let config = SystemConfig::new(planets, (seed % 4) as i32).with_seed(seed);
            let Ok(state) = generate(constants, &config) else {
                radius_errors.push(format!("seed {} planets {}: generation failed", seed, planets));
                continue;
            };
            systems += 1;

            for (i, planet) in state.planets().enumerate() {
                let nominal =
                    constants.base_orbital_radius + i as f32 * constants.orbital_radius_increment;
                let radius = planet.orbital_radius();
                if (radius - nominal).abs() > half_variance + 1e-2 {
                    radius_errors.push(format!("seed {} planet {}: r={:.2}", seed, i, radius));
                }

                let mass = planet.mass as f64;
                if mass < constants.min_planet_mass * (1.0 - 1e-6)
                    || mass > constants.max_planet_mass * (1.0 + 1e-6)
                {
                    mass_errors += 1;
                }

                if !planet.velocity.x.is_finite() || !planet.velocity.y.is_finite() {
                    speed_errors += 1;
                }

                if planet.display_name != planet_name(i) {
                    name_errors += 1;
                }
            }
        }
    }

    results.push(TestResult {
        name: "radius_within_variance".into(),
        passed: radius_errors.is_empty(),
        detail: if radius_errors.is_empty() {
            format!("{} systems, all radii within ±{}", systems, half_variance)
        } else {
            format!("{} out of band, first: {}", radius_errors.len(), radius_errors[0])
        },
    });
    results.push(TestResult {
        name: "mass_within_bounds".into(),
        passed: mass_errors == 0,
        detail: format!("{} planets outside mass bounds", mass_errors),
    });
    results.push(TestResult {
        name: "velocity_finite".into(),
        passed: speed_errors == 0,
        detail: format!("{} planets with non-finite velocity", speed_errors),
    });
    results.push(TestResult {
        name: "planet_names".into(),
        passed: name_errors == 0,
        detail: format!("{} planets misnamed", name_errors),
    });

    // Near-zero radius falls back to the default speed
    let speed = orbital_speed(0.0, constants);
    results.push(TestResult {
        name: "zero_radius_speed".into(),
        passed: speed.is_finite() && speed == constants.default_orbital_speed,
        detail: format!("speed at r=0 is {}", speed),
    });

    // Planet count policy
    let zero = generate(constants, &SystemConfig::new(0, 1).with_seed(1));
    let over = generate(constants, &SystemConfig::new(constants.max_planets + 1, 1).with_seed(1));
    results.push(TestResult {
        name: "planet_count_rejected".into(),
        passed: matches!(zero, Err(GenerationError::PlanetCountOutOfRange { .. }))
            && matches!(over, Err(GenerationError::PlanetCountOutOfRange { .. })),
        detail: format!("0 and {} planets rejected", constants.max_planets + 1),
    });

    // Star type clamping
    let clamped = [(-5, StarType::RedDwarf), (99, StarType::WhiteDwarf)]
        .iter()
        .all(|&(index, expected)| {
            generate(constants, &SystemConfig::new(1, index).with_seed(1))
                .ok()
                .and_then(|s| s.star)
                .map(|star| star.display_name == expected.display_name())
                .unwrap_or(false)
        });
    results.push(TestResult {
        name: "star_type_clamped".into(),
        passed: clamped,
        detail: "out-of-range star type indices clamp to the ends".into(),
    });

    // Reference system
    match generate(constants, &SystemConfig::new(5, 1).with_seed(42)) {
        Ok(state) => {
            let planets: Vec<_> = state.planets().collect();
            let star_mass = state.star.as_ref().map(|s| s.mass).unwrap_or(0.0);
            let ok = (star_mass - 1.989e30).abs() / 1.989e30 < 1e-6
                && planets.len() == 5
                && planets[0].display_name == "Mercury"
                && planets[4].display_name == "Jupiter";
            results.push(TestResult {
                name: "reference_system".into(),
                passed: ok,
                detail: format!(
                    "star {:.3e} kg, {} at r={:.1}, {} at r={:.1}",
                    star_mass,
                    planets.first().map(|p| p.display_name.as_str()).unwrap_or("-"),
                    planets.first().map(|p| p.orbital_radius()).unwrap_or(0.0),
                    planets.last().map(|p| p.display_name.as_str()).unwrap_or("-"),
                    planets.last().map(|p| p.orbital_radius()).unwrap_or(0.0),
                ),
            });

            if verbose {
                println!("  Reference system (5 planets, Yellow Star, seed 42):");
                for p in &planets {
                    println!(
                        "    {:8} r={:7.2} |v|={:6.3} m={:.3e}",
                        p.display_name,
                        p.orbital_radius(),
                        p.velocity.length(),
                        p.mass
                    );
                }
            }
        }
        Err(e) => results.push(TestResult {
            name: "reference_system".into(),
            passed: false,
            detail: e.to_string(),
        }),
    }

    results
}

// ── 4. Orbits ───────────────────────────────────────────────────────────

fn validate_orbits(constants: &GenerationConstants) -> Vec<TestResult> {
    println!("--- Orbits ---");
    let mut results = Vec::new();

    // Ten one-second ticks at 2 rad/s
    let mut world = World::new();
    let start = Orbit {
        radius: 100.0,
        angular_speed: 2.0,
        angle: 0.5,
        center: Vec2::ZERO,
    };
    let entity = world.spawn((Kinematics::default(), start));
    for _ in 0..10 {
        orbit_system(&mut world, 1.0);
    }
    let expected = normalize_angle(0.5 + 20.0);
    let (angle, position) = match world.query_one_mut::<(&Orbit, &Kinematics)>(entity) {
        Ok((orbit, kinematics)) => (orbit.angle, kinematics.position),
        Err(_) => (f32::NAN, Vec2::ZERO),
    };
    let angle_ok = (angle - expected).abs() < 1e-3 || (TAU - (angle - expected).abs()) < 1e-3;
    results.push(TestResult {
        name: "ten_tick_angle".into(),
        passed: angle_ok && position.approx_eq(&position_on_orbit(100.0, angle), 1e-3),
        detail: format!("angle {:.5} (expected {:.5})", angle, expected),
    });

    // Radius holds over a long run
    let radius_ok = match generate(constants, &SystemConfig::new(8, 2).with_seed(5)) {
        Ok(state) => {
            let mut engine = SimulationEngine::new();
            engine.instantiate(&state, constants);
            for _ in 0..10_000 {
                engine.update(1.0 / 60.0);
            }
            let star_still = engine
                .star()
                .map(|s| s.position() == Vec2::ZERO)
                .unwrap_or(false);
            star_still
                && engine.planets().iter().all(|p| {
                    let r = p.orbit.map(|o| o.radius).unwrap_or(0.0);
                    (p.position().length() - r).abs() < 1e-2 * r.max(1.0)
                })
        }
        Err(_) => false,
    };
    results.push(TestResult {
        name: "long_run_stable".into(),
        passed: radius_ok,
        detail: "10,000 ticks keep every planet on its radius, star fixed".into(),
    });

    results
}

// ── 5. State Sync ───────────────────────────────────────────────────────

fn validate_state_sync(constants: &GenerationConstants) -> Vec<TestResult> {
    println!("--- State Sync ---");

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            return vec![TestResult {
                name: "tokio_runtime".into(),
                passed: false,
                detail: e.to_string(),
            }]
        }
    };

    runtime.block_on(async {
        let mut results = Vec::new();
        let mut sync = StateSynchronizer::new(InMemoryRepository::new(), constants.clone());

        let unknown = SystemId::new();
        results.push(TestResult {
            name: "load_unknown_not_found".into(),
            passed: matches!(sync.load(unknown).await, Err(SyncError::NotFound(id)) if id == unknown),
            detail: "unknown id reports not found".into(),
        });

        results.push(TestResult {
            name: "save_nothing_is_noop".into(),
            passed: matches!(sync.save().await, Ok(SaveOutcome::NothingToSave)),
            detail: "save with no live bodies succeeds".into(),
        });

        let generated = match sync
            .generate_and_instantiate(&SystemConfig::new(5, 1).with_seed(42))
            .await
        {
            Ok(g) => g,
            Err(e) => {
                results.push(TestResult {
                    name: "generate_and_instantiate".into(),
                    passed: false,
                    detail: e.to_string(),
                });
                return results;
            }
        };

        for _ in 0..300 {
            sync.update(1.0 / 60.0);
        }
        let before = sync.planets();
        let saved = sync.save().await;
        let reloaded = sync.load(generated.state.id).await;
        let after = sync.planets();
        let matches = before.len() == after.len()
            && before.iter().zip(&after).all(|(b, a)| {
                b.position().approx_eq(&a.position(), 1e-3)
                    && b.velocity().approx_eq(&a.velocity(), 1e-4)
                    && b.mass() == a.mass()
            });
        results.push(TestResult {
            name: "save_load_roundtrip".into(),
            passed: saved.is_ok() && reloaded.is_ok() && matches,
            detail: format!("{} planets survive save and reload", after.len()),
        });

        let stored = sync.repository().list_systems().await.map(|ids| ids.len()).unwrap_or(0);
        results.push(TestResult {
            name: "single_record".into(),
            passed: stored == 1,
            detail: format!("{} records stored", stored),
        });

        let mut offline = StateSynchronizer::new(InMemoryRepository::offline(), constants.clone());
        let transient = offline
            .generate_and_instantiate(&SystemConfig::new(3, 0).with_seed(7))
            .await;
        results.push(TestResult {
            name: "offline_runs_transiently".into(),
            passed: matches!(&transient, Ok(g) if !g.persisted) && offline.planet_count() == 3,
            detail: "unavailable store falls back to in-memory instantiation".into(),
        });

        results
    })
}
