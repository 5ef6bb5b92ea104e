//! Snap2D demo
//!
//! Drops a seeded handful of bodies into a view and runs the fixed-timestep
//! simulation for a few seconds, logging bounces and contacts.
//!
//! Usage: `snap2d [settings.json] [seed]`

#[cfg(not(target_arch = "wasm32"))]
use std::ops::Range;
#[cfg(not(target_arch = "wasm32"))]
use std::sync::Arc;

#[cfg(not(target_arch = "wasm32"))]
use glam::{DAffine2, DVec2};
#[cfg(not(target_arch = "wasm32"))]
use rand::{Rng, SeedableRng};
#[cfg(not(target_arch = "wasm32"))]
use rand_pcg::Pcg32;

#[cfg(not(target_arch = "wasm32"))]
use snap2d::anim::{Animation, ManualClock, Segment};
#[cfg(not(target_arch = "wasm32"))]
use snap2d::physics::{Force, Friction, StandardPhysics};
#[cfg(not(target_arch = "wasm32"))]
use snap2d::sim::{Body, step};
#[cfg(not(target_arch = "wasm32"))]
use snap2d::world::{CollisionModel, Rect2D, Shape, World2D};
#[cfg(not(target_arch = "wasm32"))]
use snap2d::{Error, Result, Settings};

#[cfg(not(target_arch = "wasm32"))]
const DEMO_SECONDS: f64 = 5.0;
#[cfg(not(target_arch = "wasm32"))]
const BODY_COUNT: usize = 8;
#[cfg(not(target_arch = "wasm32"))]
const DEFAULT_SEED: u64 = 12345;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Snap2D demo starting...");

    if let Err(e) = run() {
        log::error!("demo failed: {e}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The library is the product on wasm; there is no demo entry point
}

#[cfg(not(target_arch = "wasm32"))]
fn run() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) => Settings::load(path),
        None => Settings::default(),
    };
    let seed = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_SEED);

    let world = settings.world()?;
    let gravity = settings.gravity();
    log::info!(
        "World {:.1}x{:.1} units at {} px/unit, seed {}",
        world.world_width(),
        world.world_height(),
        world.pixels_per_unit(),
        seed
    );

    // One read-only model per body type, shared by every body of that type
    let models = [
        Arc::new(CollisionModel::from_shape(
            &Shape::Circle {
                diameter: 32.0,
                angle_increment: settings.circle_angle_increment,
            },
            &world,
        )?),
        Arc::new(CollisionModel::from_shape(
            &Shape::Rectangle {
                width: 24.0,
                height: 24.0,
            },
            &world,
        )?),
        Arc::new(CollisionModel::from_shape(
            &Shape::Regular {
                sides: 6,
                diameter: 40.0,
            },
            &world,
        )?),
    ];

    let mut rng = Pcg32::seed_from_u64(seed);
    let mut bodies = Vec::with_capacity(BODY_COUNT);
    for i in 0..BODY_COUNT {
        let model = Arc::clone(&models[i % models.len()]);
        let (xs, ys) = spawn_area(&world, &model.local_bounds())?;
        let position = DVec2::new(rng.random_range(xs), rng.random_range(ys));
        let velocity = DVec2::new(rng.random_range(-4.0..4.0), rng.random_range(-2.0..6.0));
        let mass = rng.random_range(0.5..3.0);
        let physics = StandardPhysics::new(velocity, mass)?.with_gravity(gravity);
        bodies.push(Body::new(position, model, physics, settings.restitution));
    }

    let forces: [Force; 1] = [Friction::horizontal(0.0, 0.05, &gravity).into()];

    // A cosmetic spin driven by the simulation clock
    let clock = ManualClock::new(0);
    let mut spin = Animation::new(
        vec![
            Segment::rotation(360.0, 2000, None)?,
            Segment::dilation(1.5, 1.5, 500)?,
            Segment::dilation(1.0 / 1.5, 1.0 / 1.5, 500)?,
        ],
        true,
        clock.clone(),
    )?;
    let mut sprite = DAffine2::IDENTITY;
    let tick_ms = (settings.fixed_dt * 1000.0).round() as i64;

    let ticks = (DEMO_SECONDS / settings.fixed_dt).ceil() as u64;
    let (mut bounces, mut contacts, mut unresolved) = (0, 0, 0);
    for tick in 0..ticks {
        let report = step(&mut bodies, &world, &settings, &forces);
        bounces += report.wall_hits.len();
        contacts += report.contacts.len();
        unresolved += report.unresolved.len();

        clock.advance(tick_ms);
        spin.draw(&mut sprite)?;
        spin.release(&mut sprite);

        if tick % 30 == 0 {
            log::debug!(
                "tick {tick}: {} bounces, {} contacts",
                report.wall_hits.len(),
                report.contacts.len()
            );
        }
    }

    log::info!(
        "Ran {ticks} ticks: {bounces} bounces, {contacts} contacts, {unresolved} unresolved"
    );
    for (i, body) in bodies.iter().enumerate() {
        let screen = body.screen_bounds(&world);
        log::info!(
            "body {i}: world ({:.2}, {:.2}) screen ({:.0}, {:.0}) speed {:.2}",
            body.position.x,
            body.position.y,
            screen.x,
            screen.y,
            body.physics.speed()
        );
    }
    Ok(())
}

/// Positions at which a body with `bounds` lies fully inside the view
#[cfg(not(target_arch = "wasm32"))]
fn spawn_area(world: &World2D, bounds: &Rect2D) -> Result<(Range<f64>, Range<f64>)> {
    let xs = world.min_x() - bounds.x..world.max_x() - bounds.max_x();
    let ys = world.min_y() - bounds.y..world.max_y() - bounds.max_y();
    if xs.is_empty() || ys.is_empty() {
        return Err(Error::InvalidArgument(format!(
            "view of {:.2}x{:.2} units cannot fit a {:.2}x{:.2} body",
            world.world_width(),
            world.world_height(),
            bounds.width,
            bounds.height
        )));
    }
    Ok((xs, ys))
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;
    use snap2d::world::YAxis;

    #[test]
    fn test_spawn_area_keeps_body_in_view() {
        let world = World2D::new(0.0, 10.0, 100, 100, 10.0, YAxis::Down).unwrap();
        let (xs, ys) = spawn_area(&world, &Rect2D::new(0.0, 0.0, 2.0, 1.0)).unwrap();
        assert_eq!(xs, 0.0..8.0);
        assert_eq!(ys, 0.0..9.0);
    }

    #[test]
    fn test_spawn_area_rejects_small_view() {
        // A 16px view at 32 px/unit is half a unit wide
        let settings = Settings::from_json(r#"{ "view_width": 16, "view_height": 16 }"#).unwrap();
        let world = settings.world().unwrap();
        let circle = Shape::Circle {
            diameter: 32.0,
            angle_increment: settings.circle_angle_increment,
        };
        let model = CollisionModel::from_shape(&circle, &world).unwrap();
        assert!(matches!(
            spawn_area(&world, &model.local_bounds()),
            Err(Error::InvalidArgument(_))
        ));
    }
}
